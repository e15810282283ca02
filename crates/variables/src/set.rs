//! The variables available in one model run.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use hydroscope_calendar::TimeUnits;
use hydroscope_elements::{ElementIndex, ElevationTable};
use hydroscope_io::ArrayStore;
use tracing::{info, warn};

use crate::derived::DerivedVariable;
use crate::error::VariableError;
use crate::registry::VariableId;
use crate::stored::StoredVariable;
use crate::variable::Variable;

/// Registered variables that loaded successfully, in registry order.
#[derive(Clone, Default)]
pub struct VariableSet {
    variables: BTreeMap<VariableId, Arc<dyn Variable>>,
}

impl VariableSet {
    /// Opens every registered variable present in `store`.
    ///
    /// Derived variables are added when their base loaded. Time offsets
    /// without units are hours since `start_date`.
    pub fn load(
        store: &dyn ArrayStore,
        index: Arc<ElementIndex>,
        elevations: &ElevationTable,
        start_date: NaiveDate,
    ) -> Result<Self, VariableError> {
        let default_units = TimeUnits::hours_since(start_date);
        let mut set = Self::default();
        for id in VariableId::ALL {
            let spec = id.spec();
            match spec.derived_from {
                None => {
                    if let Some(v) =
                        StoredVariable::open(store, spec, Arc::clone(&index), default_units)?
                    {
                        set.insert(id, Arc::new(v));
                    }
                }
                Some(base_id) => match set.get(base_id) {
                    Some(base) => {
                        let derived = DerivedVariable::new(spec, base, elevations.clone());
                        set.insert(id, Arc::new(derived));
                    }
                    None => warn!(
                        variable = spec.name,
                        base = base_id.spec().name,
                        "base variable missing, derived variable unavailable"
                    ),
                },
            }
        }
        info!(
            source = %store.source_name(),
            variables = ?set.available().iter().map(|id| id.spec().name).collect::<Vec<_>>(),
            "loaded variables"
        );
        Ok(set)
    }

    pub fn insert(&mut self, id: VariableId, variable: Arc<dyn Variable>) {
        self.variables.insert(id, variable);
    }

    pub fn get(&self, id: VariableId) -> Option<Arc<dyn Variable>> {
        self.variables.get(&id).cloned()
    }

    /// Like [`VariableSet::get`] but with an error naming the variable.
    pub fn require(&self, id: VariableId) -> Result<Arc<dyn Variable>, VariableError> {
        self.get(id).ok_or_else(|| VariableError::NotFound {
            what: format!("variable '{}'", id.spec().name),
        })
    }

    pub fn contains(&self, id: VariableId) -> bool {
        self.variables.contains_key(&id)
    }

    pub fn available(&self) -> Vec<VariableId> {
        self.variables.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableId, &Arc<dyn Variable>)> {
        self.variables.iter().map(|(&id, v)| (id, v))
    }
}

impl std::fmt::Debug for VariableSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.variables.keys()).finish()
    }
}
