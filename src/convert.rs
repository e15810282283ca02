//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result};
use hydroscope_compare::{ModelConfig, ViewConfig};
use hydroscope_elements::CoordinateReference;
use hydroscope_variables::VariableId;

use crate::config::{ModelToml, ViewToml};

/// Parses a coordinate reference such as `bng`, `wgs84` or `utm:30n`.
pub fn parse_crs(s: &str) -> Result<CoordinateReference> {
    s.parse::<CoordinateReference>()
        .with_context(|| format!("unknown coordinate reference: {s:?}"))
}

/// Parses a variable name such as `ph_depth` or `table_elev`.
pub fn parse_variable(s: &str) -> Result<VariableId> {
    s.parse::<VariableId>().with_context(|| {
        let known: Vec<&str> = VariableId::ALL.iter().map(|id| id.spec().name).collect();
        format!("unknown variable {s:?} (known: {})", known.join(", "))
    })
}

/// Builds a [`ModelConfig`] from one `[[model]]` entry.
///
/// Unnamed models are called `model <n>`, counting from 1.
pub fn build_model_config(model: &ModelToml, position: usize) -> Result<ModelConfig> {
    let name = model
        .name
        .clone()
        .unwrap_or_else(|| format!("model {}", position + 1));
    let mut cfg = ModelConfig::new(&model.store, &model.terrain)
        .with_name(name)
        .with_start_date(model.start_date)
        .with_crs(parse_crs(&model.crs)?);
    if let Some(ref c) = model.catchment {
        cfg = cfg.with_catchment(c);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`ViewConfig`] from the TOML view section.
pub fn build_view_config(view: &ViewToml) -> Result<ViewConfig> {
    let cfg = ViewConfig::default()
        .with_monthly_means(view.monthly_means)
        .with_zoom(view.zoom);
    cfg.validate()?;
    Ok(cfg)
}
