use std::path::Path;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use hydroscope_compare::Model;
use hydroscope_elements::Element;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::session;

#[derive(Serialize)]
struct VariableInfo {
    name: &'static str,
    label: &'static str,
    river: bool,
    n_times: usize,
    first: Option<NaiveDateTime>,
    last: Option<NaiveDateTime>,
}

#[derive(Serialize)]
struct ModelInfo<'a> {
    name: &'a str,
    source: String,
    catchment: &'a str,
    start_date: NaiveDate,
    crs: String,
    n_land: usize,
    n_river: usize,
    variables: Vec<VariableInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    land: Option<&'a [Element]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    river: Option<&'a [Element]>,
}

fn describe(model: &Model, with_elements: bool) -> ModelInfo<'_> {
    let variables = model
        .variables()
        .iter()
        .map(|(_, v)| VariableInfo {
            name: v.name(),
            label: v.label(),
            river: v.is_river(),
            n_times: v.n_times(),
            first: v.times().first().copied(),
            last: v.times().last().copied(),
        })
        .collect();
    let catalogue = model.catalogue();
    ModelInfo {
        name: model.name(),
        source: model.source_name(),
        catchment: model.catchment(),
        start_date: model.start_date(),
        crs: model.crs().to_string(),
        n_land: model.index().n_land(),
        n_river: model.index().n_river(),
        variables,
        land: with_elements.then(|| catalogue.land()),
        river: with_elements.then(|| catalogue.river()),
    }
}

pub fn run(config: &Path, args: InfoArgs) -> Result<()> {
    let _span = tracing::info_span!("info").entered();

    let session = session::open_session(config, None)?;
    let models: Vec<ModelInfo<'_>> = session
        .models()
        .iter()
        .map(|m| describe(m, args.elements))
        .collect();
    info!(n_models = models.len(), "describing models");

    session::write_json(&models, args.output.output.as_deref())
}
