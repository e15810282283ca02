use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::MapArgs;
use crate::convert::parse_variable;
use crate::session::{self, model_index};

pub fn run(config: &Path, args: MapArgs) -> Result<()> {
    let _span = tracing::info_span!("map").entered();

    let variable = parse_variable(&args.variable)?;
    let mut session = session::open_session(config, None)?;

    if let Some(ref key) = args.model {
        let index = model_index(&session, key)?;
        session.select_model(index)?;
    }
    session
        .select_variable(variable)
        .with_context(|| format!("cannot select {variable}"))?;
    session.set_time_index(args.time)?;
    if let Some(ref key) = args.difference {
        let other = model_index(&session, key)?;
        session.set_difference(Some(other))?;
    }

    let frame = session.map_frame()?;
    info!(
        variable = frame.variable,
        time = %frame.time,
        elements = frame.elements.len(),
        vmin = frame.vmin,
        vmax = frame.vmax,
        "map frame built"
    );
    session::write_json(&frame, args.output.output.as_deref())
}
