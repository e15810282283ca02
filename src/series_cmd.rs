use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::SeriesArgs;
use crate::convert::parse_variable;
use crate::session::{self, model_index};

pub fn run(config: &Path, args: SeriesArgs) -> Result<()> {
    let _span = tracing::info_span!("series").entered();

    let variable = parse_variable(&args.variable)?;
    let mut session = session::open_session(config, Some(&args.view))?;

    if let Some(ref key) = args.model {
        let index = model_index(&session, key)?;
        session.select_model(index)?;
    }
    session
        .select_variable(variable)
        .with_context(|| format!("cannot select {variable}"))?;
    session.select_element(args.element)?;
    session.set_time_index(args.time)?;
    if let Some(ref key) = args.difference {
        let other = model_index(&session, key)?;
        session.set_difference(Some(other))?;
    }

    let frame = session.plot_frame()?;
    info!(
        title = %frame.title,
        lines = frame.lines.len(),
        observed = frame.observed.is_some(),
        "plot frame built"
    );
    session::write_json(&frame, args.output.output.as_deref())
}
