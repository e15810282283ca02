use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ExportArgs;
use crate::convert::parse_variable;
use crate::session;

pub fn run(config: &Path, args: ExportArgs) -> Result<()> {
    let _span = tracing::info_span!("export").entered();

    let variable = parse_variable(&args.variable)?;
    let mut session = session::open_session(config, None)?;
    session
        .select_variable(variable)
        .with_context(|| format!("cannot select {variable}"))?;
    session.select_element(args.element)?;

    std::fs::create_dir_all(&args.dir)
        .with_context(|| format!("failed to create {}", args.dir.display()))?;
    let path = session.export(&args.dir)?;
    info!(path = %path.display(), "series exported");
    println!("{}", path.display());
    Ok(())
}
