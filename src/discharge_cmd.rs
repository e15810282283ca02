use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::cli::DischargeArgs;
use crate::session;

pub fn run(config: &Path, args: DischargeArgs) -> Result<()> {
    let _span = tracing::info_span!("discharge").entered();

    let session = session::open_session(config, Some(&args.view))?;
    let frame = session.outlet_frame()?;
    for line in &frame.lines {
        if let Some(ref score) = line.score {
            info!(model = %line.label, nse = ?score.nse, pairs = score.n_pairs, "scored");
        }
    }
    session::write_json(&frame, args.output.output.as_deref())
}
