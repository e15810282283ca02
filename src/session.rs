//! Shared command plumbing: loading the library file into a session and
//! emitting JSON.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use hydroscope_compare::{Model, Session};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::ViewArgs;
use crate::config::HydroscopeConfig;
use crate::convert;

/// Loads every model in the library file and starts a session on them.
pub fn open_session(config_path: &Path, view: Option<&ViewArgs>) -> Result<Session> {
    let config = HydroscopeConfig::load(config_path)?;
    let mut view_cfg = convert::build_view_config(&config.view)?;
    if let Some(args) = view {
        if args.monthly {
            view_cfg = view_cfg.with_monthly_means(true);
        }
        if let Some(zoom) = args.zoom {
            view_cfg = view_cfg.with_zoom(zoom);
        }
        view_cfg.validate()?;
    }

    let mut session: Option<Session> = None;
    for (position, entry) in config.model.iter().enumerate() {
        let model_cfg = convert::build_model_config(entry, position)?;
        let model = Model::load(&model_cfg)
            .with_context(|| format!("failed to load model '{}'", model_cfg.name()))?;
        if let Some(ref mut s) = session {
            s.add_model(model);
        } else {
            session = Some(Session::new(model, view_cfg)?);
        }
    }
    let mut session = session.ok_or_else(|| anyhow!("no models loaded"))?;
    info!(n_models = session.models().len(), "session ready");

    if let Some(path) = view.and_then(|v| v.observed.as_deref()) {
        // A bad overlay file degrades to no overlay.
        match session.load_observed(path) {
            Ok(kept) => info!(path = %path.display(), samples = kept, "observed overlay loaded"),
            Err(e) => warn!(path = %path.display(), error = %e, "continuing without overlay"),
        }
    }
    Ok(session)
}

/// Resolves a model given by name or by zero-based index.
pub fn model_index(session: &Session, key: &str) -> Result<usize> {
    if let Some(i) = session.models().iter().position(|m| m.name() == key) {
        return Ok(i);
    }
    let index: usize = key
        .parse()
        .map_err(|_| anyhow!("no model named '{key}'"))?;
    session.model(index)?;
    Ok(index)
}

/// Pretty JSON to `output`, or stdout.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialise output")?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write to stdout")?;
        }
    }
    Ok(())
}
