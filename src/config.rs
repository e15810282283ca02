use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;

/// Top-level hydroscope library file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HydroscopeConfig {
    /// Model runs to load, in display order.
    #[serde(default)]
    pub model: Vec<ModelToml>,

    /// Initial view settings.
    #[serde(default)]
    pub view: ViewToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    pub name: Option<String>,
    pub store: PathBuf,
    pub terrain: PathBuf,
    pub catchment: Option<String>,
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_crs")]
    pub crs: String,
}

fn default_start_date() -> NaiveDate {
    NaiveDate::default()
}
fn default_crs() -> String {
    "bng".to_string()
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ViewToml {
    #[serde(default)]
    pub monthly_means: bool,
    #[serde(default)]
    pub zoom: u8,
}

impl HydroscopeConfig {
    /// Reads and parses `path`, resolving relative model paths against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: HydroscopeConfig =
            toml::from_str(&text).context("failed to parse TOML config")?;
        if config.model.is_empty() {
            bail!("{} defines no [[model]] entries", path.display());
        }
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for model in &mut config.model {
            model.store = resolve(base, &model.store);
            model.terrain = resolve(base, &model.terrain);
        }
        Ok(config)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hydroscope.toml");
        std::fs::write(
            &path,
            r#"
[[model]]
name = "baseline"
store = "runs/output.h5"
terrain = "/data/dem.asc"
catchment = "Dee"
start_date = "1990-01-01"
crs = "utm:30n"

[[model]]
store = "other.h5"
terrain = "dem.asc"

[view]
monthly_means = true
zoom = 20
"#,
        )
        .unwrap();

        let config = HydroscopeConfig::load(&path).unwrap();
        assert_eq!(config.model.len(), 2);
        let first = &config.model[0];
        assert_eq!(first.store, dir.path().join("runs/output.h5"));
        assert_eq!(first.terrain, PathBuf::from("/data/dem.asc"));
        assert_eq!(first.start_date, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        assert_eq!(config.model[1].crs, "bng");
        assert_eq!(config.model[1].name, None);
        assert!(config.view.monthly_means);
        assert_eq!(config.view.zoom, 20);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[[model]]\nstore = \"a.h5\"\nterrain = \"b.asc\"\ncolour = 1\n")
            .unwrap();
        assert!(HydroscopeConfig::load(&path).is_err());
    }

    #[test]
    fn test_requires_a_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "[view]\nzoom = 3\n").unwrap();
        let err = HydroscopeConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("no [[model]]"));
    }
}
