//! Tool configuration: JSON file or environment.
//!
//! | Field        | Env var                  | Default            |
//! |--------------|--------------------------|--------------------|
//! | `max_degree` | `POLYCOMMIT_MAX_DEGREE`  | 16                 |
//! | `srs_path`   | `POLYCOMMIT_SRS`         | none (generate)    |
//! | `log_filter` | `RUST_LOG`               | `polycommit=info`  |

#![forbid(unsafe_code)]
#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const ENV_MAX_DEGREE: &str = "POLYCOMMIT_MAX_DEGREE";
pub const ENV_SRS_PATH: &str = "POLYCOMMIT_SRS";
pub const ENV_LOG_FILTER: &str = "RUST_LOG";

pub const DEFAULT_MAX_DEGREE: usize = 16;
pub const DEFAULT_LOG_FILTER: &str = "polycommit=info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },
}

/// Settings shared by `generate_srs` and `kzg_demo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KzgConfig {
    /// Largest polynomial degree the setup must support.
    pub max_degree: usize,
    /// Persisted SRS to load; `None` means generate a fresh one.
    pub srs_path: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Default for KzgConfig {
    fn default() -> Self {
        Self {
            max_degree: DEFAULT_MAX_DEGREE,
            srs_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl KzgConfig {
    /// Read from the process environment; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`KzgConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_MAX_DEGREE) {
            cfg.max_degree = v.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_MAX_DEGREE,
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup(ENV_SRS_PATH).filter(|v| !v.is_empty()) {
            cfg.srs_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(ENV_LOG_FILTER).filter(|v| !v.is_empty()) {
            cfg.log_filter = v;
        }
        Ok(cfg)
    }

    /// Parse a JSON file; missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |k| vars.get(k).map(|v| v.to_string())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let vars = HashMap::new();
        let cfg = KzgConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(cfg, KzgConfig::default());
        assert_eq!(cfg.log_filter, "polycommit=info");
    }

    #[test]
    fn environment_overrides_defaults() {
        let vars = HashMap::from([
            (ENV_MAX_DEGREE, " 64 "),
            (ENV_SRS_PATH, "/tmp/kzg.srs"),
            (ENV_LOG_FILTER, "polycommit=trace"),
        ]);
        let cfg = KzgConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(cfg.max_degree, 64);
        assert_eq!(cfg.srs_path.as_deref(), Some(Path::new("/tmp/kzg.srs")));
        assert_eq!(cfg.log_filter, "polycommit=trace");
    }

    #[test]
    fn bad_degree_is_reported_with_variable_name() {
        let vars = HashMap::from([(ENV_MAX_DEGREE, "-3")]);
        let err = KzgConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_MAX_DEGREE, .. }));
        assert!(err.to_string().contains("POLYCOMMIT_MAX_DEGREE"));
    }

    #[test]
    fn json_file_with_partial_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kzg.json");
        std::fs::write(&path, r#"{ "max_degree": 8, "srs_path": "srs.bin" }"#).unwrap();

        let cfg = KzgConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.max_degree, 8);
        assert_eq!(cfg.srs_path, Some(PathBuf::from("srs.bin")));
        assert_eq!(cfg.log_filter, DEFAULT_LOG_FILTER);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            KzgConfig::from_json_file(&path),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            KzgConfig::from_json_file(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
