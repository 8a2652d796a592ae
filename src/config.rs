use std::ffi::OsString;
use std::path::PathBuf;

use crate::data::dashboard::DashboardSettings;
use crate::data::projection::TOP_N;

/// Data file, overridden by the first command-line argument.
pub const DATA_ENV: &str = "METHANE_TRACKER_DATA";
/// Directory holding `emission.md`, `glossary.md` and the images.
pub const ASSETS_ENV: &str = "METHANE_TRACKER_ASSETS";
/// Length of the country ranking.
pub const TOP_N_ENV: &str = "METHANE_TRACKER_TOP_N";

pub const DEFAULT_DATA_FILE: &str = "METHANE TRACKER.csv";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub asset_dir: PathBuf,
    pub settings: DashboardSettings,
}

impl AppConfig {
    /// Build from the process arguments and environment.
    pub fn from_env() -> Self {
        Self::resolve(std::env::args_os().nth(1), |key| std::env::var_os(key))
    }

    /// Resolution order for the data file: argument, `METHANE_TRACKER_DATA`,
    /// then [`DEFAULT_DATA_FILE`] in the working directory. Assets default
    /// to the data file's directory.
    pub fn resolve(arg: Option<OsString>, env: impl Fn(&str) -> Option<OsString>) -> Self {
        let data_path: PathBuf = arg
            .or_else(|| env(DATA_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let asset_dir = env(ASSETS_ENV).map(PathBuf::from).unwrap_or_else(|| {
            data_path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default()
        });

        let top_n = match env(TOP_N_ENV) {
            None => TOP_N,
            Some(raw) => match raw.to_str().and_then(|s| s.trim().parse::<usize>().ok()) {
                Some(n) if n > 0 => n,
                _ => {
                    log::warn!("Ignoring invalid {TOP_N_ENV}={raw:?}; using {TOP_N}");
                    TOP_N
                }
            },
        };

        AppConfig {
            data_path,
            asset_dir,
            settings: DashboardSettings {
                top_n,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::resolve(None, env_of(&[]));
        assert_eq!(cfg.data_path, Path::new(DEFAULT_DATA_FILE));
        assert_eq!(cfg.asset_dir, Path::new(""));
        assert_eq!(cfg.settings.top_n, TOP_N);
    }

    #[test]
    fn argument_beats_environment() {
        let env = env_of(&[(DATA_ENV, "/env/data.csv")]);
        let cfg = AppConfig::resolve(Some("/arg/data.parquet".into()), env);
        assert_eq!(cfg.data_path, Path::new("/arg/data.parquet"));
        assert_eq!(cfg.asset_dir, Path::new("/arg"));
    }

    #[test]
    fn environment_overrides() {
        let env = env_of(&[
            (DATA_ENV, "/env/data.csv"),
            (ASSETS_ENV, "/assets"),
            (TOP_N_ENV, " 5 "),
        ]);
        let cfg = AppConfig::resolve(None, env);
        assert_eq!(cfg.data_path, Path::new("/env/data.csv"));
        assert_eq!(cfg.asset_dir, Path::new("/assets"));
        assert_eq!(cfg.settings.top_n, 5);
    }

    #[test]
    fn invalid_top_n_falls_back() {
        for bad in ["0", "ten", "-3"] {
            let cfg = AppConfig::resolve(None, env_of(&[(TOP_N_ENV, bad)]));
            assert_eq!(cfg.settings.top_n, TOP_N);
        }
    }
}
