//! Configuration vault – reads/writes `~/.frametree/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Log line format for the `tracing` subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Unit used when printing rotation angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl std::str::FromStr for AngleUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rad" | "radians" => Ok(AngleUnit::Radians),
            "deg" | "degrees" => Ok(AngleUnit::Degrees),
            other => Err(format!("unknown angle unit '{other}'")),
        }
    }
}

/// Persisted user configuration stored in `~/.frametree/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub angle_unit: AngleUnit,

    /// Decimal places used when printing poses.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Snapshot used when `--snapshot` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_snapshot: Option<PathBuf>,
}

fn default_log_level() -> String {
    "warn".to_string()
}
fn default_precision() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            angle_unit: AngleUnit::default(),
            precision: default_precision(),
            default_snapshot: None,
        }
    }
}

/// Return the path to `~/.frametree/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".frametree").join("config.toml")
}

/// Load the config from disk (defaults when the file is absent), then apply
/// environment overrides.
pub fn load() -> Result<Config, CliError> {
    let mut cfg = load_from(&config_path())?.unwrap_or_default();
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

/// Load the config from a specific path.  Returns `None` if the file does
/// not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, CliError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = toml::from_str(&raw).map_err(|source| CliError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(cfg))
}

/// Apply `FRAMETREE_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `FRAMETREE_LOG_LEVEL` | `log_level` |
/// | `FRAMETREE_LOG_FORMAT` | `log_format` (`json` or `compact`) |
/// | `FRAMETREE_ANGLE_UNIT` | `angle_unit` (`radians` / `degrees`) |
/// | `FRAMETREE_PRECISION` | `precision` |
/// | `FRAMETREE_SNAPSHOT` | `default_snapshot` |
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("FRAMETREE_LOG_LEVEL") {
        cfg.log_level = v;
    }
    if let Ok(v) = std::env::var("FRAMETREE_LOG_FORMAT") {
        match v.as_str() {
            "json" => cfg.log_format = LogFormat::Json,
            "compact" => cfg.log_format = LogFormat::Compact,
            _ => {}
        }
    }
    if let Ok(v) = std::env::var("FRAMETREE_ANGLE_UNIT")
        && let Ok(unit) = v.parse::<AngleUnit>()
    {
        cfg.angle_unit = unit;
    }
    if let Ok(v) = std::env::var("FRAMETREE_PRECISION")
        && let Ok(p) = v.parse::<usize>()
    {
        cfg.precision = p;
    }
    if let Ok(v) = std::env::var("FRAMETREE_SNAPSHOT") {
        cfg.default_snapshot = Some(PathBuf::from(v));
    }
}

/// Save the config to disk, creating `~/.frametree/` if necessary.
pub fn save(cfg: &Config) -> Result<PathBuf, CliError> {
    let path = config_path();
    save_to(cfg, &path)?;
    Ok(path)
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CliError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let raw = toml::to_string_pretty(cfg)?;
    fs::write(path, raw).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = Config::default();
        save_to(&cfg, &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.precision, 4);
        assert_eq!(loaded.angle_unit, AngleUnit::Radians);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "angle_unit = \"degrees\"\ndefault_snapshot = \"/tmp/snap.json\"\n")
            .expect("write");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.angle_unit, AngleUnit::Degrees);
        assert_eq!(loaded.log_format, LogFormat::Compact);
        assert_eq!(loaded.precision, 4);
        assert_eq!(loaded.default_snapshot, Some(PathBuf::from("/tmp/snap.json")));
    }

    #[test]
    fn invalid_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "precision = \"lots\"").expect("write");
        assert!(matches!(load_from(&path), Err(CliError::Toml { .. })));
    }

    #[test]
    fn config_path_points_to_frametree_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".frametree"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let result = load_from(&path).expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn angle_unit_parses_short_and_long_forms() {
        assert_eq!("deg".parse::<AngleUnit>(), Ok(AngleUnit::Degrees));
        assert_eq!("Radians".parse::<AngleUnit>(), Ok(AngleUnit::Radians));
        assert!("gradians".parse::<AngleUnit>().is_err());
    }

    #[test]
    fn apply_env_overrides_changes_fields() {
        // SAFETY: the only test touching these variables; no data races on env vars.
        unsafe {
            std::env::set_var("FRAMETREE_ANGLE_UNIT", "degrees");
            std::env::set_var("FRAMETREE_PRECISION", "7");
            std::env::set_var("FRAMETREE_LOG_FORMAT", "json");
            std::env::set_var("FRAMETREE_SNAPSHOT", "/data/robot.toml");
        }
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.angle_unit, AngleUnit::Degrees);
        assert_eq!(cfg.precision, 7);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.default_snapshot, Some(PathBuf::from("/data/robot.toml")));
        unsafe {
            std::env::remove_var("FRAMETREE_ANGLE_UNIT");
            std::env::remove_var("FRAMETREE_PRECISION");
            std::env::remove_var("FRAMETREE_LOG_FORMAT");
            std::env::remove_var("FRAMETREE_SNAPSHOT");
        }
    }

    #[test]
    fn apply_env_overrides_changes_log_level() {
        // SAFETY: the only test touching this variable; no data races on env vars.
        unsafe { std::env::set_var("FRAMETREE_LOG_LEVEL", "debug") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.log_level, "debug");
        unsafe { std::env::remove_var("FRAMETREE_LOG_LEVEL") };
    }
}
