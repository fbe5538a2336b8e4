//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grader::Grader;
use crate::model::{ExponentStyle, UnitCatalog};
use crate::tolerance::Tolerance;

/// Environment variable overriding the unit catalog path.
pub const UNITS_ENV: &str = "MATHDRILL_UNITS";
/// Environment variable overriding the exercises path.
pub const EXERCISES_ENV: &str = "MATHDRILL_EXERCISES";

/// Top-level mathdrill configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathdrillConfig {
    /// Unit catalog file.
    #[serde(default = "default_units")]
    pub units: PathBuf,
    /// Exercise set file or directory.
    #[serde(default = "default_exercises")]
    pub exercises: PathBuf,
    /// How `<sup>` exponents in answers are read.
    #[serde(default)]
    pub exponent_style: ExponentStyle,
    /// Seed for the exercise deck; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Output directory for session reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub tolerance: Tolerance,
}

fn default_units() -> PathBuf {
    PathBuf::from("data/units.json")
}
fn default_exercises() -> PathBuf {
    PathBuf::from("data/exercises")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./mathdrill-results")
}

impl Default for MathdrillConfig {
    fn default() -> Self {
        Self {
            units: default_units(),
            exercises: default_exercises(),
            exponent_style: ExponentStyle::default(),
            seed: None,
            output_dir: default_output_dir(),
            tolerance: Tolerance::default(),
        }
    }
}

impl MathdrillConfig {
    /// Build a grader over `catalog` with this configuration's tolerance and
    /// exponent reading.
    pub fn grader(&self, catalog: UnitCatalog) -> Grader {
        Grader::new(catalog)
            .with_tolerance(self.tolerance.clone())
            .with_exponent_style(self.exponent_style)
    }
}

/// Resolve `${VAR_NAME}` references in a string through `lookup`.
/// Unset variables expand to the empty string.
fn resolve_with(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = lookup(&result[start + 2..start + end]).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

fn resolve_path(path: &Path, lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    match path.to_str() {
        Some(s) if s.contains("${") => PathBuf::from(resolve_with(s, lookup)),
        _ => path.to_path_buf(),
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `mathdrill.toml` in the current directory
/// 2. `~/.config/mathdrill/config.toml`
///
/// Environment variable overrides: `MATHDRILL_UNITS`, `MATHDRILL_EXERCISES`.
pub fn load_config_from(path: Option<&Path>) -> Result<MathdrillConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mathdrill.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config_file(&path)?
        }
        None => MathdrillConfig::default(),
    };

    Ok(finish(config, |name| std::env::var(name).ok()))
}

/// Parse one config file without applying environment overrides.
pub fn parse_config_file(path: &Path) -> Result<MathdrillConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<MathdrillConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Apply env var overrides and expand `${VAR}` references in path values.
fn finish(mut config: MathdrillConfig, lookup: impl Fn(&str) -> Option<String>) -> MathdrillConfig {
    if let Some(units) = lookup(UNITS_ENV).filter(|v| !v.is_empty()) {
        config.units = PathBuf::from(units);
    }
    if let Some(exercises) = lookup(EXERCISES_ENV).filter(|v| !v.is_empty()) {
        config.exercises = PathBuf::from(exercises);
    }

    config.units = resolve_path(&config.units, &lookup);
    config.exercises = resolve_path(&config.exercises, &lookup);
    config.output_dir = resolve_path(&config.output_dir, &lookup);
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mathdrill"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn resolve_vars_in_place() {
        let lookup = env(&[("DATA", "hello")]);
        assert_eq!(resolve_with("${DATA}", &lookup), "hello");
        assert_eq!(
            resolve_with("prefix_${DATA}_suffix", &lookup),
            "prefix_hello_suffix"
        );
    }

    #[test]
    fn resolve_unset_and_unterminated() {
        let lookup = env(&[]);
        assert_eq!(resolve_with("a${NOPE}b", &lookup), "ab");
        assert_eq!(resolve_with("a${OPEN", &lookup), "a${OPEN");
    }

    #[test]
    fn resolved_value_is_not_expanded_again() {
        let lookup = env(&[("A", "${A}")]);
        assert_eq!(resolve_with("x/${A}/y", &lookup), "x/${A}/y");
    }

    #[test]
    fn default_config() {
        let config = MathdrillConfig::default();
        assert_eq!(config.units, PathBuf::from("data/units.json"));
        assert_eq!(config.exponent_style, ExponentStyle::Power);
        assert_eq!(config.seed, None);
        assert_eq!(config.tolerance.for_reference(222_000.0), 0.1);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
units = "${DATA}/units.json"
exercises = "sets"
exponent_style = "scientific"
seed = 42
output_dir = "out"

[tolerance]
relative = 0.02

[[tolerance.exceptions]]
reference = 222000
relative = 0.1
"#;
        let config: MathdrillConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.exponent_style, ExponentStyle::Scientific);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.tolerance.relative, 0.02);
        assert_eq!(config.tolerance.exceptions.len(), 1);

        let config = finish(config, env(&[("DATA", "/srv/data")]));
        assert_eq!(config.units, PathBuf::from("/srv/data/units.json"));
        assert_eq!(config.exercises, PathBuf::from("sets"));
    }

    #[test]
    fn env_overrides_data_paths() {
        let config = finish(
            MathdrillConfig::default(),
            env(&[(UNITS_ENV, "u.json"), (EXERCISES_ENV, "")]),
        );
        assert_eq!(config.units, PathBuf::from("u.json"));
        assert_eq!(config.exercises, PathBuf::from("data/exercises"));
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mathdrill.toml");
        std::fs::write(&path, "seed = 7\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.output_dir, PathBuf::from("./mathdrill-results"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/mathdrill.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn malformed_config_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "exponent_style = \"binary\"\n").unwrap();
        let err = parse_config_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.toml"));
    }
}
