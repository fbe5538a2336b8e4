//! Unit catalog and exercise set loading.
//!
//! Both file kinds are accepted as JSON or TOML, chosen by extension. Exercise
//! sets can also be loaded from a directory tree, and are validated against
//! the unit catalog.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::display::round_significant;
use crate::model::{Answer, Exercise, ExerciseSet, UnitCatalog};
use crate::units::{Conversion, UnitIndex};

/// Significant digits kept when a power of ten is folded into an answer.
const ANSWER_POWER_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

fn parse_str<T: DeserializeOwned>(content: &str, source_path: &Path) -> Result<T> {
    match Format::of(source_path).unwrap_or(Format::Json) {
        Format::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display())),
        Format::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display())),
    }
}

/// Load a unit catalog file.
pub fn load_unit_catalog(path: &Path) -> Result<UnitCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read unit catalog: {}", path.display()))?;

    parse_unit_catalog_str(&content, path)
}

/// Parse a unit catalog from a string; the format follows `source_path`'s
/// extension and defaults to JSON.
pub fn parse_unit_catalog_str(content: &str, source_path: &Path) -> Result<UnitCatalog> {
    parse_str(content, source_path)
}

/// Load a single exercise set file.
pub fn load_exercise_set(path: &Path) -> Result<ExerciseSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exercise file: {}", path.display()))?;

    parse_exercise_set_str(&content, path)
}

/// Parse an exercise set from a string (useful for testing).
///
/// Missing ids are filled in (`ex-1`, `ex-2`, ...), a missing set id is taken
/// from the file stem, and `answer_power` is folded into numeric answers.
pub fn parse_exercise_set_str(content: &str, source_path: &Path) -> Result<ExerciseSet> {
    let mut set: ExerciseSet = parse_str(content, source_path)?;

    if set.id.is_empty() {
        set.id = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    if set.name.is_empty() {
        set.name = set.id.clone();
    }

    for (i, exercise) in set.exercises.iter_mut().enumerate() {
        if exercise.id.is_empty() {
            exercise.id = format!("ex-{}", i + 1);
        }
        apply_answer_power(exercise);
    }

    Ok(set)
}

/// Multiply a numeric answer by `10^answer_power` and round the result to
/// three significant digits. A zero or absent power leaves the answer alone.
pub fn apply_answer_power(exercise: &mut Exercise) {
    let Some(power) = exercise.answer_power.filter(|p| *p != 0.0) else {
        return;
    };

    match exercise.answer {
        Answer::Number(n) => {
            let scaled = n * 10f64.powf(power);
            exercise.answer = Answer::Number(round_significant(scaled, ANSWER_POWER_DIGITS));
        }
        Answer::Text(_) => {
            tracing::warn!(
                "exercise {}: answer_power ignored for a text answer",
                exercise.id
            );
        }
    }
}

/// Recursively load every `.json` and `.toml` exercise file under `dir`.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_exercise_directory(dir: &Path) -> Result<Vec<ExerciseSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            sets.extend(load_exercise_directory(&path)?);
        } else if Format::of(&path).is_some() {
            match load_exercise_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Load exercises from a file or a directory. A directory's sets are merged
/// into one set named after the directory.
pub fn load_exercises(path: &Path) -> Result<ExerciseSet> {
    if !path.is_dir() {
        return load_exercise_set(path);
    }

    let sets = load_exercise_directory(path)?;
    if sets.is_empty() {
        anyhow::bail!("no exercise files found in {}", path.display());
    }
    let id = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "exercises".to_string());
    Ok(ExerciseSet::merge(&id, sets))
}

/// A warning from catalog or exercise validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The exercise ID (if applicable).
    pub exercise_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn catalog(message: String) -> Self {
        Self {
            exercise_id: None,
            message,
        }
    }

    fn exercise(exercise: &Exercise, message: String) -> Self {
        Self {
            exercise_id: Some(exercise.id.clone()),
            message,
        }
    }
}

/// Validate a unit catalog for common issues.
pub fn validate_catalog(catalog: &UnitCatalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Unit names should be unique across the whole catalog
    let mut owner: HashMap<&str, &str> = HashMap::new();
    for set in &catalog.unit_set {
        let names = std::iter::once(set.main_unit.as_str())
            .chain(set.units.iter().map(|u| u.unit.as_str()));
        for name in names {
            match owner.get(name) {
                Some(first) => warnings.push(ValidationWarning::catalog(format!(
                    "duplicate unit name '{name}' (in '{first}' and '{}' sets); the first wins",
                    set.main_unit
                ))),
                None => {
                    owner.insert(name, &set.main_unit);
                }
            }
        }
    }

    for set in &catalog.unit_set {
        for unit in &set.units {
            if unit.conversion.parse::<Conversion>().is_err() {
                warnings.push(ValidationWarning::catalog(format!(
                    "malformed conversion rule for '{}': {:?}",
                    unit.unit, unit.conversion
                )));
            }
        }
    }

    warnings
}

/// Validate an exercise set for common issues, checking its units against
/// `units`.
pub fn validate_exercise_set(set: &ExerciseSet, units: &UnitIndex) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for exercise in &set.exercises {
        if !seen_ids.insert(&exercise.id) {
            warnings.push(ValidationWarning::exercise(
                exercise,
                format!("duplicate exercise ID: {}", exercise.id),
            ));
        }
    }

    for exercise in &set.exercises {
        if exercise.question.trim().is_empty() {
            warnings.push(ValidationWarning::exercise(
                exercise,
                "question is empty".into(),
            ));
        }

        if !exercise.expects_units() {
            continue;
        }

        if exercise.answer.as_text().is_some() {
            warnings.push(ValidationWarning::exercise(
                exercise,
                "text answer with answer_units can never be graded correct".into(),
            ));
        }

        let answer_set = units.lookup(&exercise.answer_units);
        if answer_set.is_none() {
            warnings.push(ValidationWarning::exercise(
                exercise,
                format!("answer unit '{}' is not in the catalog", exercise.answer_units),
            ));
        }

        if exercise.main_unit.is_empty() {
            continue;
        }
        match (answer_set, units.lookup(&exercise.main_unit)) {
            (_, None) => warnings.push(ValidationWarning::exercise(
                exercise,
                format!("main unit '{}' is not in the catalog", exercise.main_unit),
            )),
            (Some(a), Some(m)) if a.main_unit != m.main_unit => {
                warnings.push(ValidationWarning::exercise(
                    exercise,
                    format!(
                        "answer unit '{}' and main unit '{}' are in different unit sets",
                        exercise.answer_units, exercise.main_unit
                    ),
                ))
            }
            _ => {}
        }
    }

    warnings
}

/// Validate a catalog and an exercise set together.
pub fn validate(catalog: &UnitCatalog, set: &ExerciseSet) -> Vec<ValidationWarning> {
    let units = UnitIndex::new(catalog.clone());
    let mut warnings = validate_catalog(catalog);
    warnings.extend(validate_exercise_set(set, &units));
    warnings
}
