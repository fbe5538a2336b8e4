//! Subcommand implementations.

pub mod convert;
pub mod grade;
pub mod init;
pub mod practice;
pub mod report;
pub mod validate;

use anyhow::{Context, Result};

use mathdrill_core::config::{load_config_from, MathdrillConfig};
use mathdrill_core::model::{ExerciseSet, UnitCatalog};
use mathdrill_core::parser;

use crate::DataArgs;

/// Load the configuration and let command-line flags override it.
pub fn load_config(data: &DataArgs) -> Result<MathdrillConfig> {
    let mut config = load_config_from(data.config.as_deref())?;
    if let Some(units) = &data.units {
        config.units = units.clone();
    }
    if let Some(exercises) = &data.exercises {
        config.exercises = exercises.clone();
    }
    if let Some(style) = data.exponent_style {
        config.exponent_style = style;
    }
    Ok(config)
}

pub fn load_catalog(config: &MathdrillConfig) -> Result<UnitCatalog> {
    let catalog = parser::load_unit_catalog(&config.units)
        .with_context(|| format!("cannot load units from {}", config.units.display()))?;
    tracing::debug!(
        "loaded {} unit sets from {}",
        catalog.unit_set.len(),
        config.units.display()
    );
    Ok(catalog)
}

pub fn load_exercises(config: &MathdrillConfig) -> Result<ExerciseSet> {
    parser::load_exercises(&config.exercises)
        .with_context(|| format!("cannot load exercises from {}", config.exercises.display()))
}
