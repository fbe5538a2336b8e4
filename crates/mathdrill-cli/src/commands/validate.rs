//! The `mathdrill validate` command.

use anyhow::Result;

use mathdrill_core::parser::{validate_catalog, validate_exercise_set, ValidationWarning};
use mathdrill_core::units::UnitIndex;

use crate::DataArgs;

fn print_warnings(warnings: &[ValidationWarning]) {
    for w in warnings {
        let prefix = w
            .exercise_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
}

pub fn execute(data: DataArgs) -> Result<()> {
    let config = super::load_config(&data)?;
    let catalog = super::load_catalog(&config)?;
    let set = super::load_exercises(&config)?;

    println!(
        "Unit catalog: {} ({} unit sets, {} units)",
        config.units.display(),
        catalog.unit_set.len(),
        catalog.unit_count()
    );
    let catalog_warnings = validate_catalog(&catalog);
    print_warnings(&catalog_warnings);

    println!("Exercise set: {} ({} exercises)", set.name, set.exercises.len());
    let units = UnitIndex::new(catalog);
    let exercise_warnings = validate_exercise_set(&set, &units);
    print_warnings(&exercise_warnings);

    let total_warnings = catalog_warnings.len() + exercise_warnings.len();
    if total_warnings == 0 {
        println!("All units and exercises valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
