//! The `mathdrill convert` command.

use anyhow::{Context, Result};

use mathdrill_core::display::{js_number_string, strip_markup};
use mathdrill_core::units::UnitIndex;

use crate::DataArgs;

pub fn execute(data: DataArgs, from: String, to: String, value: f64) -> Result<()> {
    let config = super::load_config(&data)?;
    let units = UnitIndex::new(super::load_catalog(&config)?);

    let converted = units
        .convert(&from, value, &to)
        .with_context(|| format!("cannot convert {value} {from} to {to}"))?;

    println!(
        "{} {}",
        js_number_string(converted.value),
        strip_markup(&converted.unit)
    );
    Ok(())
}
