//! Unit conversion engine.
//!
//! Every conversion routes through the main unit of a unit set. A unit's
//! rule string describes how to go from the main unit to that unit:
//! `"*100"` for `cm` means `cm = m * 100`, so converting back to the main unit
//! divides by 100.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::model::{UnitCatalog, UnitSet};

/// Operator half of a conversion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOp {
    Multiply,
    Divide,
}

/// A parsed conversion rule such as `*1000`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub op: ConversionOp,
    pub factor: f64,
}

impl Conversion {
    /// Apply the rule in its stated direction: main unit to this unit.
    pub fn from_main(&self, value: f64) -> f64 {
        match self.op {
            ConversionOp::Multiply => value * self.factor,
            ConversionOp::Divide => value / self.factor,
        }
    }

    /// Apply the rule inverted: this unit to main unit.
    pub fn to_main(&self, value: f64) -> f64 {
        match self.op {
            ConversionOp::Multiply => value / self.factor,
            ConversionOp::Divide => value * self.factor,
        }
    }
}

impl FromStr for Conversion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let op = match chars.next() {
            Some('*') => ConversionOp::Multiply,
            Some('/') => ConversionOp::Divide,
            _ => return Err(()),
        };
        let factor: f64 = chars.as_str().trim().parse().map_err(|_| ())?;
        if !factor.is_finite() || factor == 0.0 {
            return Err(());
        }
        Ok(Conversion { op, factor })
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            ConversionOp::Multiply => '*',
            ConversionOp::Divide => '/',
        };
        write!(f, "{op}{}", self.factor)
    }
}

/// A value tagged with the unit it is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Converted {
    pub unit: String,
    pub value: f64,
}

fn parse_rule(set: &UnitSet, unit: &str) -> Result<Conversion, ConversionError> {
    let rule = set.rule_for(unit).ok_or_else(|| ConversionError::NotInSet {
        unit: unit.to_string(),
        main_unit: set.main_unit.clone(),
    })?;
    rule.parse().map_err(|_| ConversionError::MalformedRule {
        unit: unit.to_string(),
        rule: rule.to_string(),
    })
}

fn finite(unit: &str, value: f64) -> Result<f64, ConversionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::NonFinite {
            unit: unit.to_string(),
            value,
        })
    }
}

/// Convert `value` from `from` to `to`, both expected in `set`.
pub fn convert_in_set(
    set: &UnitSet,
    from: &str,
    value: f64,
    to: &str,
) -> Result<Converted, ConversionError> {
    let main = set.main_unit.as_str();

    let main_value = if from == main {
        value
    } else {
        finite(from, parse_rule(set, from)?.to_main(value))?
    };

    if to == main {
        return Ok(Converted {
            unit: main.to_string(),
            value: finite(main, main_value)?,
        });
    }

    let target_value = parse_rule(set, to)?.from_main(main_value);
    Ok(Converted {
        unit: to.to_string(),
        value: finite(to, target_value)?,
    })
}

/// Convert by scanning the catalog for the unit set containing `from`.
pub fn convert(
    catalog: &UnitCatalog,
    from: &str,
    value: f64,
    to: &str,
) -> Result<Converted, ConversionError> {
    let set = catalog
        .find_set(from)
        .ok_or_else(|| ConversionError::UnknownUnit(from.to_string()))?;
    convert_in_set(set, from, value, to)
}

/// A unit catalog with a name → set lookup table.
///
/// The first occurrence of a unit name wins, matching [`UnitCatalog::find_set`].
#[derive(Debug, Clone, Default)]
pub struct UnitIndex {
    catalog: UnitCatalog,
    by_name: HashMap<String, usize>,
}

impl UnitIndex {
    pub fn new(catalog: UnitCatalog) -> Self {
        let mut by_name = HashMap::with_capacity(catalog.unit_count());
        for (i, set) in catalog.unit_set.iter().enumerate() {
            let names = std::iter::once(set.main_unit.as_str())
                .chain(set.units.iter().map(|u| u.unit.as_str()));
            for name in names {
                by_name.entry(name.to_string()).or_insert(i);
            }
        }
        Self { catalog, by_name }
    }

    pub fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }

    /// The unit set containing `unit`.
    pub fn lookup(&self, unit: &str) -> Option<&UnitSet> {
        self.by_name
            .get(unit)
            .and_then(|&i| self.catalog.unit_set.get(i))
    }

    pub fn convert(&self, from: &str, value: f64, to: &str) -> Result<Converted, ConversionError> {
        let set = self
            .lookup(from)
            .ok_or_else(|| ConversionError::UnknownUnit(from.to_string()))?;
        let converted = convert_in_set(set, from, value, to);
        if let Err(e) = &converted {
            if e.is_data_error() {
                tracing::warn!("unit catalog: {e}");
            }
        }
        converted
    }
}

impl From<UnitCatalog> for UnitIndex {
    fn from(catalog: UnitCatalog) -> Self {
        UnitIndex::new(catalog)
    }
}
