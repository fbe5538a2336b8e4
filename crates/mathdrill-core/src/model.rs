//! Core data model types for mathdrill.
//!
//! These are the types loaded from the unit catalog and exercise files and
//! passed, read-only, through the grading pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One convertible unit inside a [`UnitSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConversion {
    /// Unit name as typed by the user (e.g. "cm").
    pub unit: String,
    /// How to get from the main unit to this unit: an operator (`*` or `/`)
    /// followed by a number, e.g. `"*100"` for centimetres of a metre.
    pub conversion: String,
}

/// A family of mutually convertible units sharing one main unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSet {
    /// The canonical unit all conversions route through.
    pub main_unit: String,
    /// Every other unit of the family.
    #[serde(default)]
    pub units: Vec<UnitConversion>,
}

impl UnitSet {
    /// Whether `unit` is the main unit or one of the listed units.
    pub fn contains(&self, unit: &str) -> bool {
        self.main_unit == unit || self.units.iter().any(|u| u.unit == unit)
    }

    /// The raw conversion rule for a non-main unit.
    pub fn rule_for(&self, unit: &str) -> Option<&str> {
        self.units
            .iter()
            .find(|u| u.unit == unit)
            .map(|u| u.conversion.as_str())
    }
}

/// The ordered list of unit sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitCatalog {
    #[serde(default)]
    pub unit_set: Vec<UnitSet>,
}

impl UnitCatalog {
    pub fn new(unit_set: Vec<UnitSet>) -> Self {
        Self { unit_set }
    }

    /// First unit set containing `unit`, scanning in catalog order.
    pub fn find_set(&self, unit: &str) -> Option<&UnitSet> {
        self.unit_set.iter().find(|set| set.contains(unit))
    }

    /// Number of unit names (main units included) in the catalog.
    pub fn unit_count(&self) -> usize {
        self.unit_set.iter().map(|s| s.units.len() + 1).sum()
    }
}

/// The reference answer of an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(f64),
    Text(String),
}

impl Answer {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Answer::Number(n) => Some(*n),
            Answer::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Number(_) => None,
            Answer::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Number(n) => write!(f, "{}", crate::display::js_number_string(*n)),
            Answer::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A single practice exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Identifier; assigned from the position in the set when missing.
    #[serde(default)]
    pub id: String,
    /// Question text, may contain inline markup.
    pub question: String,
    /// Reference answer.
    pub answer: Answer,
    /// Label shown next to the answer field (e.g. "v =").
    #[serde(default)]
    pub answer_text: String,
    /// Unit the reference answer is expressed in; empty for unitless answers.
    #[serde(default)]
    pub answer_units: String,
    /// Unit the correct answer is displayed in after a wrong submission.
    #[serde(default)]
    pub main_unit: String,
    /// Power of ten applied to a numeric answer at load time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_power: Option<f64>,
    /// Relative tolerance for this exercise, overriding the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    /// Tags for filtering.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Exercise {
    /// Whether the answer must carry a unit.
    pub fn expects_units(&self) -> bool {
        !self.answer_units.is_empty()
    }
}

/// A collection of exercises.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl ExerciseSet {
    /// Look up an exercise by id, falling back to a 1-based index.
    pub fn find(&self, key: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == key).or_else(|| {
            key.parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| self.exercises.get(i))
        })
    }

    /// Concatenate several sets into one, keeping exercise order.
    pub fn merge(id: &str, sets: Vec<ExerciseSet>) -> ExerciseSet {
        let name = match sets.as_slice() {
            [only] => only.name.clone(),
            _ => id.to_string(),
        };
        ExerciseSet {
            id: id.to_string(),
            name,
            description: String::new(),
            exercises: sets.into_iter().flat_map(|s| s.exercises).collect(),
        }
    }
}

/// How a `<sup>` group following a number is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExponentStyle {
    /// `a<sup>b</sup>` is `a` raised to `b`; `10<sup>3</sup>` is 1000.
    #[default]
    Power,
    /// `a<sup>b</sup>` is `a * 10^b`.
    Scientific,
}

impl fmt::Display for ExponentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExponentStyle::Power => write!(f, "power"),
            ExponentStyle::Scientific => write!(f, "scientific"),
        }
    }
}

impl FromStr for ExponentStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "power" | "pow" => Ok(ExponentStyle::Power),
            "scientific" | "sci" => Ok(ExponentStyle::Scientific),
            other => Err(format!("unknown exponent style: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_deserializes_number_or_text() {
        let n: Answer = serde_json::from_str("100").unwrap();
        assert_eq!(n, Answer::Number(100.0));
        let t: Answer = serde_json::from_str("\"Paris\"").unwrap();
        assert_eq!(t.as_text(), Some("Paris"));
        assert_eq!(t.as_number(), None);
    }

    #[test]
    fn exercise_defaults() {
        let json = r#"{"question": "Capital of France?", "answer": "Paris"}"#;
        let ex: Exercise = serde_json::from_str(json).unwrap();
        assert!(ex.id.is_empty());
        assert!(!ex.expects_units());
        assert_eq!(ex.answer_power, None);
        assert_eq!(ex.tolerance, None);
    }

    #[test]
    fn catalog_first_match_wins() {
        let catalog: UnitCatalog = serde_json::from_str(
            r#"{"unit_set": [
                {"main_unit": "m", "units": [{"unit": "x", "conversion": "*2"}]},
                {"main_unit": "s", "units": [{"unit": "x", "conversion": "*3"}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(catalog.find_set("x").unwrap().main_unit, "m");
        assert_eq!(catalog.find_set("s").unwrap().main_unit, "s");
        assert!(catalog.find_set("kg").is_none());
        assert_eq!(catalog.unit_count(), 4);
    }

    #[test]
    fn find_by_id_or_index() {
        let ex = |id: &str| Exercise {
            id: id.into(),
            question: String::new(),
            answer: Answer::Number(1.0),
            answer_text: String::new(),
            answer_units: String::new(),
            main_unit: String::new(),
            answer_power: None,
            tolerance: None,
            tags: vec![],
        };
        let set = ExerciseSet {
            exercises: vec![ex("speed"), ex("mass")],
            ..Default::default()
        };
        assert_eq!(set.find("mass").unwrap().id, "mass");
        assert_eq!(set.find("1").unwrap().id, "speed");
        assert!(set.find("0").is_none());
        assert!(set.find("3").is_none());
    }

    #[test]
    fn exponent_style_display_and_parse() {
        assert_eq!(ExponentStyle::Power.to_string(), "power");
        assert_eq!(
            "Scientific".parse::<ExponentStyle>().unwrap(),
            ExponentStyle::Scientific
        );
        assert!("binary".parse::<ExponentStyle>().is_err());
        assert_eq!(ExponentStyle::default(), ExponentStyle::Power);
    }
}
