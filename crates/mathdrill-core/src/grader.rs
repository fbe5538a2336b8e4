//! Answer grading pipeline.
//!
//! tokenize → evaluate the numeric stream → join the unit words → convert
//! into the exercise's unit → compare within tolerance. Every failure along
//! the way is an incorrect verdict, never an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::display::{exponent_markup, js_number_string};
use crate::evaluator::evaluate;
use crate::model::{Answer, Exercise, ExponentStyle, UnitCatalog};
use crate::tokenizer::Tokenizer;
use crate::tolerance::Tolerance;
use crate::units::UnitIndex;

/// Why an answer was judged the way it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Numeric value within tolerance.
    WithinTolerance,
    /// Text answer matched exactly.
    TextMatch,
    /// Numeric value outside tolerance.
    OutOfTolerance,
    /// Text answer did not match, or a text reference was given units.
    TextMismatch,
    /// Units were expected but none were given.
    MissingUnit,
    /// The numeric part could not be evaluated.
    NoValue,
    /// The given unit could not be converted into the expected one.
    Unconvertible,
}

impl Reason {
    pub fn is_correct(self) -> bool {
        matches!(self, Reason::WithinTolerance | Reason::TextMatch)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reason::WithinTolerance => "within tolerance",
            Reason::TextMatch => "text match",
            Reason::OutOfTolerance => "out of tolerance",
            Reason::TextMismatch => "text mismatch",
            Reason::MissingUnit => "missing unit",
            Reason::NoValue => "no numeric value",
            Reason::Unconvertible => "unit not convertible",
        };
        write!(f, "{s}")
    }
}

/// The outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub correct: bool,
    pub reason: Reason,
    /// Value of the numeric part, if it evaluated.
    pub value: Option<f64>,
    /// Joined unit string of the answer.
    pub unit: String,
    /// Value converted into the exercise's answer unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted: Option<f64>,
    /// The reference answer as display markup.
    pub expected: String,
}

/// Grades answers against exercises using one unit catalog.
#[derive(Debug, Clone, Default)]
pub struct Grader {
    units: UnitIndex,
    tolerance: Tolerance,
    tokenizer: Tokenizer,
}

impl Grader {
    pub fn new(units: impl Into<UnitIndex>) -> Self {
        Self {
            units: units.into(),
            tolerance: Tolerance::default(),
            tokenizer: Tokenizer::default(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_exponent_style(mut self, style: ExponentStyle) -> Self {
        self.tokenizer = Tokenizer::new(style);
        self
    }

    pub fn catalog(&self) -> &UnitCatalog {
        self.units.catalog()
    }

    /// Grade a raw answer string.
    pub fn grade(&self, exercise: &Exercise, answer: &str) -> Verdict {
        let tokens = self.tokenizer.tokenize(answer);
        let value = match evaluate(&tokens.numeric) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!(exercise = %exercise.id, "numeric part not evaluated: {e}");
                None
            }
        };
        let unit = tokens.unit_string();

        let (reason, converted) = self.judge(exercise, value, &unit);
        tracing::debug!(
            exercise = %exercise.id,
            answer,
            unit = %unit,
            %reason,
            "graded"
        );

        Verdict {
            correct: reason.is_correct(),
            reason,
            value,
            unit,
            converted,
            expected: self.better_answer(exercise),
        }
    }

    /// Decide correctness from an evaluated value and a joined unit string.
    /// Returns the reason and, when a conversion ran, the converted value.
    pub fn judge(&self, exercise: &Exercise, value: Option<f64>, unit: &str) -> (Reason, Option<f64>) {
        if !exercise.expects_units() {
            let reason = match (&exercise.answer, value) {
                (Answer::Text(text), _) if text == unit => Reason::TextMatch,
                (Answer::Text(_), _) => Reason::TextMismatch,
                (Answer::Number(_), None) => Reason::NoValue,
                (Answer::Number(expected), Some(v)) => self.compare(exercise, v, *expected),
            };
            return (reason, None);
        }

        if unit.is_empty() {
            return (Reason::MissingUnit, None);
        }
        let Some(value) = value else {
            return (Reason::NoValue, None);
        };

        let converted = match self.units.convert(unit, value, &exercise.answer_units) {
            Ok(c) => c.value,
            Err(e) => {
                tracing::debug!(exercise = %exercise.id, "conversion failed: {e}");
                return (Reason::Unconvertible, None);
            }
        };

        let reason = match exercise.answer {
            Answer::Number(expected) => self.compare(exercise, converted, expected),
            Answer::Text(_) => Reason::TextMismatch,
        };
        (reason, Some(converted))
    }

    fn compare(&self, exercise: &Exercise, value: f64, expected: f64) -> Reason {
        if self.tolerance.matches(value, expected, exercise.tolerance) {
            Reason::WithinTolerance
        } else {
            Reason::OutOfTolerance
        }
    }

    /// The reference answer expressed in the exercise's main unit, as
    /// display markup (`1.5 * 10<sup>21</sup> m`).
    pub fn better_answer(&self, exercise: &Exercise) -> String {
        let Some(answer) = exercise.answer.as_number().filter(|_| exercise.expects_units()) else {
            return exercise.answer.to_string();
        };

        match self
            .units
            .convert(&exercise.answer_units, answer, &exercise.main_unit)
        {
            Ok(c) => format!("{} {}", exponent_markup(&js_number_string(c.value)), c.unit),
            Err(_) => format!(
                "{} {}",
                exponent_markup(&js_number_string(answer)),
                exercise.answer_units
            ),
        }
    }
}
