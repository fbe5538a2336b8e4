//! Grading error types.
//!
//! Conversion and evaluation report failure through these enums instead of
//! sentinel values, so a legitimate result of `0` is never mistaken for a
//! failure. The grader absorbs all of them into an incorrect verdict.

use thiserror::Error;

/// Errors from the unit conversion engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The unit does not appear in any unit set of the catalog.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// The target unit exists but belongs to a different unit set.
    #[error("unit '{unit}' is not convertible to '{main_unit}' units")]
    NotInSet { unit: String, main_unit: String },

    /// The conversion rule of a unit could not be parsed.
    #[error("malformed conversion rule for '{unit}': {rule:?}")]
    MalformedRule { unit: String, rule: String },

    /// The arithmetic produced NaN or an infinity.
    #[error("conversion of {value} {unit} produced a non-finite value")]
    NonFinite { unit: String, value: f64 },
}

/// Errors from the arithmetic expression evaluator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Nothing left to evaluate.
    #[error("empty expression")]
    Empty,

    /// A token that is neither a number nor an operator.
    #[error("unexpected {found:?} at position {position}")]
    Unexpected { found: String, position: usize },

    /// The expression ended where an operand was required.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// The result was NaN or infinite, e.g. a division by zero.
    #[error("expression {0:?} does not evaluate to a finite number")]
    NonFinite(String),
}

/// Errors from misusing a practice session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The exercise set had no exercises to draw from.
    #[error("exercise set is empty")]
    NoExercises,

    /// `submit` was called twice for the same exercise.
    #[error("exercise '{0}' was already answered, call next() first")]
    AlreadySubmitted(String),
}

impl ConversionError {
    /// Returns `true` if the failure comes from the catalog data rather than
    /// from the answer being graded.
    pub fn is_data_error(&self) -> bool {
        matches!(self, ConversionError::MalformedRule { .. })
    }
}
