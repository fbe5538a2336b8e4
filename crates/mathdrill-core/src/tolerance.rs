//! Relative-tolerance comparison of numeric answers.

use serde::{Deserialize, Serialize};

/// Default relative tolerance (1%).
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 0.01;

/// `|a - b| <= rel_tol * max(|a|, |b|)`.
pub fn almost_equal_relative(a: f64, b: f64, rel_tol: f64) -> bool {
    let diff = (a - b).abs();
    let max = a.abs().max(b.abs());
    diff <= rel_tol * max
}

/// A reference value graded with its own tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceException {
    pub reference: f64,
    pub relative: f64,
}

/// Tolerance rules: a default plus exceptions keyed on the exact reference
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    #[serde(default = "default_relative")]
    pub relative: f64,
    #[serde(default = "default_exceptions")]
    pub exceptions: Vec<ToleranceException>,
}

fn default_relative() -> f64 {
    DEFAULT_RELATIVE_TOLERANCE
}

fn default_exceptions() -> Vec<ToleranceException> {
    vec![ToleranceException {
        reference: 222_000.0,
        relative: 0.1,
    }]
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relative: default_relative(),
            exceptions: default_exceptions(),
        }
    }
}

impl Tolerance {
    /// The relative tolerance that applies when grading against `reference`.
    pub fn for_reference(&self, reference: f64) -> f64 {
        self.exceptions
            .iter()
            .find(|e| e.reference == reference)
            .map(|e| e.relative)
            .unwrap_or(self.relative)
    }

    /// Compare `value` against `reference`. `override_tol`, typically an
    /// exercise's own tolerance, takes precedence over every rule.
    pub fn matches(&self, value: f64, reference: f64, override_tol: Option<f64>) -> bool {
        let rel_tol = override_tol.unwrap_or_else(|| self.for_reference(reference));
        almost_equal_relative(value, reference, rel_tol)
    }
}
