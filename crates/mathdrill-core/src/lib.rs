//! mathdrill-core: Answer grading, unit conversion, and practice sessions.
//!
//! This crate defines the exercise and unit data model, the grading pipeline
//! (tokenizer, evaluator, unit conversion, tolerance), and the session state
//! that the mathdrill CLI builds on.

pub mod config;
pub mod display;
pub mod error;
pub mod evaluator;
pub mod grader;
pub mod input;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod tokenizer;
pub mod tolerance;
pub mod units;

pub use config::MathdrillConfig;
pub use error::{ConversionError, EvalError, SessionError};
pub use grader::{Grader, Reason, Verdict};
pub use model::{Answer, Exercise, ExerciseSet, UnitCatalog, UnitConversion, UnitSet};
pub use report::SessionReport;
pub use session::{Session, SessionStats};
pub use units::{Conversion, Converted, UnitIndex};
