mod execution;
mod exercise;
mod ids;

pub use execution::{ExecutionResult, Verdict};
pub use exercise::{Exercise, ExerciseError};
pub use ids::{ExerciseId, ParseIdError};
