#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod grading;
pub mod model;
pub mod sandbox;

pub use catalog::{Catalog, CatalogError};
pub use error::Error;
pub use grading::grade;
pub use model::{Exercise, ExerciseError, ExerciseId, ExecutionResult, Verdict};
pub use sandbox::{LineBuffer, OutputSink, Sandbox};
