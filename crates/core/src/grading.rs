//! Pure comparison policy turning a captured run into a verdict.

use crate::model::{Exercise, ExecutionResult, Verdict};

/// Grade a captured run against an exercise.
///
/// With a defined expected output, both sides are trimmed of leading and
/// trailing whitespace and must match exactly, embedded newlines included.
/// Open-ended exercises accept any non-empty trimmed output. An `Error: …`
/// line is ordinary captured text; it is not special-cased and simply fails
/// an exact-match comparison like any other wrong output.
#[must_use]
pub fn grade(result: &ExecutionResult, exercise: &Exercise) -> Verdict {
    let output = result.output();
    let output = output.trim();

    match exercise.expected_output() {
        Some(expected) => {
            if output == expected.trim() {
                Verdict::Correct
            } else {
                Verdict::Incorrect
            }
        }
        None => {
            if output.is_empty() {
                Verdict::Incorrect
            } else {
                Verdict::Correct
            }
        }
    }
}
