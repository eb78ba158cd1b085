use std::fmt;

/// Outcome of grading a single run against the active exercise.
///
/// `Pending` is the initial state and the reset state after navigation,
/// before any run has happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    #[default]
    Pending,
    Correct,
    Incorrect,
}

impl Verdict {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pending => write!(f, "pending"),
            Verdict::Correct => write!(f, "correct"),
            Verdict::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// Captured result of one sandbox run.
///
/// Created fresh for every run request and discarded after grading. When the
/// run terminated abnormally, `raised` carries the error description and the
/// same text also appears as the final `Error: …` output line, so graders
/// never need to special-case failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    lines: Vec<String>,
    raised: Option<String>,
}

impl ExecutionResult {
    #[must_use]
    pub fn new(lines: Vec<String>, raised: Option<String>) -> Self {
        Self { lines, raised }
    }

    /// The emitted lines, in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Error description if the run terminated abnormally.
    #[must_use]
    pub fn raised(&self) -> Option<&str> {
        self.raised.as_deref()
    }

    /// The newline-joined captured output.
    #[must_use]
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_joins_lines_with_newlines() {
        let result = ExecutionResult::new(vec!["Hello".into(), "Python".into()], None);
        assert_eq!(result.output(), "Hello\nPython");
        assert!(result.raised().is_none());
    }

    #[test]
    fn empty_result_has_empty_output() {
        let result = ExecutionResult::new(Vec::new(), None);
        assert_eq!(result.output(), "");
    }

    #[test]
    fn verdict_defaults_to_pending() {
        assert_eq!(Verdict::default(), Verdict::Pending);
        assert!(!Verdict::Pending.is_correct());
        assert!(Verdict::Correct.is_correct());
    }
}
