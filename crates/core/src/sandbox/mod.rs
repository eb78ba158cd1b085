//! Restricted execution sandbox for learner-submitted code.
//!
//! Source text is interpreted directly by a small lexer/parser/evaluator
//! rather than handed to any host runtime. The only observable effect of a
//! run is the lines appended to the output collector, which is an explicit
//! object threaded through the evaluation call: there is no process-wide
//! output hook to install or restore, and concurrent sessions cannot observe
//! each other.

mod eval;
mod lexer;
mod parser;
mod value;

pub use eval::{Evaluator, RuntimeError};
pub use lexer::LexError;
pub use parser::SyntaxError;
pub use value::Value;

use crate::model::ExecutionResult;

/// Default evaluation step budget per run.
pub const DEFAULT_STEP_LIMIT: u64 = 100_000;

/// Append-only collector for emitted output lines.
///
/// Learner code reaches this only through `print`, which appends exactly one
/// line per call.
pub trait OutputSink {
    fn emit(&mut self, line: String);
}

/// In-memory `OutputSink` backed by a line vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl OutputSink for LineBuffer {
    fn emit(&mut self, line: String) {
        self.lines.push(line);
    }
}

/// Executes learner source text and captures its output.
///
/// The sandbox never lets a learner error escape: lexing, parsing, and
/// runtime failures all surface as a single `Error: <message>` line appended
/// to the captured output, and `execute` always returns a result.
#[derive(Debug, Clone)]
pub struct Sandbox {
    step_limit: u64,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

impl Sandbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the evaluation step budget.
    #[must_use]
    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Run `source` and return the captured output.
    ///
    /// A failing run keeps the lines emitted before the failure, appends one
    /// `Error: <message>` line, and records the message in `raised`. A
    /// syntax error anywhere fails the whole run before anything executes.
    #[must_use]
    pub fn execute(&self, source: &str) -> ExecutionResult {
        let mut buffer = LineBuffer::new();
        let raised = match parser::parse(source) {
            Err(err) => Some(err.to_string()),
            Ok(stmts) => Evaluator::new(&mut buffer, self.step_limit)
                .run(&stmts)
                .err()
                .map(|err| err.to_string()),
        };

        if let Some(message) = &raised {
            buffer.emit(format!("Error: {message}"));
        }

        ExecutionResult::new(buffer.into_lines(), raised)
    }
}
