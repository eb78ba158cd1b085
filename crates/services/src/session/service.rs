use std::collections::BTreeSet;
use std::fmt;

use trainer_core::{Catalog, Exercise, Sandbox, Verdict, grade};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory trainer session over an ordered exercise catalog.
///
/// Tracks the active exercise, the set of completed indices, and the current
/// code/output buffers. Completion is monotone: once an index enters the
/// completed set, no navigation or re-run removes it. The score is always
/// derived from the set size, never counted separately.
pub struct TrainerSession {
    catalog: Catalog,
    sandbox: Sandbox,
    active: usize,
    completed: BTreeSet<usize>,
    code: String,
    output: String,
    verdict: Verdict,
}

impl TrainerSession {
    /// Start a session at the first exercise of the catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            sandbox: Sandbox::new(),
            active: 0,
            completed: BTreeSet::new(),
            code: String::new(),
            output: String::new(),
            verdict: Verdict::Pending,
        }
    }

    /// Replace the default sandbox, e.g. to tighten the step budget.
    #[must_use]
    pub fn with_sandbox(mut self, sandbox: Sandbox) -> Self {
        self.sandbox = sandbox;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The exercise the session is currently pointing at.
    #[must_use]
    pub fn active_exercise(&self) -> &Exercise {
        // `active` is kept in range by every transition.
        &self.catalog.exercises()[self.active]
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    #[must_use]
    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    /// Completed exercise indices in ascending order.
    #[must_use]
    pub fn completed_indices(&self) -> Vec<usize> {
        self.completed.iter().copied().collect()
    }

    /// Number of completed exercises, derived from the completion set.
    #[must_use]
    pub fn score(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.catalog.len()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total();
        let completed = self.score();
        SessionProgress {
            total,
            completed,
            remaining: total - completed,
            is_complete: completed == total,
        }
    }

    /// Jump to the given exercise.
    ///
    /// Clears the code/output buffers and resets the verdict to `Pending`,
    /// even when `index` is already active.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` for an invalid index; the
    /// session is left untouched.
    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.catalog.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.catalog.len(),
            });
        }
        self.active = index;
        self.reset_buffers();
        Ok(())
    }

    /// Run `code` against the active exercise and grade the captured output.
    ///
    /// On a correct run the active index joins the completed set (a no-op if
    /// already present). A failing or incorrect run changes nothing besides
    /// the buffers and verdict.
    pub fn run_active(&mut self, code: &str) -> Verdict {
        self.code = code.to_owned();
        let result = self.sandbox.execute(code);
        let verdict = grade(&result, self.active_exercise());
        self.output = result.output();
        self.verdict = verdict;
        if verdict.is_correct() {
            self.completed.insert(self.active);
        }
        tracing::debug!(index = self.active, verdict = %verdict, "graded run");
        verdict
    }

    /// Move to the next exercise after a correct run.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCleared` unless the current verdict is
    /// `Correct`, and `SessionError::AtEnd` on the last exercise. The active
    /// index is unchanged on error.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if !self.verdict.is_correct() {
            return Err(SessionError::NotCleared);
        }
        if self.active + 1 >= self.catalog.len() {
            return Err(SessionError::AtEnd);
        }
        self.select(self.active + 1)
    }

    /// Move to the previous exercise.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AtStart` when already at the first exercise.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        if self.active == 0 {
            return Err(SessionError::AtStart);
        }
        self.select(self.active - 1)
    }

    fn reset_buffers(&mut self) {
        self.code.clear();
        self.output.clear();
        self.verdict = Verdict::Pending;
    }
}

impl fmt::Debug for TrainerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainerSession")
            .field("catalog_len", &self.catalog.len())
            .field("active", &self.active)
            .field("completed", &self.completed)
            .field("verdict", &self.verdict)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
