use thiserror::Error;

use crate::model::ids::ExerciseId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("exercise id must be positive")]
    InvalidId,

    #[error("exercise title cannot be empty")]
    EmptyTitle,

    #[error("exercise description cannot be empty")]
    EmptyDescription,
}

/// A single catalog entry.
///
/// Constructed once at process start and never mutated. `expected_output`
/// of `None` marks an open-ended exercise where any non-empty output
/// qualifies as correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    id: ExerciseId,
    title: String,
    description: String,
    expected_output: Option<String>,
    hint: String,
}

impl Exercise {
    /// Create a validated exercise.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError` if the id is zero or title/description are
    /// empty after trimming.
    pub fn new(
        id: ExerciseId,
        title: impl Into<String>,
        description: impl Into<String>,
        expected_output: Option<String>,
        hint: impl Into<String>,
    ) -> Result<Self, ExerciseError> {
        let title = title.into();
        let description = description.into();

        if id.value() == 0 {
            return Err(ExerciseError::InvalidId);
        }
        if title.trim().is_empty() {
            return Err(ExerciseError::EmptyTitle);
        }
        if description.trim().is_empty() {
            return Err(ExerciseError::EmptyDescription);
        }

        Ok(Self {
            id,
            title,
            description,
            expected_output,
            hint: hint.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> ExerciseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn expected_output(&self) -> Option<&str> {
        self.expected_output.as_deref()
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// True when any non-empty output counts as a correct answer.
    #[must_use]
    pub fn is_open_ended(&self) -> bool {
        self.expected_output.is_none()
    }
}
