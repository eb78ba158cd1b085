//! Submission assembler: validates learner input, builds the score payload,
//! and posts it to the remote collection service.

use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SubmitError;
use crate::session::TrainerSession;

/// Public collection endpoint used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://raas.on.shiper.app/api";

#[derive(Clone, Debug)]
pub struct CollectorConfig {
    pub base_url: String,
}

impl CollectorConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("TRAINER_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self { base_url }
    }
}

/// Score snapshot sent to `POST /api/submit`.
///
/// Derived from session state at submission time; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub user_name: String,
    pub score: usize,
    pub total: usize,
    pub completed_exercises: Vec<usize>,
}

/// Acknowledgement returned by an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitEnvelope {
    success: bool,
    message: Option<String>,
}

/// Posts score snapshots to the collection service.
///
/// Submission is not idempotent at the protocol level: every accepted
/// request creates a new server-side record, and nothing here deduplicates
/// repeats. Callers are responsible for not starting a second submission
/// while one is in flight.
#[derive(Clone)]
pub struct SubmissionService {
    client: Client,
    config: CollectorConfig,
}

impl SubmissionService {
    #[must_use]
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(CollectorConfig::from_env())
    }

    /// Validate inputs and derive the payload without touching the network.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::MissingName` for a name that is empty after
    /// trimming, and `SubmitError::MissingScoreData` when there is no score
    /// data to submit. Checks run in that order and the first failure wins.
    pub fn build_payload(
        name: &str,
        session: &TrainerSession,
    ) -> Result<SubmissionPayload, SubmitError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SubmitError::MissingName);
        }
        if session.total() == 0 {
            return Err(SubmitError::MissingScoreData);
        }

        Ok(SubmissionPayload {
            user_name: trimmed.to_owned(),
            score: session.score(),
            total: session.total(),
            completed_exercises: session.completed_indices(),
        })
    }

    /// Submit the session's score snapshot under the given name.
    ///
    /// Issues a single request; rejected or unreachable submissions are not
    /// retried and leave the session untouched.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::MissingName`/`MissingScoreData` without issuing
    /// a request, `SubmitError::Rejected` for a non-success status (carrying
    /// the status and response body for diagnostics), and
    /// `SubmitError::Unreachable` when no response was obtained.
    pub async fn submit(
        &self,
        name: &str,
        session: &TrainerSession,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let payload = Self::build_payload(name, session)?;

        let url = format!("{}/submit", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(SubmitError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "collection service rejected submission");
            return Err(SubmitError::Rejected { status, body });
        }

        let envelope: SubmitEnvelope = response
            .json()
            .await
            .map_err(|_| SubmitError::InvalidResponse)?;
        if !envelope.success {
            warn!("collection service reported failure despite success status");
            return Err(SubmitError::Rejected {
                status,
                body: envelope.message.unwrap_or_default(),
            });
        }

        info!(
            score = payload.score,
            total = payload.total,
            "submission accepted"
        );
        Ok(SubmissionReceipt {
            message: envelope.message,
        })
    }
}
