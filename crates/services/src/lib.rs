#![forbid(unsafe_code)]

pub mod dashboard;
pub mod error;
pub mod session;
pub mod submission;

pub use error::{DashboardError, SessionError, SubmitError};

pub use dashboard::{
    DailyCount, DashboardClient, DashboardOverview, LeaderboardEntry, ScoreAverages, ScoreBucket,
    Statistics, SubmissionRecord,
};
pub use session::{SessionProgress, TrainerSession};
pub use submission::{CollectorConfig, SubmissionPayload, SubmissionReceipt, SubmissionService};
