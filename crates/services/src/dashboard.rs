//! Read-only client for the collection service's analytics endpoints.
//!
//! Consumed by dashboard frontends; the trainer core itself only writes
//! through `SubmissionService`. Every response arrives wrapped in a
//! `{ success, data }` envelope.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::DashboardError;
use crate::submission::CollectorConfig;

/// Limits matching what the dashboard overview displays.
pub const RECENT_SUBMISSIONS_LIMIT: usize = 100;
pub const LEADERBOARD_LIMIT: usize = 20;
pub const DAILY_WINDOW_DAYS: usize = 30;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

/// One recorded submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_name: String,
    pub score: u32,
    pub total: u32,
    #[serde(default)]
    pub completed_exercises: Vec<usize>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct SubmissionsPage {
    submissions: Vec<SubmissionRecord>,
}

/// Aggregate counters over all submissions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_submissions: u64,
    pub averages: ScoreAverages,
    #[serde(default)]
    pub scores_distribution: Vec<ScoreBucket>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAverages {
    pub average_score: f64,
    pub average_percentage: f64,
    pub max_score: u32,
}

/// Number of submissions that reached a given score.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreBucket {
    #[serde(rename = "_id")]
    pub score: u32,
    pub count: u64,
}

/// Per-user ranking entry, ordered descending by best score.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_name: String,
    pub best_score: u32,
    pub average_score: f64,
    pub attempts: u32,
}

/// Submission count for one calendar day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyCount {
    #[serde(rename = "_id")]
    pub day: String,
    pub count: u64,
}

/// Everything the dashboard overview needs, fetched in one shot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    pub recent_submissions: Vec<SubmissionRecord>,
    pub statistics: Statistics,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub daily_submissions: Vec<DailyCount>,
}

#[derive(Clone)]
pub struct DashboardClient {
    client: Client,
    config: CollectorConfig,
}

impl DashboardClient {
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

    /// Most recent submissions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError` for HTTP failures or a failure envelope.
    pub async fn submissions(
        &self,
        limit: usize,
    ) -> Result<Vec<SubmissionRecord>, DashboardError> {
        let page: SubmissionsPage = self.fetch(&format!("submissions?limit={limit}")).await?;
        Ok(page.submissions)
    }

    /// Aggregate statistics over all submissions.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError` for HTTP failures or a failure envelope.
    pub async fn statistics(&self) -> Result<Statistics, DashboardError> {
        self.fetch("statistics").await
    }

    /// Per-user best/average scores, ranked descending by best score.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError` for HTTP failures or a failure envelope.
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DashboardError> {
        self.fetch(&format!("leaderboard?limit={limit}")).await
    }

    /// Per-day submission counts for the trailing window.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError` for HTTP failures or a failure envelope.
    pub async fn daily_submissions(&self, days: usize) -> Result<Vec<DailyCount>, DashboardError> {
        self.fetch(&format!("analytics/daily-submissions?days={days}"))
            .await
    }

    /// Fetch all overview slices concurrently.
    ///
    /// The four reads are independent and may complete in any order; each
    /// populates its own slice of the overview.
    ///
    /// # Errors
    ///
    /// Returns the first `DashboardError` among the four requests.
    pub async fn overview(&self) -> Result<DashboardOverview, DashboardError> {
        let (submissions, statistics, leaderboard, daily) = tokio::join!(
            self.submissions(RECENT_SUBMISSIONS_LIMIT),
            self.statistics(),
            self.leaderboard(LEADERBOARD_LIMIT),
            self.daily_submissions(DAILY_WINDOW_DAYS),
        );

        Ok(DashboardOverview {
            recent_submissions: submissions?,
            statistics: statistics?,
            leaderboard: leaderboard?,
            daily_submissions: daily?,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        let url = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DashboardError::HttpStatus(response.status()));
        }

        let envelope: Envelope<T> = response.json().await?;
        if !envelope.success {
            return Err(DashboardError::Failure(
                envelope.message.unwrap_or_default(),
            ));
        }
        envelope.data.ok_or(DashboardError::MissingData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::Server) -> DashboardClient {
        DashboardClient::new(CollectorConfig::new(format!("{}/api", server.url())))
    }

    #[tokio::test]
    async fn parses_statistics_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/statistics")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "success": true,
                    "data": {
                        "totalSubmissions": 12,
                        "averages": {
                            "averageScore": 14.5,
                            "averagePercentage": 72.5,
                            "maxScore": 20
                        },
                        "scoresDistribution": [
                            { "_id": 20, "count": 3 },
                            { "_id": 14, "count": 9 }
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let stats = client(&server).statistics().await.unwrap();
        assert_eq!(stats.total_submissions, 12);
        assert_eq!(stats.averages.max_score, 20);
        assert_eq!(stats.scores_distribution[0].score, 20);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn parses_submissions_page() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/submissions?limit=2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "success": true,
                    "data": {
                        "submissions": [{
                            "_id": "abc123",
                            "userName": "Ada Lovelace",
                            "score": 18,
                            "total": 20,
                            "completedExercises": [0, 1, 2],
                            "timestamp": "2025-11-02T10:15:00Z"
                        }]
                    }
                }"#,
            )
            .create_async()
            .await;

        let submissions = client(&server).submissions(2).await.unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].user_name, "Ada Lovelace");
        assert_eq!(submissions[0].score, 18);
    }

    #[tokio::test]
    async fn failure_envelope_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/statistics")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": false, "message": "aggregation failed"}"#)
            .create_async()
            .await;

        let err = client(&server).statistics().await.unwrap_err();
        assert!(matches!(err, DashboardError::Failure(msg) if msg == "aggregation failed"));
    }

    #[tokio::test]
    async fn non_success_status_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/leaderboard?limit=5")
            .with_status(503)
            .create_async()
            .await;

        let err = client(&server).leaderboard(5).await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::HttpStatus(status) if status.as_u16() == 503
        ));
    }

    #[tokio::test]
    async fn overview_combines_all_four_endpoints() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/submissions?limit=100")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "data": {"submissions": []}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/statistics")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "success": true,
                    "data": {
                        "totalSubmissions": 0,
                        "averages": {
                            "averageScore": 0.0,
                            "averagePercentage": 0.0,
                            "maxScore": 0
                        },
                        "scoresDistribution": []
                    }
                }"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/api/leaderboard?limit=20")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "data": []}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/analytics/daily-submissions?days=30")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "data": [{"_id": "2025-11-02", "count": 4}]}"#)
            .create_async()
            .await;

        let overview = client(&server).overview().await.unwrap();
        assert!(overview.recent_submissions.is_empty());
        assert_eq!(overview.statistics.total_submissions, 0);
        assert!(overview.leaderboard.is_empty());
        assert_eq!(overview.daily_submissions[0].day, "2025-11-02");
        assert_eq!(overview.daily_submissions[0].count, 4);
    }
}
