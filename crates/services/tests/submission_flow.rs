use mockito::Matcher;
use services::{CollectorConfig, SubmissionService, SubmitError, TrainerSession};
use trainer_core::Catalog;

fn solved_session() -> TrainerSession {
    let mut session = TrainerSession::new(Catalog::builtin());
    session.run_active("print('Hello, World!')");
    session
}

fn service(server: &mockito::Server) -> SubmissionService {
    SubmissionService::new(CollectorConfig::new(format!("{}/api", server.url())))
}

#[tokio::test]
async fn accepted_submission_returns_a_receipt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/submit")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "userName": "Ada Lovelace",
            "score": 1,
            "total": 20,
            "completedExercises": [0],
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "message": "score recorded"}"#)
        .create_async()
        .await;

    let receipt = service(&server)
        .submit("Ada Lovelace", &solved_session())
        .await
        .unwrap();
    assert_eq!(receipt.message.as_deref(), Some("score recorded"));
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_is_surfaced_as_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/submit")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let session = solved_session();
    let err = service(&server)
        .submit("Ada Lovelace", &session)
        .await
        .unwrap_err();

    match err {
        SubmitError::Rejected { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }

    // The session is untouched; the caller may retry manually.
    assert_eq!(session.score(), 1);
}

#[tokio::test]
async fn failure_envelope_with_success_status_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/submit")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": false, "message": "quota exceeded"}"#)
        .create_async()
        .await;

    let err = service(&server)
        .submit("Ada Lovelace", &solved_session())
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Rejected { body, .. } if body == "quota exceeded"));
}

#[tokio::test]
async fn blank_name_issues_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/submit")
        .expect(0)
        .create_async()
        .await;

    let err = service(&server)
        .submit("   ", &solved_session())
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::MissingName));
    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_endpoint_is_surfaced_as_transport_failure() {
    // Nothing listens on this port.
    let service = SubmissionService::new(CollectorConfig::new("http://127.0.0.1:9/api"));
    let err = service
        .submit("Ada Lovelace", &solved_session())
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Unreachable(_)));
}
