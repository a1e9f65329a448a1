//! Integration tests for the questionnaire workflow.
//!
//! Runs full submissions against the in-memory store, the scripted
//! prediction API and a buffered session UI.

use aquasense_core::adapters::AdapterRegistry;
use aquasense_core::adapters::http_mock::{MockPredictionApi, MockReply};
use aquasense_core::adapters::store::{KeyValueStore, keys};
use aquasense_core::adapters::store_mock::MemoryStore;
use aquasense_core::adapters::ui::SessionUi;
use aquasense_core::workflows::{MISSING_USER_MESSAGE, PREDICTION_ERROR_MESSAGE};
use aquasense_core::{
    AquaError, FormField, FormState, QuestionnaireWorkflow, Route, SubmissionFailure,
    SubmissionOutcome, SubmissionPhase,
};
use serde_json::json;
use std::sync::Arc;
use std::task::Poll;

struct Harness {
    store: MemoryStore,
    api: MockPredictionApi,
    session: SessionUi,
    workflow: QuestionnaireWorkflow,
}

impl Harness {
    fn new(store: MemoryStore, api: MockPredictionApi) -> Self {
        let session = SessionUi::new();
        let adapters = AdapterRegistry::with_session(
            Arc::new(store.clone()),
            Arc::new(api.clone()),
            session.clone(),
        );
        let workflow = QuestionnaireWorkflow::with_form(adapters, valid_form());

        Self {
            store,
            api,
            session,
            workflow,
        }
    }

    fn signed_in(api: MockPredictionApi) -> Self {
        Self::new(
            MemoryStore::with_values([(keys::USER, r#"{"id":"u1"}"#), (keys::TOKEN, "tok-1")]),
            api,
        )
    }
}

fn valid_form() -> FormState {
    let mut form = FormState::new();
    for (name, value) in [
        ("people", "4"),
        ("children", "2"),
        ("temperature", "28.5"),
        ("waterSavingDevices", "yes"),
        ("showersPerDay", "3"),
        ("timePerShower", "8"),
        ("washingPerWeek", "5"),
        ("rainwaterHarvesting", "no"),
        ("tapsRunning", "no"),
        ("estimatedUsage", "300"),
    ] {
        form.set_field(name, value).unwrap();
    }
    form
}

#[tokio::test]
async fn test_successful_submission_stores_prediction() {
    let h = Harness::signed_in(MockPredictionApi::predicting(342.0));

    let outcome = h.workflow.submit().await.unwrap();

    assert!(matches!(
        outcome,
        SubmissionOutcome::Submitted { predicted_usage } if predicted_usage == 342.0
    ));
    assert_eq!(h.workflow.phase(), SubmissionPhase::Success);

    let requests = h.api.predict_calls();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user_id, "u1");
    assert_eq!(requests[0].people, 4.0);
    assert_eq!(requests[0].temperature, 28.5);
    assert_eq!(requests[0].washing_per_week, 5.0);

    let stored = h.api.store_calls();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].0, "tok-1");
    assert_eq!(stored[0].1.predicted_usage, 342.0);

    assert_eq!(
        h.store.get(keys::PREDICTED_USAGE).unwrap(),
        Some("342".to_string())
    );
    assert_eq!(h.session.routes(), vec![Route::Dashboard]);
    assert!(h.session.alerts().is_empty());
}

#[tokio::test]
async fn test_answers_are_persisted_before_network() {
    let h = Harness::signed_in(MockPredictionApi::new());

    h.workflow.submit().await.unwrap();

    let raw = h.store.get(keys::QUESTIONNAIRE_DATA).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["showersPerDay"], "3");
    assert_eq!(value["waterSavingDevices"], "yes");

    let restored: FormState = serde_json::from_str(&raw).unwrap();
    assert_eq!(restored, valid_form());
}

#[tokio::test]
async fn test_invalid_people_blocks_submission() {
    let h = Harness::signed_in(MockPredictionApi::predicting(100.0));
    h.workflow.set(FormField::People, "-1");

    let outcome = h.workflow.submit().await.unwrap();

    let SubmissionOutcome::ValidationFailed(errors) = outcome else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(FormField::People), Some("Please enter a valid number"));
    assert_eq!(h.workflow.errors(), errors);
    assert_eq!(h.workflow.phase(), SubmissionPhase::Editing);

    assert_eq!(h.api.total_calls(), 0);
    assert!(h.store.get(keys::QUESTIONNAIRE_DATA).unwrap().is_none());
    assert!(h.session.routes().is_empty());
}

#[tokio::test]
async fn test_errors_clear_after_correction() {
    let h = Harness::signed_in(MockPredictionApi::predicting(100.0));
    h.workflow.set(FormField::TapsRunning, "maybe");

    let first = h.workflow.submit().await.unwrap();
    assert!(matches!(first, SubmissionOutcome::ValidationFailed(_)));
    assert!(h.workflow.errors().contains(FormField::TapsRunning));

    h.workflow.set(FormField::TapsRunning, "yes");
    let second = h.workflow.submit().await.unwrap();
    assert!(matches!(second, SubmissionOutcome::Submitted { .. }));
    assert!(h.workflow.errors().is_empty());
}

#[tokio::test]
async fn test_missing_user_redirects_to_login() {
    let h = Harness::new(MemoryStore::new(), MockPredictionApi::predicting(342.0));

    let outcome = h.workflow.submit().await.unwrap();

    assert!(matches!(outcome, SubmissionOutcome::AbortedNoUser));
    assert_eq!(h.workflow.phase(), SubmissionPhase::AbortedNoUser);
    assert_eq!(h.api.total_calls(), 0);
    assert_eq!(h.session.routes(), vec![Route::Login]);
    assert_eq!(h.session.alerts(), vec![MISSING_USER_MESSAGE.to_string()]);

    // Answers are kept even though nothing was sent
    assert!(h.store.get(keys::QUESTIONNAIRE_DATA).unwrap().is_some());
    assert!(h.store.get(keys::PREDICTED_USAGE).unwrap().is_none());
}

#[tokio::test]
async fn test_blank_user_ids_redirect_to_login() {
    for record in [
        "null",
        r#"{"name":"Ann"}"#,
        r#"{"id":null}"#,
        r#"{"id":""}"#,
        r#"{"id":0}"#,
        r#"{"id":false}"#,
    ] {
        let h = Harness::new(
            MemoryStore::with_values([(keys::USER, record), (keys::TOKEN, "tok-1")]),
            MockPredictionApi::predicting(342.0),
        );

        let outcome = h.workflow.submit().await.unwrap();
        assert!(
            matches!(outcome, SubmissionOutcome::AbortedNoUser),
            "record {record:?} should abort"
        );
        assert_eq!(h.api.total_calls(), 0);
        assert_eq!(h.session.routes(), vec![Route::Login]);
    }
}

#[tokio::test]
async fn test_unparseable_user_record_fails_to_dashboard() {
    let h = Harness::new(
        MemoryStore::with_values([(keys::USER, "not json"), (keys::TOKEN, "tok-1")]),
        MockPredictionApi::predicting(342.0),
    );

    let outcome = h.workflow.submit().await.unwrap();

    let SubmissionOutcome::Failed(failure) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(failure.stage(), "user-record");
    assert!(matches!(failure.error(), AquaError::Json(_)));
    assert_eq!(h.workflow.phase(), SubmissionPhase::SubmitError);
    assert_eq!(h.session.alerts(), vec![PREDICTION_ERROR_MESSAGE.to_string()]);
    assert_eq!(h.session.routes(), vec![Route::Dashboard]);
    assert_eq!(h.api.total_calls(), 0);
    assert!(h.store.get(keys::QUESTIONNAIRE_DATA).unwrap().is_some());
}

#[tokio::test]
async fn test_numeric_user_id_is_sent_as_number() {
    let h = Harness::new(
        MemoryStore::with_values([(keys::USER, r#"{"id":42}"#), (keys::TOKEN, "tok-1")]),
        MockPredictionApi::predicting(10.0),
    );

    h.workflow.submit().await.unwrap();

    let request = &h.api.predict_calls()[0];
    assert_eq!(request.user_id, json!(42));
    assert_eq!(serde_json::to_value(request).unwrap()["userId"], json!(42));
}

#[tokio::test]
async fn test_network_error_still_reaches_dashboard() {
    let api = MockPredictionApi::new();
    api.set_predict_reply(MockReply::NetworkError("connection refused".into()));
    let h = Harness::signed_in(api);

    let outcome = h.workflow.submit().await.unwrap();

    let SubmissionOutcome::Failed(failure) = outcome else {
        panic!("expected failure");
    };
    assert!(matches!(failure, SubmissionFailure::Prediction(AquaError::Request { .. })));
    assert_eq!(h.workflow.phase(), SubmissionPhase::SubmitError);
    assert_eq!(h.session.alerts(), vec![PREDICTION_ERROR_MESSAGE.to_string()]);
    assert_eq!(h.session.routes(), vec![Route::Dashboard]);
    assert!(h.store.get(keys::PREDICTED_USAGE).unwrap().is_none());
    assert!(h.api.store_calls().is_empty());
}

#[tokio::test]
async fn test_malformed_prediction_is_a_prediction_failure() {
    let api = MockPredictionApi::new();
    api.set_predict_reply(MockReply::Malformed);
    let h = Harness::signed_in(api);

    let outcome = h.workflow.submit().await.unwrap();
    assert!(matches!(
        outcome,
        SubmissionOutcome::Failed(SubmissionFailure::Prediction(
            AquaError::MalformedResponse { .. }
        ))
    ));
}

#[tokio::test]
async fn test_missing_token_fails_remote_storage() {
    let h = Harness::new(
        MemoryStore::with_values([(keys::USER, r#"{"id":"u1"}"#)]),
        MockPredictionApi::predicting(342.0),
    );

    let outcome = h.workflow.submit().await.unwrap();

    assert!(matches!(
        outcome,
        SubmissionOutcome::Failed(SubmissionFailure::RemoteStorage(AquaError::MissingToken))
    ));
    assert_eq!(h.api.predict_calls().len(), 1);
    assert!(h.api.store_calls().is_empty());
    assert!(h.store.get(keys::PREDICTED_USAGE).unwrap().is_none());
    assert_eq!(h.session.current_route(), Some(Route::Dashboard));
}

#[tokio::test]
async fn test_backend_rejection_fails_remote_storage() {
    let api = MockPredictionApi::predicting(342.0);
    api.set_store_reply(MockReply::Status(401));
    let h = Harness::signed_in(api);

    let outcome = h.workflow.submit().await.unwrap();

    let SubmissionOutcome::Failed(failure) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(failure.stage(), "remote-storage");
    assert!(matches!(
        failure.error(),
        AquaError::UnexpectedStatus { status: 401, .. }
    ));
    assert!(h.store.get(keys::PREDICTED_USAGE).unwrap().is_none());
    assert_eq!(h.session.alerts(), vec![PREDICTION_ERROR_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_local_write_failure_is_reported() {
    let h = Harness::signed_in(MockPredictionApi::predicting(342.0));
    h.store.fail_writes_to(keys::PREDICTED_USAGE);

    let outcome = h.workflow.submit().await.unwrap();

    let SubmissionOutcome::Failed(failure) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(failure.stage(), "local-storage");
    assert_eq!(h.api.store_calls().len(), 1);
    assert_eq!(h.session.current_route(), Some(Route::Dashboard));
}

#[tokio::test]
async fn test_answer_write_failure_is_propagated() {
    let h = Harness::signed_in(MockPredictionApi::predicting(342.0));
    h.store.fail_writes_to(keys::QUESTIONNAIRE_DATA);

    let result = h.workflow.submit().await;

    assert!(matches!(result, Err(AquaError::StorageWrite(_))));
    assert_eq!(h.workflow.phase(), SubmissionPhase::Editing);
    assert_eq!(h.api.total_calls(), 0);
    assert!(h.session.routes().is_empty());
}

#[tokio::test]
async fn test_duplicate_submit_is_rejected() {
    let h = Harness::signed_in(MockPredictionApi::predicting(342.0));

    let (first, second) = tokio::join!(h.workflow.submit(), h.workflow.submit());

    assert!(matches!(first, Ok(SubmissionOutcome::Submitted { .. })));
    assert!(matches!(second, Err(AquaError::SubmissionInProgress)));
    assert_eq!(h.api.predict_calls().len(), 1);
    assert_eq!(h.api.store_calls().len(), 1);
}

#[tokio::test]
async fn test_resubmit_after_completion_is_allowed() {
    let h = Harness::signed_in(MockPredictionApi::predicting(342.0));

    h.workflow.submit().await.unwrap();
    h.api.set_predict_reply(MockReply::Usage(200.0));
    let outcome = h.workflow.submit().await.unwrap();

    assert!(matches!(
        outcome,
        SubmissionOutcome::Submitted { predicted_usage } if predicted_usage == 200.0
    ));
    assert_eq!(
        h.store.get(keys::PREDICTED_USAGE).unwrap(),
        Some("200".to_string())
    );
    assert_eq!(h.session.routes(), vec![Route::Dashboard, Route::Dashboard]);
}

#[tokio::test]
async fn test_dropped_submit_returns_to_editing() {
    let h = Harness::signed_in(MockPredictionApi::predicting(342.0));

    // Poll once so the submit suspends inside the prediction call, then cancel it
    let mut pending = Box::pin(h.workflow.submit());
    std::future::poll_fn(|cx| {
        assert!(pending.as_mut().poll(cx).is_pending());
        Poll::Ready(())
    })
    .await;
    assert_eq!(h.workflow.phase(), SubmissionPhase::Submitting);
    drop(pending);

    assert_eq!(h.workflow.phase(), SubmissionPhase::Editing);

    let outcome = h.workflow.submit().await.unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Submitted { .. }));
    assert_eq!(h.workflow.phase(), SubmissionPhase::Success);
    assert_eq!(h.api.predict_calls().len(), 2);
}
