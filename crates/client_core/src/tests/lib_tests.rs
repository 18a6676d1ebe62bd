use super::*;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use anyhow::Result;
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use shared::{
    domain::{DocumentAction, SummaryLevel},
    protocol::{FeedbackItem, QuizQuestion, SubmitAnswersRequest, SubmitAnswersResponse},
};
use tokio::{net::TcpListener, sync::mpsc};

#[derive(Debug, Default)]
struct CapturedUpload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
    fields: HashMap<String, String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Healthy,
    ServerError,
    ErrorField,
    Garbage,
}

#[derive(Clone)]
struct MockState {
    behavior: Behavior,
    hits: Arc<AtomicUsize>,
    uploads: mpsc::UnboundedSender<CapturedUpload>,
    submissions: mpsc::UnboundedSender<SubmitAnswersRequest>,
}

struct MockDocumentService {
    url: String,
    hits: Arc<AtomicUsize>,
    uploads: mpsc::UnboundedReceiver<CapturedUpload>,
    submissions: mpsc::UnboundedReceiver<SubmitAnswersRequest>,
}

impl MockDocumentService {
    fn http(&self) -> HttpDocumentService {
        HttpDocumentService::new(&self.url).expect("service url")
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn json_body(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn quiz_body(count: usize) -> String {
    // Options deliberately out of alphabetical order.
    let questions: Vec<String> = (1..=count)
        .map(|n| {
            format!(
                r#"{{"question": "Question {n}?", "options": {{"D": "delta {n}", "A": "alpha {n}", "C": "gamma {n}", "B": "beta {n}"}}, "correct_answer": "A", "explanation": "alpha {n} is right"}}"#
            )
        })
        .collect();
    format!(r#"{{"questions": [{}]}}"#, questions.join(","))
}

async fn handle_process_pdf(State(state): State<MockState>, mut multipart: Multipart) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let mut upload = CapturedUpload::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return json_body(
                    StatusCode::BAD_REQUEST,
                    serde_json::json!({ "error": err.to_string() }).to_string(),
                )
            }
        };
        let name = field.name().unwrap_or_default().to_string();
        if name == "pdf" {
            upload.file_name = field.file_name().map(str::to_string);
            upload.content_type = field.content_type().map(str::to_string);
            upload.bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        } else {
            let value = field.text().await.unwrap_or_default();
            upload.fields.insert(name, value);
        }
    }

    let action = upload.fields.get("action").cloned().unwrap_or_default();
    let count = upload
        .fields
        .get("num_questions")
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(5);
    let _ = state.uploads.send(upload);

    match state.behavior {
        Behavior::ServerError => json_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "model unavailable"}"#.to_string(),
        ),
        Behavior::ErrorField => json_body(StatusCode::OK, r#"{"error": "Invalid action"}"#.to_string()),
        Behavior::Garbage => json_body(StatusCode::OK, "<html>oops</html>".to_string()),
        Behavior::Healthy => match action.as_str() {
            "summarize" => json_body(
                StatusCode::OK,
                r#"{"summary": "The paper compares routing protocols."}"#.to_string(),
            ),
            "quiz" => json_body(StatusCode::OK, quiz_body(count)),
            "qna" => json_body(
                StatusCode::OK,
                r#"{"qna": [{"question": "What is BGP?", "answer": "An inter-domain routing protocol"}, {"question": "What is OSPF?", "answer": "A link-state protocol"}]}"#
                    .to_string(),
            ),
            _ => json_body(
                StatusCode::BAD_REQUEST,
                r#"{"error": "Invalid action"}"#.to_string(),
            ),
        },
    }
}

async fn handle_submit_answers(
    State(state): State<MockState>,
    Json(request): Json<SubmitAnswersRequest>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if state.behavior == Behavior::ServerError {
        let _ = state.submissions.send(request);
        return json_body(StatusCode::BAD_GATEWAY, String::new());
    }

    let details: Vec<FeedbackItem> = request
        .answers
        .iter()
        .map(|record| FeedbackItem {
            id: record.question_index as i64 + 1,
            is_correct: record.user_answer == record.correct_answer,
            your_answer: record.user_answer.clone(),
            correct: record.correct_answer.clone(),
            explanation: record.explanation.clone(),
        })
        .collect();
    let score = details.iter().filter(|item| item.is_correct).count() as i64;
    let _ = state.submissions.send(request);
    Json(SubmitAnswersResponse { score, details }).into_response()
}

async fn spawn_document_service(behavior: Behavior) -> Result<MockDocumentService> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (uploads_tx, uploads) = mpsc::unbounded_channel();
    let (submissions_tx, submissions) = mpsc::unbounded_channel();
    let hits = Arc::new(AtomicUsize::new(0));
    let state = MockState {
        behavior,
        hits: hits.clone(),
        uploads: uploads_tx,
        submissions: submissions_tx,
    };
    let app = Router::new()
        .route("/process_pdf", post(handle_process_pdf))
        .route("/submit-answers", post(handle_submit_answers))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(MockDocumentService {
        url: format!("http://{addr}"),
        hits,
        uploads,
        submissions,
    })
}

fn sample_pdf() -> DocumentUpload {
    DocumentUpload::new("routing.pdf", b"%PDF-1.7 routing notes".to_vec())
}

fn quiz_session(count: usize) -> StudySession {
    let mut session = StudySession::new();
    session.select_document(sample_pdf());
    session.set_action(DocumentAction::Quiz);
    session.begin_document_request().expect("begin");
    let response = serde_json::from_str(&quiz_body(count)).expect("quiz json");
    session
        .apply_document_response(DocumentAction::Quiz, response)
        .expect("apply");
    session
}

#[tokio::test]
async fn submit_without_document_never_contacts_service() {
    let mock = spawn_document_service(Behavior::Healthy)
        .await
        .expect("spawn service");
    let mut controller = StudyController::new(mock.http());

    let err = controller
        .submit_document()
        .await
        .expect_err("validation must fail");

    assert!(err.is_validation());
    assert_eq!(err.alert_message(), UPLOAD_REQUIRED_ALERT);
    assert_eq!(mock.hits(), 0);
    assert!(!controller.session().is_processing());
}

#[tokio::test]
async fn summarize_uploads_multipart_form_and_fills_only_summary() {
    let mut mock = spawn_document_service(Behavior::Healthy)
        .await
        .expect("spawn service");
    let mut session = quiz_session(2);
    session.record_answer(0, "alpha 1").expect("answer");
    session.set_action(DocumentAction::Summarize);
    session.set_summary_level(SummaryLevel::Abstract);
    let mut controller = StudyController::with_session(mock.http(), session);

    controller.submit_document().await.expect("summarize");

    let upload = mock.uploads.recv().await.expect("captured upload");
    assert_eq!(upload.file_name.as_deref(), Some("routing.pdf"));
    assert_eq!(upload.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(upload.bytes, b"%PDF-1.7 routing notes".to_vec());
    assert_eq!(upload.fields.get("action").map(String::as_str), Some("summarize"));
    assert_eq!(
        upload.fields.get("summary_level").map(String::as_str),
        Some("abstract")
    );
    assert_eq!(upload.fields.get("num_questions").map(String::as_str), Some("5"));

    let session = controller.session();
    assert_eq!(
        session.summary(),
        Some("The paper compares routing protocols.")
    );
    assert!(session.quiz().is_empty());
    assert!(session.qna().is_empty());
    assert!(session.score().is_none());
    assert_eq!(session.answered_count(), 0);
}

#[tokio::test]
async fn quiz_questions_keep_count_and_option_order() {
    let mut mock = spawn_document_service(Behavior::Healthy)
        .await
        .expect("spawn service");
    let mut controller = StudyController::new(mock.http());
    controller.session_mut().select_document(sample_pdf());
    controller.session_mut().set_action(DocumentAction::Quiz);
    controller.session_mut().set_num_questions(3);

    let content = controller.submit_document().await.expect("quiz");
    let GeneratedContent::Quiz(questions) = content else {
        panic!("expected quiz content, got {content:?}");
    };
    assert_eq!(questions.len(), 3);
    for question in questions {
        let labels: Vec<&str> = question.options.labels().collect();
        assert_eq!(labels, vec!["D", "A", "C", "B"]);
    }

    let upload = mock.uploads.recv().await.expect("captured upload");
    assert_eq!(upload.fields.get("num_questions").map(String::as_str), Some("3"));
}

#[tokio::test]
async fn partially_answered_quiz_submits_one_record_per_question() {
    let mut mock = spawn_document_service(Behavior::Healthy)
        .await
        .expect("spawn service");
    let mut controller = StudyController::new(mock.http());
    controller.session_mut().select_document(sample_pdf());
    controller.session_mut().set_action(DocumentAction::Quiz);
    controller.session_mut().set_num_questions(3);
    controller.submit_document().await.expect("quiz");

    controller.record_answer(0, "alpha 1").expect("answer 1");
    controller.record_answer(2, "beta 3").expect("answer 3");

    let report = controller.submit_answers().await.expect("score").clone();
    assert_eq!(report.score, 1);
    assert_eq!(report.out_of(), 3);
    assert!(report.details[0].is_correct);
    assert!(!report.details[1].is_correct);
    assert_eq!(report.details[1].your_answer, "");

    let submitted = mock.submissions.recv().await.expect("captured answers");
    assert_eq!(submitted.answers.len(), 3);
    let empty: Vec<usize> = submitted
        .answers
        .iter()
        .filter(|record| record.user_answer.is_empty())
        .map(|record| record.question_index)
        .collect();
    assert_eq!(empty, vec![1]);
    assert_eq!(submitted.answers[2].correct_answer, "alpha 3");

    let hits_before = mock.hits();
    let err = controller
        .submit_answers()
        .await
        .expect_err("second submission must be refused");
    assert!(matches!(err, StudyError::Session(SessionError::AlreadyScored)));
    assert_eq!(mock.hits(), hits_before);
    assert!(!controller.session().can_submit_answers());
}

#[tokio::test]
async fn qna_action_fills_question_answer_pairs() {
    let mock = spawn_document_service(Behavior::Healthy)
        .await
        .expect("spawn service");
    let mut controller = StudyController::new(mock.http());
    controller.session_mut().select_document(sample_pdf());
    controller.session_mut().set_action(DocumentAction::Qna);

    controller.submit_document().await.expect("qna");

    let pairs = controller.session().qna();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].question, "What is BGP?");
    assert_eq!(controller.session().summary(), None);
    assert!(controller.session().quiz().is_empty());
}

#[tokio::test]
async fn service_failures_alert_and_keep_quiz_for_retry() {
    let mock = spawn_document_service(Behavior::ServerError)
        .await
        .expect("spawn service");
    let mut session = quiz_session(2);
    session.record_answer(1, "alpha 2").expect("answer");
    let mut controller = StudyController::with_session(mock.http(), session);

    let err = controller
        .submit_document()
        .await
        .expect_err("processing must fail");
    assert!(matches!(
        &err,
        StudyError::Processing(ServiceError::Status { status: 500, message, .. })
            if message == "model unavailable"
    ));
    assert_eq!(err.alert_message(), PROCESSING_FAILED_ALERT);
    assert!(!controller.session().is_processing());
    assert_eq!(controller.session().quiz().len(), 2);

    let err = controller
        .submit_answers()
        .await
        .expect_err("scoring must fail");
    assert!(matches!(&err, StudyError::Scoring(ServiceError::Status { status: 502, .. })));
    assert_eq!(err.alert_message(), SCORING_FAILED_ALERT);

    let session = controller.session();
    assert!(session.can_submit_answers());
    assert!(session.score().is_none());
    assert_eq!(session.answer_for(1), Some("alpha 2"));
    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn error_field_and_garbage_bodies_are_service_failures() {
    let rejecting = spawn_document_service(Behavior::ErrorField)
        .await
        .expect("spawn service");
    let mut controller = StudyController::new(rejecting.http());
    controller.session_mut().select_document(sample_pdf());
    let err = controller.submit_document().await.expect_err("rejected");
    assert!(matches!(&err, StudyError::Processing(ServiceError::Rejected { message, .. }) if message == "Invalid action"));
    assert_eq!(err.alert_message(), PROCESSING_FAILED_ALERT);

    let garbage = spawn_document_service(Behavior::Garbage)
        .await
        .expect("spawn service");
    let mut controller = StudyController::new(garbage.http());
    controller.session_mut().select_document(sample_pdf());
    let err = controller.submit_document().await.expect_err("garbage");
    assert!(matches!(err, StudyError::Processing(ServiceError::Decode { .. })));
    assert!(controller.session().summary().is_none());
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service = HttpDocumentService::new(&format!("http://{addr}")).expect("service");
    let mut controller = StudyController::new(service);
    controller.session_mut().select_document(sample_pdf());

    let err = controller.submit_document().await.expect_err("unreachable");
    match err {
        StudyError::Processing(inner) => assert!(inner.is_transport(), "unexpected: {inner}"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(controller.session().can_submit_document());
}

#[tokio::test]
async fn empty_quiz_response_leaves_nothing_to_score() {
    let mock = spawn_document_service(Behavior::Healthy)
        .await
        .expect("spawn service");
    let mut session = StudySession::new();
    session.select_document(sample_pdf());
    session.set_action(DocumentAction::Quiz);
    session.begin_document_request().expect("begin");
    session
        .apply_document_response(
            DocumentAction::Quiz,
            shared::protocol::ProcessPdfResponse {
                questions: Some(Vec::<QuizQuestion>::new()),
                ..Default::default()
            },
        )
        .expect("apply");
    let mut controller = StudyController::with_session(mock.http(), session);

    let err = controller.submit_answers().await.expect_err("no quiz");
    assert!(matches!(err, StudyError::Session(SessionError::NoQuiz)));
    assert_eq!(mock.hits(), 0);
}
