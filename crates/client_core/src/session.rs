//! In-memory study session: the state behind the document, quiz and score views.
//!
//! Every transition is synchronous. Network calls happen elsewhere; a request is
//! opened with a `begin_*` method and closed with the matching `apply_*` or
//! `fail_*` method once the service has answered.

use std::collections::BTreeMap;

use shared::{
    domain::{DocumentAction, QuestionCount, SummaryLevel},
    protocol::{
        AnswerRecord, FeedbackItem, ProcessPdfResponse, QnaPair, QuizQuestion,
        SubmitAnswersRequest, SubmitAnswersResponse,
    },
};
use thiserror::Error;
use tracing::info;

use crate::{
    config::ClientSettings,
    types::{DocumentUpload, ProcessPdfRequest},
};

pub const UPLOAD_REQUIRED_ALERT: &str = "Please upload a PDF.";
pub const PROCESSING_FAILED_ALERT: &str = "An error occurred. Please try again.";
pub const SCORING_FAILED_ALERT: &str = "An error occurred while submitting answers.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no PDF selected")]
    NoDocumentSelected,
    #[error("selected PDF '{file_name}' is empty")]
    EmptyDocument { file_name: String },
    #[error("a document request is already in flight")]
    DocumentRequestInFlight,
    #[error("an answer submission is already in flight")]
    AnswerSubmissionInFlight,
    #[error("no response is expected: nothing is in flight")]
    NothingInFlight,
    #[error("there is no quiz to answer")]
    NoQuiz,
    #[error("answers for this quiz have already been scored")]
    AlreadyScored,
    #[error("question {index} is not part of the current quiz ({len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },
    #[error("service response for '{action}' carried no {field}")]
    MissingContent {
        action: DocumentAction,
        field: &'static str,
    },
}

impl SessionError {
    /// Local validation failures are raised before any request is sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NoDocumentSelected | Self::EmptyDocument { .. })
    }

    pub fn alert_message(&self) -> &'static str {
        match self {
            Self::NoDocumentSelected | Self::EmptyDocument { .. } => UPLOAD_REQUIRED_ALERT,
            Self::MissingContent { .. } => PROCESSING_FAILED_ALERT,
            Self::DocumentRequestInFlight | Self::AnswerSubmissionInFlight => {
                "Please wait for the current request to finish."
            }
            Self::NothingInFlight => PROCESSING_FAILED_ALERT,
            Self::NoQuiz => "Generate a quiz before submitting answers.",
            Self::AlreadyScored => "Answers for this quiz have already been submitted.",
            Self::QuestionOutOfRange { .. } => "That question is not part of the current quiz.",
        }
    }
}

/// What the service produced for the last successful document request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GeneratedContent {
    #[default]
    Empty,
    Summary(String),
    Quiz(Vec<QuizQuestion>),
    Qna(Vec<QnaPair>),
}

impl GeneratedContent {
    fn from_response(
        action: DocumentAction,
        response: ProcessPdfResponse,
    ) -> Result<Self, SessionError> {
        let missing = |field| SessionError::MissingContent { action, field };
        match action {
            DocumentAction::Summarize => response
                .summary
                .map(Self::Summary)
                .ok_or_else(|| missing("summary")),
            DocumentAction::Quiz => response
                .questions
                .map(Self::Quiz)
                .ok_or_else(|| missing("questions")),
            DocumentAction::Qna => response.qna.map(Self::Qna).ok_or_else(|| missing("qna")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: i64,
    pub details: Vec<FeedbackItem>,
}

impl ScoreReport {
    pub fn out_of(&self) -> usize {
        self.details.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudySession {
    document: Option<DocumentUpload>,
    action: DocumentAction,
    summary_level: SummaryLevel,
    num_questions: QuestionCount,

    content: GeneratedContent,
    answers: BTreeMap<usize, String>,
    score: Option<ScoreReport>,

    processing: bool,
    submitting_answers: bool,
}

impl StudySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self {
            action: settings.default_action,
            summary_level: settings.default_summary_level,
            num_questions: settings.default_num_questions,
            ..Self::default()
        }
    }

    pub fn select_document(&mut self, document: DocumentUpload) {
        info!(file = %document.file_name, bytes = document.len(), "document selected");
        self.document = Some(document);
    }

    pub fn clear_document(&mut self) {
        self.document = None;
    }

    pub fn document(&self) -> Option<&DocumentUpload> {
        self.document.as_ref()
    }

    pub fn set_action(&mut self, action: DocumentAction) {
        self.action = action;
    }

    pub fn action(&self) -> DocumentAction {
        self.action
    }

    pub fn set_summary_level(&mut self, level: SummaryLevel) {
        self.summary_level = level;
    }

    pub fn summary_level(&self) -> SummaryLevel {
        self.summary_level
    }

    /// Stores the requested question count, clamped to the supported range.
    pub fn set_num_questions(&mut self, requested: i64) -> QuestionCount {
        self.num_questions = QuestionCount::clamped(requested);
        self.num_questions
    }

    pub fn num_questions(&self) -> QuestionCount {
        self.num_questions
    }

    pub fn content(&self) -> &GeneratedContent {
        &self.content
    }

    pub fn summary(&self) -> Option<&str> {
        match &self.content {
            GeneratedContent::Summary(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn quiz(&self) -> &[QuizQuestion] {
        match &self.content {
            GeneratedContent::Quiz(questions) => questions.as_slice(),
            _ => &[],
        }
    }

    pub fn qna(&self) -> &[QnaPair] {
        match &self.content {
            GeneratedContent::Qna(pairs) => pairs.as_slice(),
            _ => &[],
        }
    }

    pub fn answer_for(&self, question_index: usize) -> Option<&str> {
        self.answers.get(&question_index).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn score(&self) -> Option<&ScoreReport> {
        self.score.as_ref()
    }

    /// Per-question feedback from the last scoring, empty until answers are scored.
    pub fn feedback(&self) -> &[FeedbackItem] {
        self.score
            .as_ref()
            .map(|report| report.details.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_submitting_answers(&self) -> bool {
        self.submitting_answers
    }

    pub fn can_submit_document(&self) -> bool {
        !self.processing && !self.submitting_answers
    }

    pub fn can_submit_answers(&self) -> bool {
        !self.quiz().is_empty()
            && self.score.is_none()
            && !self.submitting_answers
            && !self.processing
    }

    /// Validates the selection and marks a document request as in flight.
    pub fn begin_document_request(&mut self) -> Result<ProcessPdfRequest, SessionError> {
        let document = self.document.as_ref().ok_or(SessionError::NoDocumentSelected)?;
        if document.is_empty() {
            return Err(SessionError::EmptyDocument {
                file_name: document.file_name.clone(),
            });
        }
        if self.processing {
            return Err(SessionError::DocumentRequestInFlight);
        }
        if self.submitting_answers {
            return Err(SessionError::AnswerSubmissionInFlight);
        }

        let request = ProcessPdfRequest {
            document: document.clone(),
            action: self.action,
            summary_level: self.summary_level,
            num_questions: self.num_questions,
        };
        self.processing = true;
        Ok(request)
    }

    /// Replaces the generated content with the service result for `action`.
    ///
    /// A response lacking the field `action` needs leaves the session as it was
    /// apart from the loading flag.
    pub fn apply_document_response(
        &mut self,
        action: DocumentAction,
        response: ProcessPdfResponse,
    ) -> Result<(), SessionError> {
        if !self.processing {
            return Err(SessionError::NothingInFlight);
        }
        self.processing = false;

        let content = GeneratedContent::from_response(action, response)?;
        match &content {
            GeneratedContent::Quiz(questions) => {
                info!(%action, questions = questions.len(), "quiz received")
            }
            GeneratedContent::Qna(pairs) => info!(%action, pairs = pairs.len(), "q&a received"),
            GeneratedContent::Summary(text) => info!(%action, chars = text.len(), "summary received"),
            GeneratedContent::Empty => {}
        }
        self.content = content;
        self.answers.clear();
        self.score = None;
        Ok(())
    }

    pub fn fail_document_request(&mut self) {
        self.processing = false;
    }

    pub fn record_answer(
        &mut self,
        question_index: usize,
        answer: impl Into<String>,
    ) -> Result<(), SessionError> {
        let len = self.quiz().len();
        if len == 0 {
            return Err(SessionError::NoQuiz);
        }
        if question_index >= len {
            return Err(SessionError::QuestionOutOfRange {
                index: question_index,
                len,
            });
        }
        if self.score.is_some() {
            return Err(SessionError::AlreadyScored);
        }
        if self.submitting_answers {
            return Err(SessionError::AnswerSubmissionInFlight);
        }
        self.answers.insert(question_index, answer.into());
        Ok(())
    }

    /// One record per displayed question; unanswered questions carry empty text.
    pub fn answer_records(&self) -> Vec<AnswerRecord> {
        self.quiz()
            .iter()
            .enumerate()
            .map(|(index, question)| AnswerRecord {
                question_index: index,
                user_answer: self.answers.get(&index).cloned().unwrap_or_default(),
                correct_answer: question.correct_answer_text().to_string(),
                explanation: question.explanation.clone(),
            })
            .collect()
    }

    pub fn begin_answer_submission(&mut self) -> Result<SubmitAnswersRequest, SessionError> {
        if self.submitting_answers {
            return Err(SessionError::AnswerSubmissionInFlight);
        }
        if self.quiz().is_empty() {
            return Err(SessionError::NoQuiz);
        }
        if self.score.is_some() {
            return Err(SessionError::AlreadyScored);
        }
        if self.processing {
            return Err(SessionError::DocumentRequestInFlight);
        }

        self.submitting_answers = true;
        Ok(SubmitAnswersRequest {
            answers: self.answer_records(),
        })
    }

    pub fn apply_score(&mut self, response: SubmitAnswersResponse) -> Result<(), SessionError> {
        if !self.submitting_answers {
            return Err(SessionError::NothingInFlight);
        }
        self.submitting_answers = false;
        info!(
            score = response.score,
            out_of = response.details.len(),
            "answers scored"
        );
        self.score = Some(ScoreReport {
            score: response.score,
            details: response.details,
        });
        Ok(())
    }

    pub fn fail_answer_submission(&mut self) {
        self.submitting_answers = false;
    }
}
