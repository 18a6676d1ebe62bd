use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    error::ServiceError,
    service::DocumentService,
    session::{
        GeneratedContent, ScoreReport, SessionError, StudySession, PROCESSING_FAILED_ALERT,
        SCORING_FAILED_ALERT,
    },
};

#[derive(Debug, Error)]
pub enum StudyError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("document processing failed: {0}")]
    Processing(#[source] ServiceError),
    #[error("answer submission failed: {0}")]
    Scoring(#[source] ServiceError),
}

impl StudyError {
    /// Text shown to the user. Service failures all collapse into one message per operation.
    pub fn alert_message(&self) -> &'static str {
        match self {
            Self::Session(err) => err.alert_message(),
            Self::Processing(_) => PROCESSING_FAILED_ALERT,
            Self::Scoring(_) => SCORING_FAILED_ALERT,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Session(err) if err.is_validation())
    }
}

/// Drives a [`StudySession`] against a [`DocumentService`], one request at a time.
pub struct StudyController<S: DocumentService> {
    service: S,
    session: StudySession,
}

impl<S: DocumentService> StudyController<S> {
    pub fn new(service: S) -> Self {
        Self::with_session(service, StudySession::new())
    }

    pub fn with_session(service: S, session: StudySession) -> Self {
        Self { service, session }
    }

    pub fn session(&self) -> &StudySession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut StudySession {
        &mut self.session
    }

    pub async fn submit_document(&mut self) -> Result<&GeneratedContent, StudyError> {
        let request = match self.session.begin_document_request() {
            Ok(request) => request,
            Err(err) => {
                warn!("document submission refused: {err}");
                return Err(err.into());
            }
        };
        let action = request.action;

        let response = match self.service.process_pdf(&request).await {
            Ok(response) => response,
            Err(err) => {
                error!(%action, "error while processing PDF: {err}");
                self.session.fail_document_request();
                return Err(StudyError::Processing(err));
            }
        };

        if let Err(err) = self.session.apply_document_response(action, response) {
            error!(%action, "unusable response while processing PDF: {err}");
            return Err(err.into());
        }
        info!(%action, "document processed");
        Ok(self.session.content())
    }

    pub fn record_answer(
        &mut self,
        question_index: usize,
        answer: impl Into<String>,
    ) -> Result<(), StudyError> {
        self.session
            .record_answer(question_index, answer)
            .map_err(StudyError::from)
    }

    pub async fn submit_answers(&mut self) -> Result<&ScoreReport, StudyError> {
        let request = match self.session.begin_answer_submission() {
            Ok(request) => request,
            Err(err) => {
                warn!("answer submission refused: {err}");
                return Err(err.into());
            }
        };

        match self.service.submit_answers(&request).await {
            Ok(response) => {
                self.session.apply_score(response)?;
            }
            Err(err) => {
                error!("error submitting answers: {err}");
                self.session.fail_answer_submission();
                return Err(StudyError::Scoring(err));
            }
        }

        self.session
            .score()
            .ok_or(StudyError::Session(SessionError::NothingInFlight))
    }
}
