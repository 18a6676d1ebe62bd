//! Backend-to-UI events and error modeling for the desktop controller.

use client_core::{
    DocumentUpload, ServiceError, PROCESSING_FAILED_ALERT, SCORING_FAILED_ALERT,
};
use shared::{
    domain::DocumentAction,
    protocol::{ProcessPdfResponse, SubmitAnswersResponse},
};

pub enum UiEvent {
    Info(String),
    DocumentLoaded(DocumentUpload),
    DocumentProcessed {
        action: DocumentAction,
        response: ProcessPdfResponse,
    },
    AnswersScored(SubmitAnswersResponse),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Service,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadDocument,
    ProcessDocument,
    SubmitAnswers,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_service(context: UiErrorContext, err: &ServiceError) -> Self {
        let category = match err {
            ServiceError::Transport { .. } => UiErrorCategory::Transport,
            ServiceError::Status { .. }
            | ServiceError::Decode { .. }
            | ServiceError::Rejected { .. } => UiErrorCategory::Service,
            ServiceError::InvalidUrl { .. }
            | ServiceError::UnsupportedScheme(_)
            | ServiceError::Io { .. } => UiErrorCategory::Validation,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("invalid")
            || lower.contains("missing")
            || lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if lower.contains("timeout")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Text for the alert dialog; details stay in the log.
    pub fn alert_text(&self) -> &'static str {
        match self.context {
            UiErrorContext::BackendStartup => {
                "The background worker failed to start. Check the service URL and restart."
            }
            UiErrorContext::LoadDocument => "The selected file could not be read.",
            UiErrorContext::ProcessDocument => PROCESSING_FAILED_ALERT,
            UiErrorContext::SubmitAnswers => SCORING_FAILED_ALERT,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
