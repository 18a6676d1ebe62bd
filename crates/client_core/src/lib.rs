pub mod config;
pub mod controller;
pub mod error;
pub mod service;
pub mod session;
pub mod types;

pub use config::{load_settings, ClientSettings, DEFAULT_SERVICE_URL};
pub use controller::{StudyController, StudyError};
pub use error::ServiceError;
pub use service::{parse_service_url, DocumentService, HttpDocumentService};
pub use session::{
    GeneratedContent, ScoreReport, SessionError, StudySession, PROCESSING_FAILED_ALERT,
    SCORING_FAILED_ALERT, UPLOAD_REQUIRED_ALERT,
};
pub use types::{DocumentUpload, ProcessPdfRequest};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
