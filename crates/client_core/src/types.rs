use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use shared::domain::{DocumentAction, QuestionCount, SummaryLevel};

use crate::error::ServiceError;

const PDF_MIME: &str = "application/pdf";

/// A PDF picked by the user, held in memory until it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_raw()
            .unwrap_or(PDF_MIME)
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| ServiceError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Everything `POST /process_pdf` needs, captured when the request is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessPdfRequest {
    pub document: DocumentUpload,
    pub action: DocumentAction,
    pub summary_level: SummaryLevel,
    pub num_questions: QuestionCount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_is_guessed_from_file_name() {
        let upload = DocumentUpload::new("notes.pdf", b"%PDF-1.4".to_vec());
        assert_eq!(upload.mime_type, "application/pdf");
        assert_eq!(upload.len(), 8);

        let unnamed = DocumentUpload::new("scan", Vec::new());
        assert_eq!(unnamed.mime_type, "application/pdf");
        assert!(unnamed.is_empty());
    }

    #[tokio::test]
    async fn load_reports_missing_files_with_path() {
        let err = DocumentUpload::load("/definitely/not/here.pdf")
            .await
            .expect_err("missing file");
        assert!(err.to_string().contains("/definitely/not/here.pdf"));
    }
}
