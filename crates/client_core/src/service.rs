use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    error::ServiceErrorBody,
    protocol::{
        process_pdf_fields, ProcessPdfResponse, SubmitAnswersRequest, SubmitAnswersResponse,
        PROCESS_PDF_PATH, SUBMIT_ANSWERS_PATH,
    },
};
use tracing::{debug, info};
use url::Url;

use crate::{error::ServiceError, types::ProcessPdfRequest};

/// The remote Document Service: summarizes, builds quizzes and Q&A, and scores answers.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn process_pdf(&self, request: &ProcessPdfRequest)
        -> Result<ProcessPdfResponse, ServiceError>;

    async fn submit_answers(
        &self,
        request: &SubmitAnswersRequest,
    ) -> Result<SubmitAnswersResponse, ServiceError>;
}

#[async_trait]
impl<T: DocumentService + ?Sized> DocumentService for std::sync::Arc<T> {
    async fn process_pdf(
        &self,
        request: &ProcessPdfRequest,
    ) -> Result<ProcessPdfResponse, ServiceError> {
        (**self).process_pdf(request).await
    }

    async fn submit_answers(
        &self,
        request: &SubmitAnswersRequest,
    ) -> Result<SubmitAnswersResponse, ServiceError> {
        (**self).submit_answers(request).await
    }
}

/// Parses and normalizes a service base address so endpoint paths join under it.
pub fn parse_service_url(raw: &str) -> Result<Url, ServiceError> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).map_err(|source| ServiceError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ServiceError::UnsupportedScheme(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

pub struct HttpDocumentService {
    http: Client,
    base_url: Url,
}

impl HttpDocumentService {
    pub fn new(service_url: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            http: Client::new(),
            base_url: parse_service_url(service_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &'static str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ServiceError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                source,
            })
    }
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn process_pdf(
        &self,
        request: &ProcessPdfRequest,
    ) -> Result<ProcessPdfResponse, ServiceError> {
        let url = self.endpoint(PROCESS_PDF_PATH)?;
        let document = &request.document;
        let pdf = Part::bytes(document.bytes.to_vec())
            .file_name(document.file_name.clone())
            .mime_str(&document.mime_type)
            .map_err(|source| ServiceError::Transport {
                endpoint: PROCESS_PDF_PATH,
                source,
            })?;
        let form = Form::new()
            .part(process_pdf_fields::PDF, pdf)
            .text(process_pdf_fields::ACTION, request.action.as_str())
            .text(
                process_pdf_fields::SUMMARY_LEVEL,
                request.summary_level.as_str(),
            )
            .text(
                process_pdf_fields::NUM_QUESTIONS,
                request.num_questions.get().to_string(),
            );

        info!(
            action = %request.action,
            summary_level = %request.summary_level,
            num_questions = request.num_questions.get(),
            file = %document.file_name,
            bytes = document.len(),
            "uploading document for processing"
        );
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                endpoint: PROCESS_PDF_PATH,
                source,
            })?;

        let body: ProcessPdfResponse = read_json(PROCESS_PDF_PATH, response).await?;
        if let Some(message) = body.error.clone() {
            return Err(ServiceError::Rejected {
                endpoint: PROCESS_PDF_PATH,
                message,
            });
        }
        Ok(body)
    }

    async fn submit_answers(
        &self,
        request: &SubmitAnswersRequest,
    ) -> Result<SubmitAnswersResponse, ServiceError> {
        let url = self.endpoint(SUBMIT_ANSWERS_PATH)?;
        info!(answers = request.answers.len(), "submitting quiz answers");
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                endpoint: SUBMIT_ANSWERS_PATH,
                source,
            })?;
        read_json(SUBMIT_ANSWERS_PATH, response).await
    }
}

async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ServiceError> {
    let status = response.status();
    let raw = response
        .text()
        .await
        .map_err(|source| ServiceError::Transport { endpoint, source })?;
    debug!(endpoint, status = status.as_u16(), bytes = raw.len(), "service responded");

    if !status.is_success() {
        let message = ServiceErrorBody::message_from(&raw)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("no body").to_string());
        return Err(ServiceError::Status {
            endpoint,
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&raw).map_err(|source| ServiceError::Decode { endpoint, source })
}
