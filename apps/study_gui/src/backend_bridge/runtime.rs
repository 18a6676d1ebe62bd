//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{DocumentService, DocumentUpload, HttpDocumentService};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, service_url: String) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let service = match HttpDocumentService::new(&service_url) {
            Ok(service) => service,
            Err(err) => {
                tracing::error!(%service_url, "backend worker startup failure: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_service(
                    UiErrorContext::BackendStartup,
                    &err,
                )));
                return;
            }
        };

        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Ready: document service at {}",
            service.base_url()
        )));
        runtime.block_on(serve_commands(service, cmd_rx, ui_tx));
    });
}

/// Runs queued commands one at a time until the UI side hangs up.
pub async fn serve_commands<S: DocumentService>(
    service: S,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        let event = match cmd {
            BackendCommand::LoadDocument { path } => {
                tracing::info!(path = %path.display(), "backend: load_document");
                match DocumentUpload::load(&path).await {
                    Ok(document) => UiEvent::DocumentLoaded(document),
                    Err(err) => {
                        tracing::error!("backend: load_document failed: {err}");
                        UiEvent::Error(UiError::from_service(UiErrorContext::LoadDocument, &err))
                    }
                }
            }
            BackendCommand::ProcessDocument(request) => {
                tracing::info!(action = %request.action, "backend: process_document");
                match service.process_pdf(&request).await {
                    Ok(response) => UiEvent::DocumentProcessed {
                        action: request.action,
                        response,
                    },
                    Err(err) => {
                        tracing::error!(action = %request.action, "error while processing PDF: {err}");
                        UiEvent::Error(UiError::from_service(
                            UiErrorContext::ProcessDocument,
                            &err,
                        ))
                    }
                }
            }
            BackendCommand::SubmitAnswers(request) => {
                tracing::info!(answers = request.answers.len(), "backend: submit_answers");
                match service.submit_answers(&request).await {
                    Ok(response) => UiEvent::AnswersScored(response),
                    Err(err) => {
                        tracing::error!("error submitting answers: {err}");
                        UiEvent::Error(UiError::from_service(UiErrorContext::SubmitAnswers, &err))
                    }
                }
            }
        };

        if ui_tx.send(event).is_err() {
            tracing::warn!("ui event channel closed; stopping backend worker");
            break;
        }
    }
}
