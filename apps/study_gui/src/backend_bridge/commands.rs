//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use client_core::ProcessPdfRequest;
use shared::protocol::SubmitAnswersRequest;

pub enum BackendCommand {
    LoadDocument { path: PathBuf },
    ProcessDocument(ProcessPdfRequest),
    SubmitAnswers(SubmitAnswersRequest),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadDocument { .. } => "load_document",
            BackendCommand::ProcessDocument(_) => "process_document",
            BackendCommand::SubmitAnswers(_) => "submit_answers",
        }
    }
}
