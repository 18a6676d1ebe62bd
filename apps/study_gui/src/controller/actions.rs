//! Intents raised by panels and applied by the app shell.

use shared::domain::{DocumentAction, SummaryLevel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    ChooseDocument,
    ClearDocument,
    SetAction(DocumentAction),
    SetSummaryLevel(SummaryLevel),
    SetNumQuestions(i64),
    SubmitDocument,
    ChooseAnswer { question_index: usize, answer: String },
    SubmitAnswers,
    CopySummary,
    DismissAlert,
}
