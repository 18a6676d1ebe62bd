use std::time::Duration;

use arboard::Clipboard;
use chrono::Local;
use client_core::{ClientSettings, GeneratedContent, StudySession, PROCESSING_FAILED_ALERT};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    actions::UiAction,
    events::{UiErrorCategory, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::ui::{panels, theme};

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub service_url: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            service_url: client_core::DEFAULT_SERVICE_URL.to_string(),
        }
    }
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Service => "Service",
        UiErrorCategory::Unknown => "Error",
    }
}

/// Summary text worth a card; blank summaries draw nothing.
fn visible_summary(content: &GeneratedContent) -> Option<&str> {
    match content {
        GeneratedContent::Summary(text) if !text.trim().is_empty() => Some(text.as_str()),
        _ => None,
    }
}

pub struct StudyGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    service_url: String,
    session: StudySession,
    num_questions_input: i64,
    status: String,
    alert: Option<String>,
    last_scored_at: Option<String>,
    theme_applied: bool,
}

impl StudyGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
        settings: &ClientSettings,
    ) -> Self {
        let session = StudySession::from_settings(settings);
        Self {
            cmd_tx,
            ui_rx,
            service_url: startup.service_url,
            num_questions_input: i64::from(session.num_questions().get()),
            session,
            status: "Starting backend worker...".to_string(),
            alert: None,
            last_scored_at: None,
            theme_applied: false,
        }
    }

    fn raise_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::DocumentLoaded(document) => {
                    self.status = format!(
                        "Selected {} ({})",
                        document.file_name,
                        panels::human_readable_bytes(document.len() as u64)
                    );
                    self.session.select_document(document);
                }
                UiEvent::DocumentProcessed { action, response } => {
                    match self.session.apply_document_response(action, response) {
                        Ok(()) => {
                            self.last_scored_at = None;
                            self.status = format!("{} ready", action.label());
                        }
                        Err(err) => {
                            tracing::error!(%action, "unusable document response: {err}");
                            self.status = format!("{} failed", action.label());
                            self.raise_alert(PROCESSING_FAILED_ALERT);
                        }
                    }
                }
                UiEvent::AnswersScored(response) => match self.session.apply_score(response) {
                    Ok(()) => {
                        self.last_scored_at = Some(Local::now().format("%H:%M:%S").to_string());
                        self.status = "Answers scored".to_string();
                    }
                    Err(err) => tracing::warn!("ignoring score: {err}"),
                },
                UiEvent::Error(err) => {
                    match err.context() {
                        UiErrorContext::ProcessDocument => self.session.fail_document_request(),
                        UiErrorContext::SubmitAnswers => self.session.fail_answer_submission(),
                        UiErrorContext::BackendStartup | UiErrorContext::LoadDocument => {}
                    }
                    self.status = format!("{}: {}", err_label(err.category()), err.message());
                    self.raise_alert(err.alert_text());
                }
            }
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::ChooseDocument => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PDF document", &["pdf"])
                    .pick_file()
                {
                    self.status = format!("Loading {}...", path.display());
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::LoadDocument { path },
                        &mut self.status,
                    );
                }
            }
            UiAction::ClearDocument => {
                self.session.clear_document();
                self.status = "No file selected".to_string();
            }
            UiAction::SetAction(action) => self.session.set_action(action),
            UiAction::SetSummaryLevel(level) => self.session.set_summary_level(level),
            UiAction::SetNumQuestions(requested) => {
                let count = self.session.set_num_questions(requested);
                self.num_questions_input = i64::from(count.get());
            }
            UiAction::SubmitDocument => match self.session.begin_document_request() {
                Ok(request) => {
                    self.status = format!("Processing {}...", request.document.file_name);
                    if !dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::ProcessDocument(request),
                        &mut self.status,
                    ) {
                        self.session.fail_document_request();
                        self.raise_alert(PROCESSING_FAILED_ALERT);
                    }
                }
                Err(err) => {
                    tracing::warn!("document request refused: {err}");
                    self.raise_alert(err.alert_message());
                }
            },
            UiAction::ChooseAnswer {
                question_index,
                answer,
            } => {
                if let Err(err) = self.session.record_answer(question_index, answer) {
                    tracing::warn!(question_index, "answer ignored: {err}");
                }
            }
            UiAction::SubmitAnswers => match self.session.begin_answer_submission() {
                Ok(request) => {
                    self.status = "Submitting answers...".to_string();
                    if !dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::SubmitAnswers(request),
                        &mut self.status,
                    ) {
                        self.session.fail_answer_submission();
                        self.raise_alert(client_core::SCORING_FAILED_ALERT);
                    }
                }
                Err(err) => {
                    tracing::warn!("answer submission refused: {err}");
                    self.raise_alert(err.alert_message());
                }
            },
            UiAction::CopySummary => self.copy_summary(),
            UiAction::DismissAlert => self.alert = None,
        }
    }

    fn copy_summary(&mut self) {
        let Some(summary) = visible_summary(self.session.content()) else {
            return;
        };
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(summary.to_string())) {
            Ok(()) => self.status = "Copied summary to clipboard".to_string(),
            Err(err) => self.status = format!("Failed to copy summary: {err}"),
        }
    }

    fn show_alert(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let Some(message) = self.alert.as_deref() else {
            return;
        };
        egui::Window::new("Alert")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    actions.push(UiAction::DismissAlert);
                }
            });
    }

    fn show_workspace(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.status).color(theme::MUTED_TEXT));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(&self.service_url).color(theme::MUTED_TEXT));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    theme::sheet().show(ui, |ui| {
                        ui.set_max_width(760.0);
                        ui.vertical_centered(|ui| {
                            ui.heading(
                                egui::RichText::new("PDF Summarizer & Quiz Generator")
                                    .color(theme::ACCENT)
                                    .strong(),
                            );
                        });
                        ui.add_space(12.0);

                        panels::document_panel(
                            ui,
                            &self.session,
                            &mut self.num_questions_input,
                            actions,
                        );
                        ui.add_space(16.0);

                        match self.session.content() {
                            GeneratedContent::Empty => {}
                            GeneratedContent::Summary(_) => {
                                if let Some(text) = visible_summary(self.session.content()) {
                                    panels::summary_panel(ui, text, actions);
                                }
                            }
                            GeneratedContent::Quiz(_) => {
                                panels::quiz_panel(ui, &self.session, actions);
                            }
                            GeneratedContent::Qna(pairs) => panels::qna_panel(ui, pairs),
                        }

                        if let Some(report) = self.session.score() {
                            ui.add_space(16.0);
                            panels::score_panel(ui, report, self.last_scored_at.as_deref());
                        }
                    });
                });
        });
    }
}

impl eframe::App for StudyGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            ctx.set_visuals(theme::visuals());
            self.theme_applied = true;
        }

        self.process_ui_events();

        let mut actions = Vec::new();
        self.show_workspace(ctx, &mut actions);
        self.show_alert(ctx, &mut actions);
        for action in actions {
            self.apply(action);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
