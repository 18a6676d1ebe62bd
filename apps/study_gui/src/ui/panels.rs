use client_core::{ScoreReport, StudySession};
use eframe::egui;
use egui::RichText;
use shared::{
    domain::{DocumentAction, QuestionCount, SummaryLevel},
    protocol::QnaPair,
};

use crate::controller::actions::UiAction;
use crate::ui::theme;

pub fn document_panel(
    ui: &mut egui::Ui,
    session: &StudySession,
    num_questions_draft: &mut i64,
    actions: &mut Vec<UiAction>,
) {
    let idle = session.can_submit_document();

    ui.horizontal(|ui| {
        if ui
            .add_enabled(idle, egui::Button::new("Choose PDF..."))
            .clicked()
        {
            actions.push(UiAction::ChooseDocument);
        }
        match session.document() {
            Some(document) => {
                ui.label(RichText::new(&document.file_name).strong());
                ui.label(
                    RichText::new(human_readable_bytes(document.len() as u64))
                        .color(theme::MUTED_TEXT),
                );
                if ui.add_enabled(idle, egui::Button::new("Clear")).clicked() {
                    actions.push(UiAction::ClearDocument);
                }
            }
            None => {
                ui.label(RichText::new("No file selected").color(theme::MUTED_TEXT));
            }
        }
    });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        for action in DocumentAction::ALL {
            if ui
                .radio(session.action() == action, action.label())
                .clicked()
            {
                actions.push(UiAction::SetAction(action));
            }
        }
    });

    match session.action() {
        DocumentAction::Summarize => {
            ui.horizontal(|ui| {
                ui.label("Length:");
                for level in SummaryLevel::ALL {
                    if ui
                        .radio(session.summary_level() == level, level.label())
                        .clicked()
                    {
                        actions.push(UiAction::SetSummaryLevel(level));
                    }
                }
            });
        }
        DocumentAction::Quiz => {
            ui.horizontal(|ui| {
                ui.label("Questions:");
                let response = ui.add(egui::DragValue::new(num_questions_draft).range(
                    i64::from(QuestionCount::MIN)..=i64::from(QuestionCount::MAX),
                ));
                if response.changed() {
                    actions.push(UiAction::SetNumQuestions(*num_questions_draft));
                }
            });
        }
        DocumentAction::Qna => {}
    }

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        let submit = egui::Button::new(RichText::new("Submit").strong())
            .min_size(egui::vec2(ui.available_width().min(480.0), 32.0));
        if ui.add_enabled(idle, submit).clicked() {
            actions.push(UiAction::SubmitDocument);
        }
        if session.is_processing() {
            ui.spinner();
            ui.label("Processing...");
        }
    });
}

pub fn summary_panel(ui: &mut egui::Ui, summary: &str, actions: &mut Vec<UiAction>) {
    theme::card(theme::SUMMARY_FILL).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Summary").color(theme::ACCENT));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Copy").clicked() {
                    actions.push(UiAction::CopySummary);
                }
            });
        });
        ui.add_space(4.0);
        ui.label(summary);
    });
}

pub fn quiz_panel(ui: &mut egui::Ui, session: &StudySession, actions: &mut Vec<UiAction>) {
    let questions = session.quiz();
    let answers_open = session.score().is_none() && !session.is_submitting_answers();

    ui.heading(RichText::new("Quiz Questions").color(theme::ACCENT));
    for (index, question) in questions.iter().enumerate() {
        ui.add_space(6.0);
        theme::card(theme::QUESTION_FILL).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(format!("Q{}. {}", index + 1, question.question)).strong());
            ui.add_enabled_ui(answers_open, |ui| {
                let chosen = session.answer_for(index);
                for (label, text) in question.options.iter() {
                    let selected = chosen == Some(text);
                    if ui.radio(selected, format!("{label}) {text}")).clicked() && !selected {
                        actions.push(UiAction::ChooseAnswer {
                            question_index: index,
                            answer: text.to_string(),
                        });
                    }
                }
            });
        });
    }

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        let label = if session.score().is_some() {
            "Answers submitted"
        } else {
            "Submit Answers"
        };
        if ui
            .add_enabled(session.can_submit_answers(), egui::Button::new(label))
            .clicked()
        {
            actions.push(UiAction::SubmitAnswers);
        }
        if session.is_submitting_answers() {
            ui.spinner();
        }
        ui.label(
            RichText::new(format!(
                "{} of {} answered",
                session.answered_count(),
                questions.len()
            ))
            .color(theme::MUTED_TEXT),
        );
    });
}

pub fn qna_panel(ui: &mut egui::Ui, pairs: &[QnaPair]) {
    ui.heading(RichText::new("Questions & Answers").color(theme::ACCENT));
    if pairs.is_empty() {
        ui.label(RichText::new("The service found no questions in this document.").italics());
        return;
    }
    for (index, pair) in pairs.iter().enumerate() {
        egui::CollapsingHeader::new(format!("Q{}. {}", index + 1, pair.question))
            .id_salt(("qna", index))
            .default_open(true)
            .show(ui, |ui| {
                ui.label(pair.answer.as_str());
            });
    }
}

pub fn score_panel(ui: &mut egui::Ui, report: &ScoreReport, scored_at: Option<&str>) {
    theme::card(theme::SCORE_FILL).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.heading(
            RichText::new(format!("Your Score: {} / {}", report.score, report.out_of()))
                .color(theme::CORRECT),
        );
        if let Some(scored_at) = scored_at {
            ui.label(RichText::new(format!("Scored at {scored_at}")).color(theme::MUTED_TEXT));
        }
        ui.separator();

        for item in &report.details {
            let (verdict, color) = if item.is_correct {
                ("Correct", theme::CORRECT)
            } else {
                ("Incorrect", theme::INCORRECT)
            };
            ui.label(RichText::new(format!("Q{}: {verdict}", item.id)).color(color).strong());
            if !item.is_correct {
                ui.indent(("feedback", item.id), |ui| {
                    let your_answer = if item.your_answer.is_empty() {
                        "(no answer)"
                    } else {
                        item.your_answer.as_str()
                    };
                    ui.label(format!("Your Answer: {your_answer}"));
                    ui.label(format!("Correct Answer: {}", item.correct));
                    if !item.explanation.is_empty() {
                        ui.label(format!("Explanation: {}", item.explanation));
                    }
                });
            }
            ui.add_space(4.0);
        }
    });
}

pub fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format_scaled_unit(bytes, MB, "MB")
    } else if bytes >= KB {
        format_scaled_unit(bytes, KB, "KB")
    } else {
        format!("{bytes} B")
    }
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let rendered = format!("{value:.1}");
    let rendered = rendered.trim_end_matches(".0");
    format!("{rendered} {unit_label}")
}

#[cfg(test)]
mod tests {
    use super::human_readable_bytes;

    #[test]
    fn formats_document_sizes_readably() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1024), "1 KB");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(2 * 1024 * 1024), "2 MB");
    }
}
