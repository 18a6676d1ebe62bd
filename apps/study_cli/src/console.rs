//! Plain-text rendering of generated content and parsing of typed quiz answers.

use std::fmt::Write as _;

use client_core::ScoreReport;
use shared::protocol::{QnaPair, QuizQuestion};

pub fn render_summary(summary: &str) -> String {
    let summary = summary.trim();
    if summary.is_empty() {
        return "The service returned an empty summary.\n".to_string();
    }
    format!("Summary:\n\n{summary}\n")
}

pub fn render_question(index: usize, question: &QuizQuestion) -> String {
    let mut out = format!("Q{}. {}\n", index + 1, question.question.trim());
    for (label, text) in question.options.iter() {
        let _ = writeln!(out, "  {label}) {text}");
    }
    out
}

pub fn render_qna(pairs: &[QnaPair]) -> String {
    if pairs.is_empty() {
        return "The service found no questions in this document.\n".to_string();
    }
    let mut out = String::from("Questions & Answers:\n");
    for (index, pair) in pairs.iter().enumerate() {
        let _ = write!(
            out,
            "\nQ{}. {}\n    {}\n",
            index + 1,
            pair.question.trim(),
            pair.answer.trim()
        );
    }
    out
}

pub fn render_score(report: &ScoreReport) -> String {
    let mut out = format!("Your Score: {} / {}\n", report.score, report.out_of());
    for item in &report.details {
        let verdict = if item.is_correct { "Correct" } else { "Incorrect" };
        let _ = writeln!(out, "\nQ{}: {verdict}", item.id);
        if !item.is_correct {
            let your_answer = if item.your_answer.is_empty() {
                "(no answer)"
            } else {
                item.your_answer.as_str()
            };
            let _ = writeln!(out, "  Your Answer:    {your_answer}");
            let _ = writeln!(out, "  Correct Answer: {}", item.correct);
            if !item.explanation.is_empty() {
                let _ = writeln!(out, "  Explanation:    {}", item.explanation);
            }
        }
    }
    out
}

/// Maps what the user typed to an option text.
///
/// Accepts an option label (any case), a 1-based position, or the option text
/// itself. Blank input leaves the question unanswered.
pub fn resolve_choice(question: &QuizQuestion, input: &str) -> Result<Option<String>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if let Some((_, text)) = question
        .options
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(input))
    {
        return Ok(Some(text.to_string()));
    }

    if let Ok(position) = input.parse::<usize>() {
        if let Some((_, text)) = position
            .checked_sub(1)
            .and_then(|i| question.options.iter().nth(i))
        {
            return Ok(Some(text.to_string()));
        }
    }

    if question.options.label_of(input).is_some() {
        return Ok(Some(input.to_string()));
    }

    let labels: Vec<&str> = question.options.labels().collect();
    Err(format!(
        "'{input}' is not one of the options ({})",
        labels.join(", ")
    ))
}
