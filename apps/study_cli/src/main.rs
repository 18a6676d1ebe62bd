use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{
    load_settings, DocumentUpload, GeneratedContent, HttpDocumentService, StudyController,
    StudyError, StudySession,
};
use shared::domain::{DocumentAction, SummaryLevel};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

mod console;

#[derive(Parser, Debug)]
#[command(
    name = "study_cli",
    about = "Summarize a PDF, or quiz yourself on it, through the document service"
)]
struct Args {
    /// PDF to upload.
    #[arg(long)]
    pdf: PathBuf,
    /// summarize, quiz or qna.
    #[arg(long)]
    action: Option<DocumentAction>,
    /// abstract or summary; only used with --action summarize.
    #[arg(long)]
    summary_level: Option<SummaryLevel>,
    /// Quiz length, clamped to 1..=20.
    #[arg(long, allow_negative_numbers = true)]
    num_questions: Option<i64>,
    #[arg(long)]
    service_url: Option<String>,
    /// One answer per question, in order, instead of prompting. Repeat the flag
    /// for each question; a label, a 1-based position or the option text.
    #[arg(long = "answer", value_name = "CHOICE")]
    answers: Vec<String>,
    /// Print the quiz without submitting answers for scoring.
    #[arg(long)]
    no_submit: bool,
}

fn alert(err: StudyError) -> anyhow::Error {
    let message = err.alert_message();
    anyhow::Error::new(err).context(message)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.service_url.clone() {
        settings.service_url = url;
    }
    tracing::debug!(service_url = %settings.service_url, pdf = %args.pdf.display(), "resolved settings");
    let service = HttpDocumentService::new(&settings.service_url)?;

    let mut session = StudySession::from_settings(&settings);
    if let Some(action) = args.action {
        session.set_action(action);
    }
    if let Some(level) = args.summary_level {
        session.set_summary_level(level);
    }
    if let Some(requested) = args.num_questions {
        let count = session.set_num_questions(requested);
        if i64::from(count.get()) != requested {
            eprintln!("Question count adjusted to {count}.");
        }
    }
    let document = DocumentUpload::load(&args.pdf)
        .await
        .with_context(|| format!("could not open {}", args.pdf.display()))?;
    session.select_document(document);

    let mut controller = StudyController::with_session(service, session);
    let has_quiz = match controller.submit_document().await.map_err(alert)? {
        GeneratedContent::Summary(summary) => {
            println!("{}", console::render_summary(summary));
            false
        }
        GeneratedContent::Qna(pairs) => {
            println!("{}", console::render_qna(pairs));
            false
        }
        GeneratedContent::Quiz(questions) if questions.is_empty() => {
            println!("The service returned no quiz questions for this document.");
            false
        }
        GeneratedContent::Quiz(_) => true,
        GeneratedContent::Empty => false,
    };

    if has_quiz {
        run_quiz(&mut controller, &args).await?;
    }
    Ok(())
}

async fn run_quiz(
    controller: &mut StudyController<HttpDocumentService>,
    args: &Args,
) -> Result<()> {
    let questions = controller.session().quiz().to_vec();

    if args.no_submit {
        for (index, question) in questions.iter().enumerate() {
            println!("{}", console::render_question(index, question));
        }
        return Ok(());
    }

    if !args.answers.is_empty() {
        if args.answers.len() > questions.len() {
            eprintln!(
                "Ignoring {} extra answer(s); the quiz has {} questions.",
                args.answers.len() - questions.len(),
                questions.len()
            );
        }
        for (index, raw) in args.answers.iter().enumerate().take(questions.len()) {
            if let Some(choice) = console::resolve_choice(&questions[index], raw)
                .map_err(|reason| anyhow!("answer {}: {reason}", index + 1))?
            {
                controller.record_answer(index, choice).map_err(alert)?;
            }
        }
    } else {
        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();
        for (index, question) in questions.iter().enumerate() {
            println!("{}", console::render_question(index, question));
            loop {
                stdout
                    .write_all(b"Your answer (blank to skip): ")
                    .await?;
                stdout.flush().await?;
                let Some(line) = stdin.next_line().await? else {
                    break;
                };
                match console::resolve_choice(question, &line) {
                    Ok(Some(choice)) => {
                        controller.record_answer(index, choice).map_err(alert)?;
                        break;
                    }
                    Ok(None) => break,
                    Err(reason) => eprintln!("{reason}"),
                }
            }
            println!();
        }
    }

    let answered = controller.session().answered_count();
    if answered < questions.len() {
        eprintln!(
            "{} of {} questions left unanswered.",
            questions.len() - answered,
            questions.len()
        );
    }

    let report = controller.submit_answers().await.map_err(alert)?;
    println!("{}", console::render_score(report));
    Ok(())
}
