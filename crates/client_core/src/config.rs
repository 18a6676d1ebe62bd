use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use shared::domain::{DocumentAction, QuestionCount, SummaryLevel};
use tracing::warn;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
pub const SETTINGS_FILE_NAME: &str = "study.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub service_url: String,
    pub default_action: DocumentAction,
    pub default_summary_level: SummaryLevel,
    pub default_num_questions: QuestionCount,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.into(),
            default_action: DocumentAction::default(),
            default_summary_level: SummaryLevel::default(),
            default_num_questions: QuestionCount::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    service_url: Option<String>,
    default_action: Option<DocumentAction>,
    default_summary_level: Option<SummaryLevel>,
    default_num_questions: Option<i64>,
}

/// Defaults, then `study.toml`, then environment variables.
pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(path) = settings_file_path() {
        match fs::read_to_string(&path) {
            Ok(raw) => apply_file_settings(&mut settings, &raw, &path),
            Err(err) => warn!(path = %path.display(), "failed to read settings file: {err}"),
        }
    }

    apply_env_settings(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn settings_file_path() -> Option<PathBuf> {
    let local = PathBuf::from(SETTINGS_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join("pdf_study").join(SETTINGS_FILE_NAME);
    user.is_file().then_some(user)
}

fn apply_file_settings(settings: &mut ClientSettings, raw: &str, path: &Path) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(path = %path.display(), "ignoring malformed settings file: {err}");
            return;
        }
    };

    if let Some(v) = file_cfg.service_url {
        settings.service_url = v;
    }
    if let Some(v) = file_cfg.default_action {
        settings.default_action = v;
    }
    if let Some(v) = file_cfg.default_summary_level {
        settings.default_summary_level = v;
    }
    if let Some(v) = file_cfg.default_num_questions {
        settings.default_num_questions = QuestionCount::clamped(v);
    }
}

fn apply_env_settings(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("STUDY_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = lookup("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Some(v) = lookup("APP__DEFAULT_ACTION") {
        match v.parse() {
            Ok(action) => settings.default_action = action,
            Err(err) => warn!("ignoring APP__DEFAULT_ACTION: {err}"),
        }
    }
    if let Some(v) = lookup("APP__DEFAULT_SUMMARY_LEVEL") {
        match v.parse() {
            Ok(level) => settings.default_summary_level = level,
            Err(err) => warn!("ignoring APP__DEFAULT_SUMMARY_LEVEL: {err}"),
        }
    }
    if let Some(v) = lookup("APP__DEFAULT_NUM_QUESTIONS") {
        match v.trim().parse::<i64>() {
            Ok(parsed) => settings.default_num_questions = QuestionCount::clamped(parsed),
            Err(err) => warn!("ignoring APP__DEFAULT_NUM_QUESTIONS: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let mut settings = ClientSettings::default();
        apply_file_settings(
            &mut settings,
            r#"
                service_url = "http://study.internal:8080"
                default_action = "quiz"
                default_summary_level = "abstract"
                default_num_questions = 40
            "#,
            Path::new("study.toml"),
        );

        assert_eq!(settings.service_url, "http://study.internal:8080");
        assert_eq!(settings.default_action, DocumentAction::Quiz);
        assert_eq!(settings.default_summary_level, SummaryLevel::Abstract);
        assert_eq!(settings.default_num_questions.get(), 20);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let mut settings = ClientSettings::default();
        apply_file_settings(&mut settings, "service_url = [", Path::new("study.toml"));
        assert_eq!(settings, ClientSettings::default());
    }

    #[test]
    fn app_prefixed_env_wins_and_bad_values_are_skipped() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("STUDY_SERVICE_URL", "http://first:5000"),
            ("APP__SERVICE_URL", "http://second:5000"),
            ("APP__DEFAULT_ACTION", "qna"),
            ("APP__DEFAULT_SUMMARY_LEVEL", "verbose"),
            ("APP__DEFAULT_NUM_QUESTIONS", "0"),
        ]);
        let mut settings = ClientSettings::default();
        apply_env_settings(&mut settings, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.service_url, "http://second:5000");
        assert_eq!(settings.default_action, DocumentAction::Qna);
        assert_eq!(settings.default_summary_level, SummaryLevel::Summary);
        assert_eq!(settings.default_num_questions.get(), 1);
    }
}
