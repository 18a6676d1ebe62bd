use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentAction {
    #[default]
    Summarize,
    Quiz,
    Qna,
}

impl DocumentAction {
    pub const ALL: [DocumentAction; 3] = [Self::Summarize, Self::Quiz, Self::Qna];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Quiz => "quiz",
            Self::Qna => "qna",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Summarize => "Summarize",
            Self::Quiz => "Generate Quiz",
            Self::Qna => "Generate Q&A",
        }
    }
}

impl fmt::Display for DocumentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentAction {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "summarize" => Ok(Self::Summarize),
            "quiz" => Ok(Self::Quiz),
            "qna" => Ok(Self::Qna),
            _ => Err(UnknownVariant::new("document action", value)),
        }
    }
}

/// Length of the summary requested from the service. Ignored for quiz and Q&A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLevel {
    Abstract,
    #[default]
    Summary,
}

impl SummaryLevel {
    pub const ALL: [SummaryLevel; 2] = [Self::Abstract, Self::Summary];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::Summary => "summary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Abstract => "Abstract (short)",
            Self::Summary => "Summary (detailed)",
        }
    }
}

impl fmt::Display for SummaryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryLevel {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abstract" => Ok(Self::Abstract),
            "summary" => Ok(Self::Summary),
            _ => Err(UnknownVariant::new("summary level", value)),
        }
    }
}

/// Number of quiz questions to request, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct QuestionCount(u8);

impl QuestionCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 20;
    pub const DEFAULT: u8 = 5;

    pub fn clamped(requested: i64) -> Self {
        Self(requested.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<i64> for QuestionCount {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<QuestionCount> for u8 {
    fn from(value: QuestionCount) -> Self {
        value.0
    }
}

impl fmt::Display for QuestionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
