use std::fmt;

use serde::{
    de::{MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

pub const PROCESS_PDF_PATH: &str = "/process_pdf";
pub const SUBMIT_ANSWERS_PATH: &str = "/submit-answers";

/// Multipart field names of `POST /process_pdf`.
pub mod process_pdf_fields {
    pub const PDF: &str = "pdf";
    pub const ACTION: &str = "action";
    pub const SUMMARY_LEVEL: &str = "summary_level";
    pub const NUM_QUESTIONS: &str = "num_questions";
}

/// Option label → option text, in the order the service listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizOptions(Vec<(String, String)>);

impl QuizOptions {
    pub fn new<L, T>(entries: impl IntoIterator<Item = (L, T)>) -> Self
    where
        L: Into<String>,
        T: Into<String>,
    {
        let mut options = Self::default();
        for (label, text) in entries {
            options.insert(label.into(), text.into());
        }
        options
    }

    fn insert(&mut self, label: String, text: String) {
        match self.0.iter_mut().find(|(existing, _)| *existing == label) {
            Some(slot) => slot.1 = text,
            None => self.0.push((label, text)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, text)| text.as_str())
    }

    pub fn label_of(&self, text: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, existing)| existing == text)
            .map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(label, text)| (label.as_str(), text.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for QuizOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(label, text)| (label, text)))
    }
}

struct QuizOptionsVisitor;

impl<'de> Visitor<'de> for QuizOptionsVisitor {
    type Value = QuizOptions;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of option labels to option text, or a list of option text")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut options = QuizOptions::default();
        while let Some((label, text)) = map.next_entry::<String, String>()? {
            options.insert(label, text);
        }
        Ok(options)
    }

    // Older service builds sent a bare list; label it A, B, C, ...
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut options = QuizOptions::default();
        let mut index = 0usize;
        while let Some(text) = seq.next_element::<String>()? {
            options.insert(positional_label(index), text);
            index += 1;
        }
        Ok(options)
    }
}

fn positional_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

impl<'de> Deserialize<'de> for QuizOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuizOptionsVisitor)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: QuizOptions,
    #[serde(rename = "correct_answer", alias = "correctAnswerKey", alias = "answer")]
    pub correct_answer_key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explanation: String,
}

impl QuizQuestion {
    /// Text of the correct option; the key itself when it names no option.
    pub fn correct_answer_text(&self) -> &str {
        self.options
            .get(&self.correct_answer_key)
            .unwrap_or(self.correct_answer_key.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QnaPair {
    pub question: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub answer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessPdfResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qna: Option<Vec<QnaPair>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_index: usize,
    pub user_answer: String,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: Vec<AnswerRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: i64,
    #[serde(alias = "isCorrect")]
    pub is_correct: bool,
    #[serde(default, alias = "yourAnswer", deserialize_with = "null_as_empty")]
    pub your_answer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub correct: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAnswersResponse {
    pub score: i64,
    #[serde(default)]
    pub details: Vec<FeedbackItem>,
}
