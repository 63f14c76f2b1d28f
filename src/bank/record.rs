use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::QuizError;

/// Number of answer slots the quiz screen offers per question.
pub const OPTION_SLOTS: usize = 4;

/// Record identifier as written in the bank: any JSON scalar is accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl Default for QuestionId {
    fn default() -> Self {
        QuestionId::Other(Value::Null)
    }
}

impl From<u64> for QuestionId {
    fn from(n: u64) -> Self {
        QuestionId::Number(n.into())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{n}"),
            QuestionId::Text(s) => f.write_str(s),
            QuestionId::Other(Value::Null) => f.write_str("?"),
            QuestionId::Other(v) => write!(f, "{v}"),
        }
    }
}

/// One entry of a question bank file. Fields of the wrong shape deserialize to
/// empty values so that [`QuestionRecord::validate`] can flag the record
/// instead of the whole bank failing to parse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub id: QuestionId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient_options")]
    pub options: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub answer: String,
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_options<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    })
}

impl QuestionRecord {
    /// Check the record against the shape the quiz screen can present.
    /// A failing record is still playable; it just can never be answered correctly
    /// when the answer is missing from its options.
    pub fn validate(&self) -> Result<(), QuizError> {
        let reason = if self.answer.is_empty() {
            Some("has no answer".to_string())
        } else if self.options.len() < 2 {
            Some(format!("needs at least 2 options, has {}", self.options.len()))
        } else if self.options.len() > OPTION_SLOTS {
            Some(format!(
                "has {} options but only {OPTION_SLOTS} can be shown",
                self.options.len()
            ))
        } else {
            match self.options.iter().filter(|o| **o == self.answer).count() {
                0 => Some(format!("answer {:?} is not one of the options", self.answer)),
                1 => None,
                n => Some(format!("answer {:?} appears {n} times", self.answer)),
            }
        };

        match reason {
            Some(reason) => Err(QuizError::MalformedQuestionRecord {
                id: self.id.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
