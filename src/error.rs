use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("no question source available (tried: {})", tried.join(", "))]
    NoQuestionSourceAvailable { tried: Vec<String> },

    #[error("malformed question {id}: {reason}")]
    MalformedQuestionRecord { id: String, reason: String },

    #[error("could not write result record to {}", path.display())]
    StorageWriteFailure {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("terminal cannot host required regions: {}", missing.join(", "))]
    MissingViewTarget { missing: Vec<&'static str> },
}
