use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::error::QuizError;
use crate::session::result::ResultSummary;

/// Well-known key of the one-shot result record.
pub const LAST_RESULT_KEY: &str = "lastQuizResult";

/// Key-value store of JSON records, one file per key. Only the last quiz result
/// lives here; every save overwrites it.
pub struct ResultStore {
    base_dir: PathBuf,
}

impl ResultStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("quizr"),
        )
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    fn write_record(&self, key: &str, json: &str) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn save_last_result(&self, summary: &ResultSummary) -> Result<(), QuizError> {
        let path = self.file_path(LAST_RESULT_KEY);
        serde_json::to_string(summary)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.write_record(LAST_RESULT_KEY, &json))
            .map_err(|source| QuizError::StorageWriteFailure { path, source })
    }

    /// Missing or unreadable records mean there is no result to show.
    pub fn load_last_result(&self) -> Option<ResultSummary> {
        let content = fs::read_to_string(self.file_path(LAST_RESULT_KEY)).ok()?;
        match serde_json::from_str(&content) {
            Ok(summary) => Some(summary),
            Err(err) => {
                log::warn!("Ignoring unreadable {LAST_RESULT_KEY} record: {err}");
                None
            }
        }
    }
}

/// Persist the summary for the results screen. Storage problems are logged and
/// swallowed so the caller always moves on to the results.
pub fn handoff(store: Option<&ResultStore>, summary: &ResultSummary) {
    let Some(store) = store else {
        log::warn!("No result store available; {LAST_RESULT_KEY} not written");
        return;
    };
    if let Err(err) = store.save_last_result(summary) {
        log::warn!("{:#}", anyhow::Error::from(err));
    }
}
