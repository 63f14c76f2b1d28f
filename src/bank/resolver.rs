use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use rust_embed::Embed;

use crate::bank::record::QuestionRecord;
use crate::error::QuizError;

#[derive(Embed)]
#[folder = "assets/questions/"]
struct BundledBanks;

/// Bank compiled into the binary, used as the last fallback.
pub const BUNDLED_BANK: &str = "html_css_js_mcq.json";

const BUNDLED_PREFIX: &str = "bundled:";

/// Where a question bank may live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Candidate {
    File(PathBuf),
    Bundled(String),
}

impl Candidate {
    /// `bundled:<name>` selects an embedded bank, anything else is a file path.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(BUNDLED_PREFIX) {
            Some(name) => Candidate::Bundled(name.to_string()),
            None => Candidate::File(PathBuf::from(raw)),
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            Candidate::File(path) => {
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
            }
            Candidate::Bundled(name) => {
                let file = BundledBanks::get(name).ok_or_else(|| {
                    anyhow!(
                        "no bundled bank named {name} (have: {})",
                        bundled_banks().join(", ")
                    )
                })?;
                Ok(std::str::from_utf8(file.data.as_ref())?.to_string())
            }
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::File(path) => write!(f, "{}", path.display()),
            Candidate::Bundled(name) => write!(f, "{BUNDLED_PREFIX}{name}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedBank {
    pub records: Vec<QuestionRecord>,
    pub source: Candidate,
}

pub fn bundled_banks() -> Vec<String> {
    BundledBanks::iter().map(|f| f.to_string()).collect()
}

/// Try each candidate in order and return the first non-empty bank.
pub fn resolve(candidates: &[Candidate]) -> Result<ResolvedBank, QuizError> {
    for candidate in candidates {
        match load_candidate(candidate) {
            Ok(records) => {
                let malformed = records
                    .iter()
                    .filter_map(|r| r.validate().err())
                    .inspect(|err| log::warn!("{err}"))
                    .count();
                log::info!(
                    "Loaded {} questions from {candidate} ({malformed} malformed)",
                    records.len()
                );
                return Ok(ResolvedBank {
                    records,
                    source: candidate.clone(),
                });
            }
            Err(err) => log::warn!("Failed to load {candidate}: {err:#}"),
        }
    }

    Err(QuizError::NoQuestionSourceAvailable {
        tried: candidates.iter().map(|c| c.to_string()).collect(),
    })
}

fn load_candidate(candidate: &Candidate) -> Result<Vec<QuestionRecord>> {
    let content = candidate.read()?;
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&content).context("not a question array")?;
    let records: Vec<QuestionRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            serde_json::from_value(entry)
                .inspect_err(|err| log::warn!("Skipping entry {i} of {candidate}: {err}"))
                .ok()
        })
        .collect();
    if records.is_empty() {
        bail!("question array is empty");
    }
    Ok(records)
}
