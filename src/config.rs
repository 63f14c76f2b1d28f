use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::bank::resolver::{BUNDLED_BANK, Candidate};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u32,
    #[serde(default = "default_low_time_secs")]
    pub low_time_secs: u32,
    #[serde(default = "default_readiness_timeout_secs")]
    pub readiness_timeout_secs: u64,
    #[serde(default = "default_question_sources")]
    pub question_sources: Vec<String>,
    #[serde(default = "default_use_bundled_bank")]
    pub use_bundled_bank: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_question_count() -> usize {
    15
}
fn default_time_limit_secs() -> u32 {
    15 * 60
}
fn default_low_time_secs() -> u32 {
    30
}
fn default_readiness_timeout_secs() -> u64 {
    20
}
fn default_question_sources() -> Vec<String> {
    [
        "./html_css_js_mcq_300.json",
        "./html_mcq_100.json",
        "./html_mcq_300.json",
        "./html_mcq.json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_use_bundled_bank() -> bool {
    true
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            time_limit_secs: default_time_limit_secs(),
            low_time_secs: default_low_time_secs(),
            readiness_timeout_secs: default_readiness_timeout_secs(),
            question_sources: default_question_sources(),
            use_bundled_bank: default_use_bundled_bank(),
            theme: default_theme(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizr")
            .join("config.toml")
    }

    /// Clamp values edited by hand into ranges the quiz can run with.
    pub fn validate(&mut self) {
        self.question_count = self.question_count.min(500);
        self.time_limit_secs = self.time_limit_secs.clamp(10, 24 * 60 * 60);
        self.low_time_secs = self.low_time_secs.min(self.time_limit_secs);
        self.readiness_timeout_secs = self.readiness_timeout_secs.clamp(1, 300);
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
    }

    /// Candidate banks in resolution order: `extra` first, then configured
    /// sources, then the bundled bank when enabled.
    pub fn candidates(&self, extra: &[String]) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = extra
            .iter()
            .chain(self.question_sources.iter())
            .map(|s| Candidate::parse(s))
            .collect();
        if self.use_bundled_bank {
            candidates.push(Candidate::Bundled(BUNDLED_BANK.to_string()));
        }
        candidates
    }
}
