//! Pipeline configuration.
//!
//! A JSON document with recognized sections per stage. Every field has a
//! default so an absent or partial config file still yields a runnable
//! pipeline. The two qualifying thresholds are deliberately configuration,
//! not constants: they have drifted across pipeline revisions.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// One ordered pain-keyword category. The first category whose pattern
/// matches scores; later categories are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub category: String,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadGenConfig {
    pub pain_keywords: Vec<KeywordCategory>,
    pub emotion_words: Vec<String>,
    /// Minimum composite score a lead must reach to be kept.
    pub min_lead_score: u32,
}

impl Default for LeadGenConfig {
    fn default() -> Self {
        let cat = |category: &str, patterns: &[&str]| KeywordCategory {
            category: category.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        };
        Self {
            pain_keywords: vec![
                cat("data entry", &["data entry"]),
                cat("manual", &["manual", "manually"]),
                cat("spreadsheet", &["spreadsheet", "excel"]),
                cat("copy", &["copy", "copying", "paste", "pasting"]),
                cat("reconciliation", &["reconciliation", "reconciling"]),
                cat("inventory", &["inventory"]),
                cat("hiring", &["hiring", "hire"]),
            ],
            emotion_words: vec![
                "killing".to_string(),
                "insane".to_string(),
                "brutal".to_string(),
                "hell".to_string(),
                "nightmare".to_string(),
                "\u{1f62d}".to_string(),
                "\u{1f92c}".to_string(),
            ],
            min_lead_score: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutreachConfig {
    /// Daily cap on leads entering outreach per run.
    pub daily_limit: usize,
    /// Simulated reply probability per sequence step (1-indexed).
    pub reply_chance_by_step: Vec<f64>,
    /// Reply probability override for hot leads (score >= 85).
    pub hot_reply_chance: f64,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            daily_limit: 10,
            reply_chance_by_step: vec![0.8, 0.5, 0.3],
            hot_reply_chance: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesConfig {
    pub discovery_questions: Vec<String>,
    /// Minimum qualification score that closes a deal.
    pub min_qualification_score: u32,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            discovery_questions: vec![
                "What manual work takes up most of your team's time?".to_string(),
                "How many hours per week are spent on repetitive tasks?".to_string(),
                "What happens if this work doesn't get done?".to_string(),
                "Have you tried automation before? What happened?".to_string(),
                "What's the cost of continuing manually?".to_string(),
            ],
            min_qualification_score: 50,
        }
    }
}

/// Recognized options across all pipeline stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub lead_gen: LeadGenConfig,
    pub outreach: OutreachConfig,
    pub sales: SalesConfig,
}

impl PipelineConfig {
    /// Load configuration from a JSON file. Errors if the file is missing
    /// or malformed; callers wanting defaults use `PipelineConfig::default()`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found at {}", path.display());
        }
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
