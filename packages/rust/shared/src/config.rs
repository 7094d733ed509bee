//! Application configuration for SupportDesk.
//!
//! User config lives at `~/.supportdesk/supportdesk.toml`.
//! A `--config` path overrides the default location; every section falls
//! back to built-in defaults when absent.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SupportDeskError};
use crate::types::{Category, Department};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "supportdesk.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".supportdesk";

// ---------------------------------------------------------------------------
// Config structs (matching supportdesk.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sentiment / keyword-count thresholds per priority level.
    #[serde(default)]
    pub priority_thresholds: PriorityThresholds,

    /// Category → ordered department list.
    #[serde(default)]
    pub department_mappings: DepartmentMappings,

    /// Static word lists used for scoring and classification.
    #[serde(default)]
    pub keywords: KeywordConfig,
}

impl AppConfig {
    /// Reject values the pipeline cannot interpret.
    pub fn validate(&self) -> Result<()> {
        for key in self.department_mappings.0.keys() {
            key.parse::<Category>().map_err(|e| {
                SupportDeskError::config(format!("[department_mappings] {e}"))
            })?;
        }

        let k = &self.keywords;
        for (list, words) in [
            ("escalation", &k.escalation),
            ("positive", &k.positive),
            ("negative", &k.negative),
            ("technical", &k.technical),
            ("billing", &k.billing),
            ("account", &k.account),
            ("feature_request", &k.feature_request),
        ] {
            if words.iter().any(|w| w.trim().is_empty()) {
                return Err(SupportDeskError::config(format!(
                    "keywords.{list} contains an empty entry"
                )));
            }
        }

        let t = &self.priority_thresholds;
        for (level, score) in [
            ("urgent", t.urgent.sentiment_score),
            ("high", t.high.sentiment_score),
            ("medium", t.medium.sentiment_score),
        ] {
            if !(-1.0..=1.0).contains(&score) {
                return Err(SupportDeskError::config(format!(
                    "priority_thresholds.{level}.sentiment_score must be within [-1, 1], got {score}"
                )));
            }
        }

        Ok(())
    }
}

/// `[priority_thresholds]` section.
///
/// Levels are checked urgent → high → medium; a ticket matching none is low.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityThresholds {
    #[serde(default = "default_urgent_threshold")]
    pub urgent: KeywordThreshold,

    #[serde(default = "default_high_threshold")]
    pub high: KeywordThreshold,

    #[serde(default = "default_medium_threshold")]
    pub medium: SentimentThreshold,
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        Self {
            urgent: default_urgent_threshold(),
            high: default_high_threshold(),
            medium: default_medium_threshold(),
        }
    }
}

/// A level that triggers on low sentiment OR many escalation keywords.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeywordThreshold {
    /// Triggers when `sentiment_score <= this`.
    pub sentiment_score: f64,
    /// Triggers when the escalation keyword count is `>= this`.
    pub escalation_keyword_count: usize,
}

/// A level that triggers on low sentiment only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentThreshold {
    pub sentiment_score: f64,
}

fn default_urgent_threshold() -> KeywordThreshold {
    KeywordThreshold {
        sentiment_score: -0.8,
        escalation_keyword_count: 3,
    }
}
fn default_high_threshold() -> KeywordThreshold {
    KeywordThreshold {
        sentiment_score: -0.5,
        escalation_keyword_count: 2,
    }
}
fn default_medium_threshold() -> SentimentThreshold {
    SentimentThreshold {
        sentiment_score: -0.2,
    }
}

/// `[department_mappings]` section: category name → ordered departments.
///
/// The first department is the default primary; the rest are backups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentMappings(pub BTreeMap<String, Vec<Department>>);

impl DepartmentMappings {
    /// Departments configured for `category`, if any.
    pub fn departments_for(&self, category: Category) -> Option<&[Department]> {
        self.0.get(category.as_str()).map(Vec::as_slice)
    }
}

impl Default for DepartmentMappings {
    fn default() -> Self {
        use Department::*;

        let entries = [
            (Category::Technical, vec![TechnicalSupport, EscalationTeam]),
            (Category::Billing, vec![BillingSupport, CustomerSuccess]),
            (Category::Account, vec![CustomerSuccess, TechnicalSupport]),
            (Category::FeatureRequest, vec![ProductTeam, CustomerSuccess]),
            (Category::General, vec![CustomerSuccess, EscalationTeam]),
        ];

        Self(
            entries
                .into_iter()
                .map(|(category, departments)| (category.as_str().to_string(), departments))
                .collect(),
        )
    }
}

/// `[keywords]` section.
///
/// All matching is case-insensitive substring containment, so entries
/// should be lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Escalation triggers, in reporting order.
    #[serde(default = "default_escalation_keywords")]
    pub escalation: Vec<String>,

    #[serde(default = "default_positive_words")]
    pub positive: Vec<String>,

    #[serde(default = "default_negative_words")]
    pub negative: Vec<String>,

    #[serde(default = "default_technical_keywords")]
    pub technical: Vec<String>,

    #[serde(default = "default_billing_keywords")]
    pub billing: Vec<String>,

    #[serde(default = "default_account_keywords")]
    pub account: Vec<String>,

    #[serde(default = "default_feature_request_keywords")]
    pub feature_request: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            escalation: default_escalation_keywords(),
            positive: default_positive_words(),
            negative: default_negative_words(),
            technical: default_technical_keywords(),
            billing: default_billing_keywords(),
            account: default_account_keywords(),
            feature_request: default_feature_request_keywords(),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

fn default_escalation_keywords() -> Vec<String> {
    words(&[
        "urgent",
        "critical",
        "emergency",
        "asap",
        "immediately",
        "lawsuit",
        "legal",
        "attorney",
        "lawyer",
        "sue",
        "cancel",
        "refund",
        "money back",
        "charge back",
        "angry",
        "frustrated",
        "disappointed",
        "terrible",
    ])
}
fn default_positive_words() -> Vec<String> {
    words(&[
        "thank",
        "great",
        "excellent",
        "happy",
        "satisfied",
        "love",
        "appreciate",
    ])
}
fn default_negative_words() -> Vec<String> {
    words(&[
        "bad",
        "terrible",
        "awful",
        "hate",
        "angry",
        "frustrated",
        "disappointed",
        "poor",
    ])
}
fn default_technical_keywords() -> Vec<String> {
    words(&[
        "error",
        "bug",
        "crash",
        "not working",
        "broken",
        "issue",
        "problem",
        "technical",
    ])
}
fn default_billing_keywords() -> Vec<String> {
    words(&[
        "payment",
        "charge",
        "billing",
        "invoice",
        "refund",
        "subscription",
        "price",
    ])
}
fn default_account_keywords() -> Vec<String> {
    words(&[
        "account", "login", "password", "access", "username", "profile",
    ])
}
fn default_feature_request_keywords() -> Vec<String> {
    words(&[
        "feature",
        "request",
        "suggestion",
        "enhancement",
        "would like",
        "could you add",
    ])
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.supportdesk/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SupportDeskError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.supportdesk/supportdesk.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SupportDeskError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        SupportDeskError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;

    tracing::debug!(?path, "config loaded");
    Ok(config)
}

/// Write a default config file at the default location.
/// Returns the path to the created file.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = config_file_path()?;
    init_config_at(&path, force)?;
    Ok(path)
}

/// Write a default config file at `path`, creating parent directories.
/// An existing file is only replaced when `force` is set.
pub fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(SupportDeskError::config(format!(
            "config file '{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| SupportDeskError::io(dir, e))?;
    }

    write_default_config(path)?;
    tracing::info!(?path, "created default config file");
    Ok(())
}

/// Serialize the default config to `path`, overwriting any existing file.
pub fn write_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| SupportDeskError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| SupportDeskError::io(path, e))
}
