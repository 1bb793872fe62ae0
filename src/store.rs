//! Rule persistence
//!
//! Stores generated rules as pretty-printed JSON together with the
//! thresholds that produced them. A stored file is only reused when all
//! three thresholds equal the current configuration; an unreadable JSON body
//! counts as stale too.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::mining::Rule;

/// Item type of persisted rules
pub type StoredRule = Rule<String>;

/// Thresholds a rule set was computed with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub min_confidence: f64,
    pub min_support: f64,
    pub min_rating: f64,
}

impl Thresholds {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_confidence: config.mining.min_confidence(),
            min_support: config.mining.min_support(),
            min_rating: config.data.min_rating,
        }
    }
}

/// On-disk layout of the rule file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRules {
    #[serde(flatten)]
    pub thresholds: Thresholds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_at: Option<DateTime<Utc>>,
    pub rules: Vec<StoredRule>,
}

/// JSON file holding the most recent rule set
#[derive(Debug, Clone)]
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored rule set, or `None` if the file does not exist
    pub fn load(&self) -> Result<Option<StoredRules>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Stored rules, provided they were computed with `current` thresholds
    pub fn load_fresh(&self, current: &Thresholds) -> Result<Option<Vec<StoredRule>>> {
        let stored = match self.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => return Ok(None),
            Err(Error::Json(e)) => {
                warn!(
                    "Stored rules in {} are unreadable ({}); recomputing",
                    self.path.display(),
                    e
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if stored.thresholds != *current {
            warn!(
                "Stored rules in {} are stale (stored {:?}, current {:?}); recomputing",
                self.path.display(),
                stored.thresholds,
                current
            );
            return Ok(None);
        }

        info!(
            "Reusing {} stored rules from {}",
            stored.rules.len(),
            self.path.display()
        );
        Ok(Some(stored.rules))
    }

    /// Replace the file with `rules` and the thresholds that produced them.
    ///
    /// The JSON is written to a temporary file in the same directory and
    /// renamed over the target, so readers see either the old file or the
    /// complete new one.
    pub fn save(&self, rules: &[StoredRule], thresholds: &Thresholds) -> Result<()> {
        let stored = StoredRules {
            thresholds: *thresholds,
            computed_at: Some(Utc::now()),
            rules: rules.to_vec(),
        };
        let json = serde_json::to_string_pretty(&stored)?;

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
                parent
            }
            None => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| Error::io(&self.path, e.error))?;

        info!("Saved {} rules to {}", rules.len(), self.path.display());
        Ok(())
    }
}
