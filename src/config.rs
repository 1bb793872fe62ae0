//! Configuration management for the Cooccur engine
//!
//! Provides strongly-typed configuration with validation, environment variable
//! parsing, and defaults matching the reference movie dataset layout.
//!
//! # Example
//! ```no_run
//! use cooccur::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("min support: {}", config.mining.min_support());
//! ```

use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Thresholds for itemset and rule mining
    pub mining: MiningConfig,
    /// Input datasets
    pub data: DataConfig,
    /// Rule store location
    pub store: StoreConfig,
    /// Recommendation list sizes
    pub recommendation: RecommendationConfig,
}

/// Mining thresholds shared by the pattern miner and the rule generator.
///
/// Only [`MiningConfig::new`] and [`Default`] build one, so both thresholds
/// are always within [0, 1]:
///
/// ```compile_fail
/// use cooccur::MiningConfig;
/// let config = MiningConfig {
///     min_support: 1.5,
///     min_confidence: 0.5,
///     parallel_threshold: 64,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningConfig {
    min_support: f64,
    min_confidence: f64,
    parallel_threshold: usize,
}

/// Input dataset configuration
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Ratings CSV (`userId,movieId,rating,...`)
    pub ratings_path: PathBuf,
    /// Movie metadata CSV (`id,title,...`)
    pub movies_path: PathBuf,
    /// Ratings strictly above this count as liked
    pub min_rating: f64,
}

/// Rule store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub rules_path: PathBuf,
}

/// Recommendation configuration
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Items returned for a full-history recommendation
    pub top_n_history: usize,
    /// Items returned for a last-item recommendation
    pub top_n_last: usize,
    /// Users printed by the command-line driver
    pub demo_users: usize,
}

pub const DEFAULT_MIN_SUPPORT: f64 = 0.05;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_MIN_RATING: f64 = 3.0;
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

impl MiningConfig {
    /// Validated thresholds with the default parallel threshold
    pub fn new(min_support: f64, min_confidence: f64) -> Result<Self> {
        let config = Self {
            min_support,
            min_confidence,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        };
        config.validate()?;
        Ok(config)
    }

    /// Minimum fraction of transactions an itemset must appear in
    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Minimum confidence for an emitted rule
    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Candidate count per level above which support counting runs on rayon
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    #[must_use]
    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// Both thresholds must lie in [0, 1]
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("MIN_SUPPORT", self.min_support)?;
        check_unit_interval("MIN_CONFIDENCE", self.min_confidence)
    }

    fn from_env() -> Result<Self> {
        Ok(Self {
            min_support: get_env_parsed_or("MIN_SUPPORT", DEFAULT_MIN_SUPPORT)?,
            min_confidence: get_env_parsed_or("MIN_CONFIDENCE", DEFAULT_MIN_CONFIDENCE)?,
            parallel_threshold: get_env_parsed_or(
                "MINING_PARALLEL_THRESHOLD",
                DEFAULT_PARALLEL_THRESHOLD,
            )?,
        })
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore if not found)
        dotenvy::dotenv().ok();

        let config = Self {
            mining: MiningConfig::from_env()?,
            data: DataConfig::from_env()?,
            store: StoreConfig::from_env(),
            recommendation: RecommendationConfig::from_env()?,
        };

        config.validate()?;
        config.log_summary();

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        self.mining.validate()?;

        if !self.data.min_rating.is_finite() {
            return Err(Error::InvalidConfig {
                key: "MIN_RATING",
                message: "MIN_RATING must be a finite number".into(),
            });
        }

        for (key, value) in [
            ("TOP_N_HISTORY", self.recommendation.top_n_history),
            ("TOP_N_LAST", self.recommendation.top_n_last),
        ] {
            if value == 0 {
                return Err(Error::InvalidConfig {
                    key,
                    message: "must be at least 1".into(),
                });
            }
        }

        Ok(())
    }

    /// Log configuration summary
    fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  Mining:");
        info!("    Min Support: {}", self.mining.min_support);
        info!("    Min Confidence: {}", self.mining.min_confidence);
        info!("    Parallel Threshold: {}", self.mining.parallel_threshold);
        info!("  Data:");
        info!("    Ratings: {}", self.data.ratings_path.display());
        info!("    Movies: {}", self.data.movies_path.display());
        info!("    Min Rating: {}", self.data.min_rating);
        info!("  Store:");
        info!("    Rules: {}", self.store.rules_path.display());
        info!("  Recommendation:");
        info!(
            "    Top N: {} (history), {} (last item)",
            self.recommendation.top_n_history, self.recommendation.top_n_last
        );
    }
}

impl DataConfig {
    fn from_env() -> Result<Self> {
        let data_dir = PathBuf::from(get_env_or("DATA_DIR", "data"));

        Ok(Self {
            ratings_path: std::env::var("RATINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("ratings_small.csv")),
            movies_path: std::env::var("MOVIES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("movies_metadata.csv")),
            min_rating: get_env_parsed_or("MIN_RATING", DEFAULT_MIN_RATING)?,
        })
    }
}

impl StoreConfig {
    fn from_env() -> Self {
        Self {
            rules_path: PathBuf::from(get_env_or("RULES_PATH", "metrics.json")),
        }
    }
}

impl RecommendationConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            top_n_history: get_env_parsed_or("TOP_N_HISTORY", 5)?,
            top_n_last: get_env_parsed_or("TOP_N_LAST", 3)?,
            demo_users: get_env_parsed_or("DEMO_USERS", 10)?,
        })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn check_unit_interval(key: &'static str, value: f64) -> Result<()> {
    // NaN fails the range check too
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidThreshold { key, value });
    }
    Ok(())
}

/// Get environment variable with default
fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get and parse environment variable, falling back to `default` when unset
fn get_env_parsed_or<T>(key: &'static str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| Error::InvalidConfig {
            key,
            message: format!("Invalid value '{}': {}", value, e).into(),
        }),
        Err(_) => Ok(default),
    }
}
