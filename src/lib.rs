//! Cooccur library crate
//!
//! Re-exports core modules for integration tests and external use.

pub mod config;
pub mod error;
pub mod ingest;
pub mod mining;
pub mod recommendation;
pub mod store;

// Re-export commonly used types
pub use config::{Config, MiningConfig};
pub use error::{Error, Result};
pub use mining::{FrequentItemset, Itemset, PatternMiner, Rule, RuleGenerator, TransactionSet};
pub use recommendation::{Recommendation, Recommender};
pub use store::{RuleStore, Thresholds};
