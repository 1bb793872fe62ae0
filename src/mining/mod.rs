//! Mining Module
//!
//! Discovers frequent itemsets in per-user item histories and turns them into
//! association rules.
//!
//! ## Pipeline
//!
//! 1. **Transactions** - Per-user histories, deduplicated into canonical itemsets
//! 2. **PatternMiner** - Level-wise (Apriori) search for itemsets meeting `min_support`
//! 3. **RuleGenerator** - Antecedent/consequent splits meeting `min_confidence`,
//!    scored with confidence and lift
//!
//! ## Measures
//!
//! - Support: `count / total` transactions containing the itemset
//! - Confidence: `support(A ∪ C) / support(A)`
//! - Lift: `support(A ∪ C) / (support(A) × support(C))`
//!
//! # Example
//!
//! ```
//! use cooccur::mining::{PatternMiner, RuleGenerator, TransactionSet};
//! use cooccur::config::MiningConfig;
//!
//! let transactions = TransactionSet::from_transactions(vec![
//!     vec!["Alien", "Aliens"],
//!     vec!["Alien", "Aliens", "Heat"],
//!     vec!["Alien"],
//!     vec!["Aliens", "Heat"],
//! ]);
//!
//! let config = MiningConfig::new(0.5, 0.5)?;
//! let frequent = PatternMiner::new(config).discover(&transactions)?;
//! let rules = RuleGenerator::new(config).generate(&frequent, &transactions)?;
//!
//! for rule in &rules {
//!     println!("{} => {} (conf={:.2}, lift={:.2})",
//!         rule.antecedent, rule.consequent, rule.confidence, rule.lift);
//! }
//! # Ok::<(), cooccur::Error>(())
//! ```

pub mod itemset;
pub mod metrics;
pub mod miner;
pub mod rules;
pub mod transactions;

pub use itemset::Itemset;
pub use metrics::MiningMetrics;
pub use miner::{FrequentItemset, PatternMiner};
pub use rules::{Rule, RuleGenerator};
pub use transactions::{Support, TransactionSet};
