//! Mining Metrics and Performance Monitoring
//!
//! Per-run counters for the level-wise search and rule generation, used for
//! logging and for diagnosing threshold choices.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Counters for a single level of the itemset search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMetrics {
    /// Itemset size at this level
    pub size: usize,
    /// Candidates whose support was counted
    pub candidates: usize,
    /// Candidates that met the support threshold
    pub frequent: usize,
    /// Whether support counting ran on the rayon pool
    pub parallel: bool,
}

/// Metrics for a single mining run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningMetrics {
    pub run_id: String,
    pub timestamp: i64,

    // Input
    pub transactions: usize,
    pub distinct_items: usize,

    // Itemset search
    pub levels: Vec<LevelMetrics>,
    pub frequent_itemsets: usize,
    pub discovery_ms: u64,

    // Rule generation
    pub splits_evaluated: usize,
    pub rules_emitted: usize,
    pub degenerate_skipped: usize,
    pub generation_ms: u64,
}

impl Default for MiningMetrics {
    fn default() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            transactions: 0,
            distinct_items: 0,
            levels: Vec::new(),
            frequent_itemsets: 0,
            discovery_ms: 0,
            splits_evaluated: 0,
            rules_emitted: 0,
            degenerate_skipped: 0,
            generation_ms: 0,
        }
    }
}

impl MiningMetrics {
    /// Total candidates counted across every level
    pub fn total_candidates(&self) -> usize {
        self.levels.iter().map(|level| level.candidates).sum()
    }

    /// Largest itemset size with at least one frequent itemset
    pub fn max_frequent_size(&self) -> usize {
        self.levels
            .iter()
            .filter(|level| level.frequent > 0)
            .map(|level| level.size)
            .max()
            .unwrap_or(0)
    }

    /// Fold rule-generation counters from another run into this one
    pub fn merge_generation(&mut self, other: &MiningMetrics) {
        self.splits_evaluated += other.splits_evaluated;
        self.rules_emitted += other.rules_emitted;
        self.degenerate_skipped += other.degenerate_skipped;
        self.generation_ms += other.generation_ms;
    }

    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            transactions = self.transactions,
            distinct_items = self.distinct_items,
            frequent_itemsets = self.frequent_itemsets,
            candidates = self.total_candidates(),
            max_size = self.max_frequent_size(),
            rules = self.rules_emitted,
            degenerate = self.degenerate_skipped,
            discovery_ms = self.discovery_ms,
            generation_ms = self.generation_ms,
            "Mining run summary"
        );
    }
}

/// Mining stages that report a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Generation,
}

impl Stage {
    fn name(self) -> &'static str {
        match self {
            Stage::Discovery => "frequent itemset discovery",
            Stage::Generation => "rule generation",
        }
    }
}

/// Stages running longer than this are logged at warn level
pub const SLOW_STAGE_MS: u64 = 5_000;

/// Wall-clock timer for one stage, recorded into [`MiningMetrics`] on finish
#[derive(Debug)]
pub struct StageTimer {
    stage: Stage,
    start: Instant,
}

impl StageTimer {
    pub fn start(stage: Stage) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }

    /// Store the elapsed time in the stage's duration field of `metrics`
    pub fn finish(self, metrics: &mut MiningMetrics) -> u64 {
        let elapsed = self.start.elapsed().as_millis() as u64;
        match self.stage {
            Stage::Discovery => metrics.discovery_ms = elapsed,
            Stage::Generation => metrics.generation_ms = elapsed,
        }

        if elapsed > SLOW_STAGE_MS {
            tracing::warn!(
                run_id = %metrics.run_id,
                "Slow stage: {} took {}ms (threshold: {}ms)",
                self.stage.name(),
                elapsed,
                SLOW_STAGE_MS
            );
        } else {
            tracing::debug!("{} completed in {}ms", self.stage.name(), elapsed);
        }
        elapsed
    }
}
