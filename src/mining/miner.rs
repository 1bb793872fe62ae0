//! Level-wise frequent itemset discovery (Apriori)

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;
use tracing::{debug, info};

use super::itemset::Itemset;
use super::metrics::{LevelMetrics, MiningMetrics, Stage, StageTimer};
use super::transactions::{Support, TransactionSet};
use crate::config::MiningConfig;
use crate::error::{Error, Result};

/// An itemset together with its support over the mined transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "I: Deserialize<'de> + Ord"))]
pub struct FrequentItemset<I> {
    pub itemset: Itemset<I>,
    pub support: Support,
}

/// Discovers every itemset whose support meets `min_support`
#[derive(Debug, Clone)]
pub struct PatternMiner {
    config: MiningConfig,
}

impl PatternMiner {
    pub fn new(config: MiningConfig) -> Self {
        Self { config }
    }

    /// Run the level-wise search.
    ///
    /// Output order is by itemset size, then canonical itemset order, though
    /// callers should not rely on it.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTransactionSet`] when `transactions` is empty.
    pub fn discover<I>(&self, transactions: &TransactionSet<I>) -> Result<Vec<FrequentItemset<I>>>
    where
        I: Ord + Hash + Clone + Send + Sync,
    {
        self.discover_with_metrics(transactions)
            .map(|(frequent, _)| frequent)
    }

    /// Same as [`discover`](Self::discover), also returning run counters
    pub fn discover_with_metrics<I>(
        &self,
        transactions: &TransactionSet<I>,
    ) -> Result<(Vec<FrequentItemset<I>>, MiningMetrics)>
    where
        I: Ord + Hash + Clone + Send + Sync,
    {
        if transactions.is_empty() {
            return Err(Error::EmptyTransactionSet);
        }

        let timer = StageTimer::start(Stage::Discovery);
        let mut metrics = MiningMetrics::default();
        metrics.transactions = transactions.len();

        let items = transactions.distinct_items();
        metrics.distinct_items = items.len();

        let mut candidates: Vec<Itemset<I>> = items.into_iter().map(Itemset::singleton).collect();
        let mut all_frequent = Vec::new();
        let mut size = 1;

        while !candidates.is_empty() {
            let parallel = candidates.len() > self.config.parallel_threshold();
            let candidate_count = candidates.len();
            let frequent = self.count_level(candidates, transactions, parallel)?;

            debug!(
                "Level {}: {} candidates, {} frequent{}",
                size,
                candidate_count,
                frequent.len(),
                if parallel { " (parallel)" } else { "" }
            );
            metrics.levels.push(LevelMetrics {
                size,
                candidates: candidate_count,
                frequent: frequent.len(),
                parallel,
            });

            if frequent.is_empty() {
                break;
            }

            candidates = Self::generate_candidates(&frequent, size);
            all_frequent.extend(frequent);
            size += 1;
        }

        metrics.frequent_itemsets = all_frequent.len();
        timer.finish(&mut metrics);

        info!(
            "Discovered {} frequent itemsets over {} transactions (max size {})",
            all_frequent.len(),
            transactions.len(),
            metrics.max_frequent_size()
        );

        Ok((all_frequent, metrics))
    }

    /// Count support for every candidate and keep those meeting the threshold.
    ///
    /// Each candidate's count depends only on the candidate and the
    /// transactions, so the parallel path yields the same result, in the
    /// same order, as the serial one.
    fn count_level<I>(
        &self,
        candidates: Vec<Itemset<I>>,
        transactions: &TransactionSet<I>,
        parallel: bool,
    ) -> Result<Vec<FrequentItemset<I>>>
    where
        I: Ord + Clone + Send + Sync,
    {
        let min_support = self.config.min_support();
        let score = |itemset: Itemset<I>| -> Result<Option<FrequentItemset<I>>> {
            let support = transactions.support(&itemset)?;
            Ok(support
                .meets(min_support)
                .then_some(FrequentItemset { itemset, support }))
        };

        let scored: Vec<Option<FrequentItemset<I>>> = if parallel {
            candidates.into_par_iter().map(score).collect::<Result<_>>()?
        } else {
            candidates.into_iter().map(score).collect::<Result<_>>()?
        };

        Ok(scored.into_iter().flatten().collect())
    }

    /// Build size `size + 1` candidates from pairwise unions of frequent
    /// size-`size` itemsets.
    ///
    /// A union qualifies only if it has exactly `size + 1` items and all of
    /// its `size`-subsets are frequent; anything containing a discarded
    /// itemset can never meet the threshold.
    fn generate_candidates<I>(frequent: &[FrequentItemset<I>], size: usize) -> Vec<Itemset<I>>
    where
        I: Ord + Hash + Clone,
    {
        let known: HashSet<&Itemset<I>> = frequent.iter().map(|f| &f.itemset).collect();
        let mut candidates = BTreeSet::new();

        for (i, left) in frequent.iter().enumerate() {
            for right in &frequent[i + 1..] {
                let union = left.itemset.union(&right.itemset);
                if union.len() != size + 1 || candidates.contains(&union) {
                    continue;
                }
                if Self::has_infrequent_subset(&union, size, &known) {
                    continue;
                }
                candidates.insert(union);
            }
        }

        candidates.into_iter().collect()
    }

    fn has_infrequent_subset<I>(
        candidate: &Itemset<I>,
        size: usize,
        known: &HashSet<&Itemset<I>>,
    ) -> bool
    where
        I: Ord + Hash + Clone,
    {
        candidate
            .combinations(size)
            .any(|subset| !known.contains(&subset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn miner(min_support: f64) -> PatternMiner {
        PatternMiner::new(MiningConfig::new(min_support, 0.5).unwrap())
    }

    fn by_itemset<I: Ord + Hash + Clone>(
        frequent: &[FrequentItemset<I>],
    ) -> HashMap<Itemset<I>, Support> {
        frequent
            .iter()
            .map(|f| (f.itemset.clone(), f.support))
            .collect()
    }

    fn scenario() -> TransactionSet<char> {
        TransactionSet::from_transactions(vec![
            vec!['A', 'B'],
            vec!['A', 'B', 'C'],
            vec!['A'],
            vec!['B', 'C'],
        ])
    }

    #[test]
    fn test_reference_scenario() {
        let found = by_itemset(&miner(0.5).discover(&scenario()).unwrap());

        let support = |items: &[char]| found.get(&Itemset::from_items(items.iter().copied()));
        assert_eq!(support(&['A']), Some(&Support { count: 3, total: 4 }));
        assert_eq!(support(&['B']), Some(&Support { count: 3, total: 4 }));
        assert_eq!(support(&['C']), Some(&Support { count: 2, total: 4 }));
        assert_eq!(support(&['A', 'B']), Some(&Support { count: 2, total: 4 }));
        assert_eq!(support(&['B', 'C']), Some(&Support { count: 2, total: 4 }));
        assert_eq!(support(&['A', 'C']), None);
        assert_eq!(support(&['A', 'B', 'C']), None);
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn test_single_transaction_single_item() {
        let tx = TransactionSet::from_transactions(vec![vec!["solo"]]);
        let found = miner(0.5).discover(&tx).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].itemset, Itemset::singleton("solo"));
        assert_eq!(found[0].support.value(), 1.0);
    }

    #[test]
    fn test_empty_transactions_rejected() {
        let tx: TransactionSet<u32> = TransactionSet::from_transactions(Vec::<Vec<u32>>::new());
        assert!(matches!(
            miner(0.1).discover(&tx),
            Err(Error::EmptyTransactionSet)
        ));
    }

    #[test]
    fn test_transactions_without_items_yield_nothing() {
        let tx = TransactionSet::from_transactions(vec![Vec::<u32>::new(), Vec::new()]);
        assert!(miner(0.0).discover(&tx).unwrap().is_empty());
    }

    #[test]
    fn test_zero_support_terminates() {
        // Every combination qualifies at zero support; the search still ends
        // once itemsets reach the number of distinct items.
        let tx = TransactionSet::from_transactions(vec![vec![1, 2], vec![3]]);
        let found = miner(0.0).discover(&tx).unwrap();
        assert_eq!(found.len(), 7);
        assert!(found.iter().any(|f| f.itemset.len() == 3 && f.support.is_zero()));
    }

    #[test]
    fn test_metrics_track_levels() {
        let (found, metrics) = miner(0.5).discover_with_metrics(&scenario()).unwrap();
        assert_eq!(metrics.transactions, 4);
        assert_eq!(metrics.distinct_items, 3);
        assert_eq!(metrics.frequent_itemsets, found.len());
        assert_eq!(metrics.levels[0].candidates, 3);
        assert_eq!(metrics.levels[0].frequent, 3);
        // {A,C} is the only candidate pair to fail
        assert_eq!(metrics.levels[1].candidates, 3);
        assert_eq!(metrics.levels[1].frequent, 2);
        assert_eq!(metrics.max_frequent_size(), 2);
    }

    #[test]
    fn test_candidates_require_frequent_subsets() {
        let tx = TransactionSet::from_transactions(vec![
            vec![1, 2],
            vec![1, 2],
            vec![2, 3],
            vec![2, 3],
            vec![1, 3],
        ]);
        let level_two = vec![
            FrequentItemset {
                itemset: Itemset::from_items([1, 2]),
                support: tx.support(&Itemset::from_items([1, 2])).unwrap(),
            },
            FrequentItemset {
                itemset: Itemset::from_items([2, 3]),
                support: tx.support(&Itemset::from_items([2, 3])).unwrap(),
            },
        ];
        // {1,2,3} is a valid union but {1,3} is not frequent
        assert!(PatternMiner::generate_candidates(&level_two, 2).is_empty());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let tx = TransactionSet::from_transactions(
            (0..200u32).map(|i| vec![i % 7, i % 5, i % 3 + 10]),
        );
        let serial = PatternMiner::new(
            MiningConfig::new(0.05, 0.5)
                .unwrap()
                .with_parallel_threshold(usize::MAX),
        );
        let parallel =
            PatternMiner::new(MiningConfig::new(0.05, 0.5).unwrap().with_parallel_threshold(0));

        assert_eq!(serial.discover(&tx).unwrap(), parallel.discover(&tx).unwrap());
    }
}
