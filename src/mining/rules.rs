//! Association rule generation
//!
//! Every frequent itemset of two or more items is split into all
//! antecedent/consequent pairs; a pair becomes a [`Rule`] when its confidence
//! meets `min_confidence`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, info};

use super::itemset::Itemset;
use super::metrics::{MiningMetrics, Stage, StageTimer};
use super::miner::FrequentItemset;
use super::transactions::{Support, TransactionSet};
use crate::config::MiningConfig;
use crate::error::{Error, Result};

/// "Transactions containing `antecedent` tend to contain `consequent`"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "I: Deserialize<'de> + Ord"))]
pub struct Rule<I> {
    pub antecedent: Itemset<I>,
    pub consequent: Itemset<I>,
    pub confidence: f64,
    pub lift: f64,
}

/// Emits rules from frequent itemsets
#[derive(Debug, Clone)]
pub struct RuleGenerator {
    config: MiningConfig,
}

/// Memoized support lookups against one transaction set
struct SupportCache<'a, I> {
    transactions: &'a TransactionSet<I>,
    known: HashMap<Itemset<I>, Support>,
}

impl<'a, I: Ord + Hash + Clone> SupportCache<'a, I> {
    fn new(transactions: &'a TransactionSet<I>) -> Self {
        Self {
            transactions,
            known: HashMap::new(),
        }
    }

    fn get(&mut self, itemset: &Itemset<I>) -> Result<Support> {
        if let Some(support) = self.known.get(itemset) {
            return Ok(*support);
        }
        let support = self.transactions.support(itemset)?;
        self.known.insert(itemset.clone(), support);
        Ok(support)
    }
}

impl RuleGenerator {
    pub fn new(config: MiningConfig) -> Self {
        Self { config }
    }

    /// Generate every rule meeting `min_confidence`.
    ///
    /// Supports are counted against `transactions` with the same function the
    /// miner uses. Splits whose antecedent or consequent never occurs are
    /// skipped. Output order is unspecified.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTransactionSet`] when `transactions` is empty.
    pub fn generate<I>(
        &self,
        frequent: &[FrequentItemset<I>],
        transactions: &TransactionSet<I>,
    ) -> Result<Vec<Rule<I>>>
    where
        I: Ord + Hash + Clone + Debug,
    {
        self.generate_with_metrics(frequent, transactions)
            .map(|(rules, _)| rules)
    }

    /// Same as [`generate`](Self::generate), also returning run counters
    pub fn generate_with_metrics<I>(
        &self,
        frequent: &[FrequentItemset<I>],
        transactions: &TransactionSet<I>,
    ) -> Result<(Vec<Rule<I>>, MiningMetrics)>
    where
        I: Ord + Hash + Clone + Debug,
    {
        if transactions.is_empty() {
            return Err(Error::EmptyTransactionSet);
        }

        let timer = StageTimer::start(Stage::Generation);
        let mut metrics = MiningMetrics::default();
        metrics.transactions = transactions.len();

        let mut cache = SupportCache::new(transactions);
        let mut rules = Vec::new();

        for entry in frequent.iter().filter(|f| f.itemset.len() >= 2) {
            let itemset = &entry.itemset;
            let joint = cache.get(itemset)?;

            for size in 1..itemset.len() {
                for antecedent in itemset.combinations(size) {
                    let consequent = itemset.difference(&antecedent);
                    metrics.splits_evaluated += 1;

                    match self.score(joint, antecedent, consequent, &mut cache) {
                        Ok(Some(rule)) => rules.push(rule),
                        Ok(None) => {}
                        Err(err) if err.is_recoverable() => {
                            debug!("Skipping rule candidate: {}", err);
                            metrics.degenerate_skipped += 1;
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        metrics.rules_emitted = rules.len();
        timer.finish(&mut metrics);

        info!(
            "Generated {} rules from {} frequent itemsets ({} splits, {} degenerate)",
            rules.len(),
            frequent.len(),
            metrics.splits_evaluated,
            metrics.degenerate_skipped
        );

        Ok((rules, metrics))
    }

    /// Score one split; `Ok(None)` when confidence falls below the threshold
    fn score<I>(
        &self,
        joint: Support,
        antecedent: Itemset<I>,
        consequent: Itemset<I>,
        cache: &mut SupportCache<'_, I>,
    ) -> Result<Option<Rule<I>>>
    where
        I: Ord + Hash + Clone + Debug,
    {
        let antecedent_support = cache.get(&antecedent)?;
        let confidence = Support::confidence(joint, antecedent_support)
            .ok_or_else(|| Error::degenerate(format!("{:?}", antecedent.items())))?;

        if confidence < self.config.min_confidence() {
            return Ok(None);
        }

        let consequent_support = cache.get(&consequent)?;
        let lift = Support::lift(joint, antecedent_support, consequent_support).ok_or_else(
            || {
                Error::degenerate(format!(
                    "{:?} -> {:?}",
                    antecedent.items(),
                    consequent.items()
                ))
            },
        )?;

        Ok(Some(Rule {
            antecedent,
            consequent,
            confidence,
            lift,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::PatternMiner;
    use std::collections::HashSet;

    fn config(min_support: f64, min_confidence: f64) -> MiningConfig {
        MiningConfig::new(min_support, min_confidence).unwrap()
    }

    fn mine(
        transactions: &TransactionSet<char>,
        min_support: f64,
        min_confidence: f64,
    ) -> Vec<Rule<char>> {
        let config = config(min_support, min_confidence);
        let frequent = PatternMiner::new(config).discover(transactions).unwrap();
        RuleGenerator::new(config)
            .generate(&frequent, transactions)
            .unwrap()
    }

    fn find<'a>(rules: &'a [Rule<char>], antecedent: &[char], consequent: &[char]) -> Option<&'a Rule<char>> {
        let antecedent = Itemset::from_items(antecedent.iter().copied());
        let consequent = Itemset::from_items(consequent.iter().copied());
        rules
            .iter()
            .find(|r| r.antecedent == antecedent && r.consequent == consequent)
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
    fn test_reference_scenario_rules() {
        let rules = mine(&scenario(), 0.5, 0.5);

        let a_to_b = find(&rules, &['A'], &['B']).expect("A -> B");
        assert!((a_to_b.confidence - 2.0 / 3.0).abs() < 1e-12);
        let b_to_a = find(&rules, &['B'], &['A']).expect("B -> A");
        assert!((b_to_a.confidence - 2.0 / 3.0).abs() < 1e-12);

        // C -> B: 0.5 / 0.5
        let c_to_b = find(&rules, &['C'], &['B']).expect("C -> B");
        assert_eq!(c_to_b.confidence, 1.0);
        assert!((c_to_b.lift - 0.5 / (0.5 * 0.75)).abs() < 1e-12);

        assert_eq!(rules.len(), 4);
    }

    #[test]
    fn test_confidence_threshold_filters() {
        let rules = mine(&scenario(), 0.5, 0.9);
        assert_eq!(rules.len(), 1);
        assert!(find(&rules, &['C'], &['B']).is_some());
    }

    #[test]
    fn test_single_items_produce_no_rules() {
        let tx = TransactionSet::from_transactions(vec![vec!['X']]);
        assert!(mine(&tx, 0.5, 0.0).is_empty());
    }

    #[test]
    fn test_three_item_splits_are_unique() {
        let tx = TransactionSet::from_transactions(vec![vec!['A', 'B', 'C']; 3]);
        let rules = mine(&tx, 0.5, 0.0);

        // 3 pairs × 2 splits + 1 triple × 6 splits
        assert_eq!(rules.len(), 12);
        let pairs: HashSet<_> = rules
            .iter()
            .map(|r| (r.antecedent.clone(), r.consequent.clone()))
            .collect();
        assert_eq!(pairs.len(), rules.len());
        for rule in &rules {
            assert!(rule.antecedent.is_disjoint(&rule.consequent));
            assert_eq!(rule.confidence, 1.0);
            assert_eq!(rule.lift, 1.0);
        }
    }

    #[test]
    fn test_zero_support_splits_are_skipped() {
        // At zero support {A,B} is frequent with zero occurrences:
        // A -> B has confidence 0 but no defined lift, and B never occurs.
        let tx = TransactionSet::from_transactions(vec![vec!['A'], vec!['C']]);
        let config = config(0.0, 0.0);
        let frequent = vec![FrequentItemset {
            itemset: Itemset::from_items(['A', 'B']),
            support: tx.support(&Itemset::from_items(['A', 'B'])).unwrap(),
        }];

        let (rules, metrics) = RuleGenerator::new(config)
            .generate_with_metrics(&frequent, &tx)
            .unwrap();

        assert!(rules.is_empty());
        assert_eq!(metrics.splits_evaluated, 2);
        assert_eq!(metrics.degenerate_skipped, 2);
    }

    #[test]
    fn test_empty_transactions_rejected() {
        let tx: TransactionSet<char> = TransactionSet::from_transactions(Vec::<Vec<char>>::new());
        let result = RuleGenerator::new(config(0.1, 0.1)).generate(&[], &tx);
        assert!(matches!(result, Err(Error::EmptyTransactionSet)));
    }

    #[test]
    fn test_rule_serializes_as_plain_lists() {
        let rule = Rule {
            antecedent: Itemset::from_items(["Heat".to_string()]),
            consequent: Itemset::from_items(["Ronin".to_string()]),
            confidence: 0.75,
            lift: 1.5,
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "antecedent": ["Heat"],
                "consequent": ["Ronin"],
                "confidence": 0.75,
                "lift": 1.5
            })
        );
    }
}
