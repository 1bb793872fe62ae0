use std::collections::{HashMap, HashSet};

use cooccur::mining::{FrequentItemset, Itemset, PatternMiner, RuleGenerator, Support, TransactionSet};
use cooccur::MiningConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEEDS: [u64; 6] = [1, 7, 42, 1234, 9001, 31337];

fn random_transactions(seed: u64) -> TransactionSet<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let count = rng.gen_range(10..40);
    TransactionSet::from_transactions((0..count).map(|_| {
        let len = rng.gen_range(0..6);
        // Skewed draw so some items co-occur often
        (0..len)
            .map(|_| rng.gen_range(0..4u8) + rng.gen_range(0..5u8))
            .collect::<Vec<_>>()
    }))
}

fn config(min_support: f64, min_confidence: f64) -> MiningConfig {
    MiningConfig::new(min_support, min_confidence).unwrap()
}

fn as_map(frequent: &[FrequentItemset<u8>]) -> HashMap<Itemset<u8>, Support> {
    frequent
        .iter()
        .map(|f| (f.itemset.clone(), f.support))
        .collect()
}

#[test]
fn frequent_itemsets_meet_threshold_with_exact_support() {
    for seed in SEEDS {
        let tx = random_transactions(seed);
        let frequent = PatternMiner::new(config(0.15, 0.5)).discover(&tx).unwrap();

        for f in &frequent {
            assert!(f.support.value() >= 0.15, "seed {seed}: {:?}", f);
            assert_eq!(f.support, tx.support(&f.itemset).unwrap());
        }
    }
}

#[test]
fn discovery_is_downward_closed() {
    for seed in SEEDS {
        let tx = random_transactions(seed);
        let found = as_map(&PatternMiner::new(config(0.1, 0.5)).discover(&tx).unwrap());

        for itemset in found.keys() {
            for size in 1..itemset.len() {
                for subset in itemset.combinations(size) {
                    assert!(
                        found.contains_key(&subset),
                        "seed {seed}: {:?} frequent but subset {:?} missing",
                        itemset,
                        subset
                    );
                }
            }
        }
    }
}

#[test]
fn support_is_anti_monotone() {
    for seed in SEEDS {
        let tx = random_transactions(seed);
        let found = as_map(&PatternMiner::new(config(0.05, 0.5)).discover(&tx).unwrap());

        for (small, small_support) in &found {
            for (large, large_support) in &found {
                if small.is_subset(large) {
                    assert!(small_support.count >= large_support.count, "seed {seed}");
                }
            }
        }
    }
}

#[test]
fn discovery_is_complete_for_pairs() {
    // Brute-force every pair of items and check nothing frequent was missed
    for seed in SEEDS {
        let tx = random_transactions(seed);
        let found = as_map(&PatternMiner::new(config(0.1, 0.5)).discover(&tx).unwrap());
        let items = tx.distinct_items();

        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                let pair = Itemset::from_items([*a, *b]);
                let support = tx.support(&pair).unwrap();
                assert_eq!(found.contains_key(&pair), support.meets(0.1), "seed {seed}: {:?}", pair);
            }
        }
    }
}

#[test]
fn discovery_is_idempotent() {
    for seed in SEEDS {
        let tx = random_transactions(seed);
        let miner = PatternMiner::new(config(0.1, 0.5));
        assert_eq!(as_map(&miner.discover(&tx).unwrap()), as_map(&miner.discover(&tx).unwrap()));
    }
}

#[test]
fn parallel_counting_matches_serial() {
    for seed in SEEDS {
        let tx = random_transactions(seed);
        let serial = PatternMiner::new(config(0.05, 0.5).with_parallel_threshold(usize::MAX));
        let parallel = PatternMiner::new(config(0.05, 0.5).with_parallel_threshold(0));
        assert_eq!(serial.discover(&tx).unwrap(), parallel.discover(&tx).unwrap());
    }
}

#[test]
fn rules_are_bounded_disjoint_and_unique() {
    for seed in SEEDS {
        let tx = random_transactions(seed);
        let config = config(0.1, 0.4);
        let frequent = PatternMiner::new(config).discover(&tx).unwrap();
        let found = as_map(&frequent);
        let rules = RuleGenerator::new(config).generate(&frequent, &tx).unwrap();

        let mut pairs = HashSet::new();
        for rule in &rules {
            assert!(rule.confidence >= 0.4 && rule.confidence <= 1.0, "seed {seed}: {:?}", rule);
            assert!(!rule.antecedent.is_empty() && !rule.consequent.is_empty());
            assert!(rule.antecedent.is_disjoint(&rule.consequent));
            assert!(found.contains_key(&rule.antecedent.union(&rule.consequent)));
            assert!(rule.lift > 0.0);
            assert!(pairs.insert((rule.antecedent.clone(), rule.consequent.clone())));
        }
    }
}

#[test]
fn rule_measures_match_definitions() {
    for seed in SEEDS {
        let tx = random_transactions(seed);
        let config = config(0.1, 0.0);
        let frequent = PatternMiner::new(config).discover(&tx).unwrap();
        let rules = RuleGenerator::new(config).generate(&frequent, &tx).unwrap();

        for rule in &rules {
            let joint = tx.support(&rule.antecedent.union(&rule.consequent)).unwrap().value();
            let antecedent = tx.support(&rule.antecedent).unwrap().value();
            let consequent = tx.support(&rule.consequent).unwrap().value();

            assert!((rule.confidence - joint / antecedent).abs() < 1e-9, "seed {seed}");
            assert!((rule.lift - joint / (antecedent * consequent)).abs() < 1e-9, "seed {seed}");
        }

        // With no confidence floor every split of every multi-item itemset is a rule
        let expected: usize = frequent
            .iter()
            .filter(|f| f.itemset.len() >= 2)
            .map(|f| (1usize << f.itemset.len()) - 2)
            .sum();
        assert_eq!(rules.len(), expected, "seed {seed}");
    }
}
