//! Transactions and the shared support measure
//!
//! Both the pattern miner and the rule generator count support through
//! [`TransactionSet::support`], and derive confidence and lift through
//! [`Support::confidence`] and [`Support::lift`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::itemset::Itemset;
use crate::error::{Error, Result};

/// Exact support of an itemset: `count` of `total` transactions contain it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Support {
    pub count: usize,
    pub total: usize,
}

impl Support {
    /// Fails with [`Error::EmptyTransactionSet`] when `total` is zero
    pub fn new(count: usize, total: usize) -> Result<Self> {
        if total == 0 {
            return Err(Error::EmptyTransactionSet);
        }
        debug_assert!(count <= total);
        Ok(Self { count, total })
    }

    /// Support as a fraction in [0, 1]
    pub fn value(&self) -> f64 {
        self.count as f64 / self.total as f64
    }

    pub fn meets(&self, threshold: f64) -> bool {
        self.value() >= threshold
    }

    pub fn is_zero(&self) -> bool {
        self.count == 0
    }

    /// Confidence of `antecedent → consequent` given `joint` = support(A ∪ C).
    ///
    /// `None` when the antecedent never occurs.
    pub fn confidence(joint: Support, antecedent: Support) -> Option<f64> {
        debug_assert_eq!(joint.total, antecedent.total);
        if antecedent.is_zero() {
            return None;
        }
        // The shared denominator cancels: (j/n) / (a/n) = j / a
        Some(joint.count as f64 / antecedent.count as f64)
    }

    /// Lift of `antecedent → consequent`: s(A ∪ C) / (s(A) · s(C)).
    ///
    /// `None` when either side never occurs.
    pub fn lift(joint: Support, antecedent: Support, consequent: Support) -> Option<f64> {
        debug_assert_eq!(joint.total, antecedent.total);
        debug_assert_eq!(joint.total, consequent.total);
        if antecedent.is_zero() || consequent.is_zero() {
            return None;
        }
        // (j/n) / ((a/n)(c/n)) = j·n / (a·c)
        let numerator = joint.count as f64 * joint.total as f64;
        let denominator = antecedent.count as f64 * consequent.count as f64;
        Some(numerator / denominator)
    }
}

/// Immutable collection of transactions, each stored as a canonical itemset
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSet<I> {
    transactions: Vec<Itemset<I>>,
}

impl<I: Ord> TransactionSet<I> {
    /// Build from raw item sequences; duplicates inside a sequence are dropped
    pub fn from_transactions<T, S>(transactions: T) -> Self
    where
        T: IntoIterator<Item = S>,
        S: IntoIterator<Item = I>,
    {
        Self {
            transactions: transactions.into_iter().map(Itemset::from_items).collect(),
        }
    }

    /// Build from per-user histories; user keys are discarded
    pub fn from_histories<K, T, S>(histories: T) -> Self
    where
        T: IntoIterator<Item = (K, S)>,
        S: IntoIterator<Item = I>,
    {
        Self::from_transactions(histories.into_iter().map(|(_, items)| items))
    }

    /// Number of transactions containing every member of `itemset`
    pub fn count(&self, itemset: &Itemset<I>) -> usize {
        self.transactions
            .iter()
            .filter(|transaction| itemset.is_subset(transaction))
            .count()
    }

    /// Support of `itemset` over all transactions
    pub fn support(&self, itemset: &Itemset<I>) -> Result<Support> {
        Support::new(self.count(itemset), self.transactions.len())
    }
}

impl<I: Ord + Clone> TransactionSet<I> {
    /// Every distinct item across all transactions, sorted
    pub fn distinct_items(&self) -> Vec<I> {
        self.transactions
            .iter()
            .flat_map(|transaction| transaction.iter().cloned())
            .collect::<BTreeSet<I>>()
            .into_iter()
            .collect()
    }
}

impl<I> TransactionSet<I> {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
