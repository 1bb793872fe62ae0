//! Recommendation Engine
//!
//! Turns association rules into ranked item lists for a single user, either
//! from the whole history or from the most recently liked item.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

use crate::mining::{Itemset, Rule};

/// A recommended item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "I: Deserialize<'de> + Ord"))]
pub struct Recommendation<I> {
    pub item: I,
    /// Highest confidence among the rules that matched this item
    pub confidence: f64,
    /// Antecedent of the first rule that reached `confidence`
    pub because: Itemset<I>,
}

/// Ranks rule consequents against a user's history
#[derive(Debug, Clone)]
pub struct Recommender<I> {
    rules: Vec<Rule<I>>,
}

impl<I: Ord + Hash + Clone> Recommender<I> {
    pub fn new(rules: Vec<Rule<I>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule<I>] {
        &self.rules
    }

    /// Recommend from rules whose antecedent is contained in `history`
    pub fn recommend_from_history(&self, history: &[I], top_n: usize) -> Vec<Recommendation<I>> {
        let seen = Itemset::from_items(history.iter().cloned());
        let matching = self
            .rules
            .iter()
            .filter(|rule| rule.antecedent.is_subset(&seen));

        let result = Self::rank(matching, &seen, top_n);
        debug!(
            "History of {} items produced {} recommendations",
            seen.len(),
            result.len()
        );
        result
    }

    /// Recommend from rules whose antecedent contains `last_item`.
    ///
    /// Items already in `history` are still excluded.
    pub fn recommend_from_last_item(
        &self,
        last_item: &I,
        history: &[I],
        top_n: usize,
    ) -> Vec<Recommendation<I>> {
        let seen = Itemset::from_items(history.iter().cloned());
        let matching = self
            .rules
            .iter()
            .filter(|rule| rule.antecedent.contains(last_item));

        Self::rank(matching, &seen, top_n)
    }

    /// Max-confidence per unseen consequent item, best first.
    ///
    /// The sort is stable, so equal scores keep the order in which items
    /// were first reached.
    fn rank<'a>(
        matching: impl Iterator<Item = &'a Rule<I>>,
        seen: &Itemset<I>,
        top_n: usize,
    ) -> Vec<Recommendation<I>>
    where
        I: 'a,
    {
        let mut ranked: Vec<Recommendation<I>> = Vec::new();
        let mut positions: HashMap<I, usize> = HashMap::new();

        for rule in matching {
            for item in rule.consequent.iter().filter(|item| !seen.contains(item)) {
                match positions.get(item) {
                    Some(&idx) => {
                        let entry = &mut ranked[idx];
                        if rule.confidence > entry.confidence {
                            entry.confidence = rule.confidence;
                            entry.because = rule.antecedent.clone();
                        }
                    }
                    None => {
                        positions.insert(item.clone(), ranked.len());
                        ranked.push(Recommendation {
                            item: item.clone(),
                            confidence: rule.confidence,
                            because: rule.antecedent.clone(),
                        });
                    }
                }
            }
        }

        ranked.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(top_n);
        ranked
    }
}
