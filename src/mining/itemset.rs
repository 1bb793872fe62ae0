//! Canonical itemsets
//!
//! An [`Itemset`] keeps its members sorted and deduplicated, so equality,
//! ordering and hashing are all defined over the canonical form regardless
//! of insertion order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// An unordered set of distinct items stored in canonical (sorted) order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset<I> {
    items: Vec<I>,
}

impl<I: Ord> Itemset<I> {
    /// Build an itemset from any collection, dropping duplicates
    pub fn from_items(items: impl IntoIterator<Item = I>) -> Self {
        let mut items: Vec<I> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self { items }
    }

    pub fn singleton(item: I) -> Self {
        Self { items: vec![item] }
    }

    pub fn contains(&self, item: &I) -> bool {
        self.items.binary_search(item).is_ok()
    }

    /// True if every member of `self` is also a member of `other`
    pub fn is_subset(&self, other: &Itemset<I>) -> bool {
        if self.items.len() > other.items.len() {
            return false;
        }
        let mut theirs = other.items.iter();
        'outer: for mine in &self.items {
            for candidate in theirs.by_ref() {
                match candidate.cmp(mine) {
                    Ordering::Less => continue,
                    Ordering::Equal => continue 'outer,
                    Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }

    pub fn is_disjoint(&self, other: &Itemset<I>) -> bool {
        let (mut a, mut b) = (self.items.iter().peekable(), other.items.iter().peekable());
        while let (Some(x), Some(y)) = (a.peek(), b.peek()) {
            match x.cmp(y) {
                Ordering::Less => {
                    a.next();
                }
                Ordering::Greater => {
                    b.next();
                }
                Ordering::Equal => return false,
            }
        }
        true
    }
}

impl<I: Ord + Clone> Itemset<I> {
    /// Sorted merge of both itemsets
    pub fn union(&self, other: &Itemset<I>) -> Itemset<I> {
        let mut items = Vec::with_capacity(self.items.len() + other.items.len());
        let (mut a, mut b) = (self.items.iter().peekable(), other.items.iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (Some(x), Some(y)) => match x.cmp(y) {
                    Ordering::Less => items.extend(a.next().cloned()),
                    Ordering::Greater => items.extend(b.next().cloned()),
                    Ordering::Equal => {
                        items.extend(a.next().cloned());
                        b.next();
                    }
                },
                (Some(_), None) => items.extend(a.next().cloned()),
                (None, Some(_)) => items.extend(b.next().cloned()),
                (None, None) => break,
            }
        }
        Itemset { items }
    }

    /// Members of `self` that are not in `other`
    pub fn difference(&self, other: &Itemset<I>) -> Itemset<I> {
        Itemset {
            items: self
                .items
                .iter()
                .filter(|item| !other.contains(item))
                .cloned()
                .collect(),
        }
    }

    /// All sub-itemsets of exactly `k` members, in lexicographic order.
    ///
    /// Yields nothing when `k` is 0 or larger than the itemset.
    pub fn combinations(&self, k: usize) -> Combinations<'_, I> {
        Combinations::new(&self.items, k)
    }
}

impl<I> Itemset<I> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.items.iter()
    }
}

impl<I: Ord> FromIterator<I> for Itemset<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self::from_items(iter)
    }
}

impl<'a, I> IntoIterator for &'a Itemset<I> {
    type Item = &'a I;
    type IntoIter = std::slice::Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<I: fmt::Display> fmt::Display for Itemset<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}

// Serialized as a plain list of items; deserialization re-canonicalizes.
impl<I: Serialize> Serialize for Itemset<I> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, I: Deserialize<'de> + Ord> Deserialize<'de> for Itemset<I> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<I>::deserialize(deserializer).map(Itemset::from_items)
    }
}

/// Iterator over fixed-size sub-itemsets, see [`Itemset::combinations`]
pub struct Combinations<'a, I> {
    items: &'a [I],
    indices: Vec<usize>,
    done: bool,
}

impl<'a, I> Combinations<'a, I> {
    fn new(items: &'a [I], k: usize) -> Self {
        Self {
            items,
            indices: (0..k).collect(),
            done: k == 0 || k > items.len(),
        }
    }
}

impl<'a, I: Clone> Iterator for Combinations<'a, I> {
    type Item = Itemset<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Indices are strictly increasing, so the picked items stay sorted.
        let current = Itemset {
            items: self.indices.iter().map(|&i| self.items[i].clone()).collect(),
        };

        let n = self.items.len();
        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] != i + n - k) {
            Some(i) => {
                self.indices[i] += 1;
                for j in (i + 1)..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(current)
    }
}
