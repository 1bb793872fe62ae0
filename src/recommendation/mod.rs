//! Recommendation Module
//!
//! Ranks association-rule consequents for a user.
//!
//! ## Feed Types
//!
//! - **History**: rules whose whole antecedent the user already likes
//! - **Last item**: rules whose antecedent mentions the most recently liked item
//!
//! Both exclude items already in the history and score each candidate by the
//! strongest matching rule's confidence.

pub mod engine;

pub use engine::{Recommendation, Recommender};
