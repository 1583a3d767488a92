//! Summary assembly
//!
//! Puts scored sentences into rank order and greedily selects a
//! non-redundant subset under a word budget.

pub mod ranking;
pub mod selector;

pub use ranking::{sort_by_rank, RankedSentence};
pub use selector::{BudgetedSelector, Selection};
