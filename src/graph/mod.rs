//! Sentence graph representation
//!
//! This module provides the dense matrix storage and the query-biased
//! transition matrix the ranker iterates over.

pub mod matrix;
pub mod transition;
