//! Client-side note search.
//!
//! # Responsibility
//! - Build an approximate-match index over note content.
//! - Report search state explicitly (inactive, no matches, matches).

pub mod fuzzy;
