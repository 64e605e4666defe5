//! Derived note views.
//!
//! # Responsibility
//! - Hold UI selections (`ViewState`) as a plain value with reducer methods.
//! - Derive the displayed sequence from a snapshot and those selections.
//!
//! # Invariants
//! - Deriving is pure: same snapshot + same state → same sequence.
//! - Filtering never reorders; only the tasks view sorts.

pub mod board;
pub mod pipeline;
