//! # Testing Utilities
//!
//! This module provides utilities for testing grammars and the parser engine.
//!
//! ## Property-Based Testing
//!
//! [`SentenceGenerator`] produces random sentences derivable from a grammar. They
//! work with the `proptest` crate: every generated sentence of a grammar without
//! left recursion must be accepted.
//!
//! ## Trace Checks
//!
//! [`check_trace`] verifies the structural invariants of a parser trace and that
//! each configuration is the successor of the one before it. The property tests
//! and the fuzz target run it on every trace they produce.

pub mod generators;
pub mod invariants;

pub use generators::*;
pub use invariants::*;
