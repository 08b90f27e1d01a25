//! Retro Tools - command-line utilities for retro grammars
//!
//! This crate loads JSON grammar tables, runs the parser over tokenized input and
//! renders the resulting configuration traces.

pub mod cli;
pub mod report;

pub use report::*;
