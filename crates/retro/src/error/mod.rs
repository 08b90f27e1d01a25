//! # Error Types
//!
//! Error types and run reports for grammar construction, tokenizing and parsing.
//!
//! ## Overview
//!
//! Errors are split by the moment they can happen:
//!
//! - [`GrammarError`]: problems found while building a [`Grammar`](crate::grammar::Grammar).
//!   These are configuration errors and never show up mid-parse.
//! - [`GrammarWarning`]: grammar properties worth reporting that do not prevent building.
//! - [`ParseError`]: a run that could not produce a verdict (unknown start symbol,
//!   exhausted step or time budget, corrupted configuration).
//! - [`LexerError`]: invalid token patterns or characters no pattern covers.
//!
//! A rejected input is *not* an error. Rejection is a normal outcome reported through
//! [`ParseOutcome::accepted`] together with the full configuration trace.
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with [`miette`]
//! for rich error reporting.

use crate::parser::{Trace, Transition};
use compact_str::CompactString;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors detected while constructing or editing a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("Missing entry point")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::missing_entry_point)))]
    MissingEntryPoint,

    #[error("Unknown symbol: '{0}' is not a rule of this grammar")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::unknown_symbol)))]
    UnknownSymbol(CompactString),

    #[error("Rule '{0}' has no alternatives")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::empty_rule)))]
    EmptyRule(CompactString),

    #[error("Rule '{0}' is already defined")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::duplicate_rule)))]
    DuplicateRule(CompactString),

    #[error("Invalid pattern '{pattern}': {reason}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::invalid_pattern)))]
    InvalidPattern {
        pattern: CompactString,
        reason: String,
    },

    #[error("Pattern '{0}' is also the name of a rule")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::pattern_shadows_rule)))]
    PatternShadowsRule(CompactString),

    #[error("Terminal '{0}' is tagged both as a pattern and as a literal")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(grammar::conflicting_terminal_tag))
    )]
    ConflictingTerminalTag(CompactString),

    #[error("Left recursion detected: {}", format_cycles(.0))]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(grammar::left_recursion),
            help("rewrite the rule, or call allow_left_recursion() and rely on the step budget")
        )
    )]
    LeftRecursion(Vec<Vec<CompactString>>),
}

/// Grammar properties reported by [`GrammarBuilder::build`](crate::grammar::GrammarBuilder::build)
/// that do not prevent building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarWarning {
    /// Left recursion accepted through `allow_left_recursion()`. Parsing an input that
    /// reaches the cycle only terminates through the step or time budget.
    LeftRecursion(Vec<CompactString>),
    /// A terminal classified as a pattern under [`TerminalPolicy::Inferred`] although it
    /// contains regex metacharacters and may have been meant literally.
    ///
    /// [`TerminalPolicy::Inferred`]: crate::grammar::TerminalPolicy::Inferred
    AmbiguousTerminal(CompactString),
    /// A rule that cannot be reached from the entry point.
    UnreachableRule(CompactString),
}

impl std::fmt::Display for GrammarWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeftRecursion(cycle) => {
                write!(f, "left recursive cycle {}", cycle.join(" -> "))
            }
            Self::AmbiguousTerminal(text) => {
                write!(f, "terminal '{text}' was classified as a pattern")
            }
            Self::UnreachableRule(name) => {
                write!(f, "rule '{name}' is unreachable from the entry point")
            }
        }
    }
}

fn format_cycles(cycles: &[Vec<CompactString>]) -> String {
    cycles
        .iter()
        .map(|cycle| cycle.join(" -> "))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A parser run that ended without a verdict.
#[derive(Debug, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    #[error("Unknown symbol: '{0}' is not a rule of this grammar")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::unknown_symbol)))]
    UnknownSymbol(CompactString),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Grammar(#[from] GrammarError),

    #[error("Corrupt configuration: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::corrupt_configuration)))]
    CorruptConfiguration(String),

    #[error("Step limit of {limit} exceeded")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(parser::step_limit),
            help("the grammar may be left recursive, or the input needs a larger budget")
        )
    )]
    StepLimitExceeded { limit: usize, trace: Box<Trace> },

    #[error("Time limit of {limit:?} exceeded after {steps} steps")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::time_limit)))]
    TimeLimitExceeded {
        limit: Duration,
        steps: usize,
        trace: Box<Trace>,
    },
}

impl ParseError {
    /// The configurations produced before the run was cut off, if any.
    #[must_use]
    pub fn partial_trace(&self) -> Option<&Trace> {
        match self {
            Self::StepLimitExceeded { trace, .. } | Self::TimeLimitExceeded { trace, .. } => {
                Some(trace)
            }
            _ => None,
        }
    }

    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptConfiguration(message.into())
    }
}

/// Errors produced by the [`Tokenizer`](crate::lexer::Tokenizer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexerError {
    #[error("Invalid token pattern '{pattern}': {reason}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::invalid_pattern)))]
    InvalidPattern { pattern: String, reason: String },

    #[error("Tokenizer needs at least one pattern")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::no_patterns)))]
    NoPatterns,

    #[error("Unexpected character '{ch}' at line {line}, column {column}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unexpected_char)))]
    UnexpectedChar { ch: char, line: usize, column: usize },
}

/// Counters collected during a single parser run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseMetrics {
    /// Transitions applied (trace length minus the initial configuration).
    pub steps: usize,
    pub expansions: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub retreats: usize,
    pub alternatives_tried: usize,
    pub escalations: usize,
    /// Deepest `matched` stack seen during the run.
    pub max_depth: usize,
    pub parse_time: Duration,
}

impl ParseMetrics {
    pub(crate) fn record(&mut self, transition: Transition, depth: usize) {
        self.steps += 1;
        self.max_depth = self.max_depth.max(depth);
        match transition {
            Transition::Expansion => self.expansions += 1,
            Transition::Match => self.matches += 1,
            Transition::Mismatch => self.mismatches += 1,
            Transition::Retreat => self.retreats += 1,
            Transition::NextAlternative => self.alternatives_tried += 1,
            Transition::Escalate => self.escalations += 1,
            Transition::Initial | Transition::Acceptance | Transition::Reject => {}
        }
    }
}

/// Verdict of a completed parser run.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// `true` when the run ended in [`Mode::Success`](crate::parser::Mode::Success).
    pub accepted: bool,
    /// Every configuration produced, in order.
    pub trace: Trace,
    pub metrics: ParseMetrics,
}

impl ParseOutcome {
    /// Final configuration of the run.
    #[must_use]
    pub fn final_configuration(&self) -> &crate::parser::Configuration {
        self.trace.last()
    }
}
