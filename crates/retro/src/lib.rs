//! # Retro
//!
//! A grammar-driven, backtracking top-down parser whose every step is inspectable.
//!
//! ## Overview
//!
//! Retro decides whether a sequence of tokens derives from a start symbol of a
//! context-free grammar. Instead of recursive descent it runs an explicit state
//! machine over immutable configurations:
//!
//! - **Grammars**: ordered alternatives, literal and regex terminals, build-time
//!   validation (left recursion, empty rules, invalid patterns)
//! - **Transparent backtracking**: every configuration of a run is kept in a
//!   [`Trace`](parser::Trace) and can be rendered as a table
//! - **Budgets**: step and time limits for pathological grammars
//! - **Sharing**: grammars are immutable and can serve concurrent parses
//!
//! ## Quick Start
//!
//! ```rust
//! use retro::grammar::GrammarBuilder;
//! use retro::parser::Parser;
//!
//! // 1. Build a grammar: S -> a S | b
//! let grammar = GrammarBuilder::new()
//!     .entry_point("S")
//!     .rule("S", vec![vec!["a", "S"], vec!["b"]])
//!     .build()
//!     .expect("Failed to build grammar");
//!
//! // 2. Parse a token sequence; the end marker "#" is appended automatically
//! let outcome = Parser::new(&grammar)
//!     .parse(["a", "a", "b"])
//!     .expect("Parse should not exceed its budget");
//! assert!(outcome.accepted);
//!
//! // 3. Inspect the run
//! let last = outcome.trace.last();
//! assert_eq!(last.matched_terminals(&grammar), vec!["a", "a", "b"]);
//! assert_eq!(last.alternative_history(), vec![0, 0, 1]);
//! assert_eq!(outcome.metrics.steps, 9);
//!
//! // 4. Rejection is an outcome, not an error
//! let outcome = Parser::new(&grammar).parse(["a", "c"]).unwrap();
//! assert!(!outcome.accepted);
//! println!("{}", outcome.trace.render(&grammar));
//! ```
//!
//! ## Modules
//!
//! - [`grammar`] - Grammar definition and validation
//! - [`parser`] - Configurations, the transition function and the driver
//! - [`lexer`] - Regex tokenizer producing parser input
//! - [`error`] - Error types and run reports
//! - [`testing`] - Sentence generators and trace invariant checks
//!
//! ## Features
//!
//! - `serialize`: JSON grammar tables and serializable trace rows (serde)
//! - `diagnostics`: `miette` diagnostics for all error types

pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod testing;

// Re-export commonly used types
pub use error::{GrammarError, GrammarWarning, LexerError, ParseError, ParseMetrics, ParseOutcome};
pub use grammar::{Grammar, GrammarBuilder, Symbol, Terminal, TerminalPolicy};
pub use lexer::Tokenizer;
pub use parser::{Configuration, Mode, Parser, ParserConfig, TokenStream, Trace, Transition};
