//! # Parser Module
//!
//! Backtracking top-down parsing as an explicit state machine.
//!
//! ## Overview
//!
//! Parsing is a sequence of [`Configuration`]s. Each one is produced from its
//! predecessor by [`step`], which applies exactly one [`Transition`]:
//!
//! | Mode        | Transition                | Effect                                          |
//! |-------------|---------------------------|-------------------------------------------------|
//! | `Matching`  | `Expansion` (1)           | open the leftmost non-terminal with alternative 0 |
//! | `Matching`  | `Match` (2)               | consume a token                                  |
//! | `Matching`  | `Acceptance` (3)          | only the end sentinel is left: `Success`         |
//! | `Matching`  | `Mismatch` (4)            | switch to `Backtrack`                            |
//! | `Backtrack` | `Retreat` (5)             | give back the last matched terminal              |
//! | `Backtrack` | `NextAlternative` (6a)    | replace the open alternative with the next one   |
//! | `Backtrack` | `Reject` (6b)             | the start symbol is exhausted: `Fail`            |
//! | `Backtrack` | `Escalate` (6c)           | close an exhausted non-terminal, keep unwinding  |
//!
//! [`Parser`] drives [`step`] to a final mode under a [`ParserConfig`] budget and
//! returns the complete [`Trace`].
//!
//! ## Usage
//!
//! ```rust
//! use retro::grammar::GrammarBuilder;
//! use retro::parser::{Parser, Transition};
//!
//! let grammar = GrammarBuilder::new()
//!     .entry_point("S")
//!     .rule("S", vec![vec!["a", "S"], vec!["b"]])
//!     .build()?;
//!
//! let outcome = Parser::new(&grammar).parse(["a", "c"])?;
//! assert!(!outcome.accepted);
//! assert_eq!(outcome.trace.last().transition(), Transition::Reject);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod configuration;
pub mod driver;
pub mod engine;
pub mod stack;
pub mod stream;
pub mod trace;

pub use config::ParserConfig;
pub use configuration::{Configuration, Mode, Transition};
pub use driver::Parser;
pub use engine::step;
pub use stack::Stack;
pub use stream::TokenStream;
pub use trace::{Trace, TraceRow};
