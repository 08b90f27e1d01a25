//! # Grammar Module
//!
//! Context-free grammars with ordered alternatives.
//!
//! ## Overview
//!
//! A [`Grammar`] maps each non-terminal to an ordered list of alternatives, each a
//! sequence of symbols. The order is significant: the parser always tries
//! alternative `#0` first.
//!
//! - **Classification**: a name is a non-terminal iff it has a rule; everything else
//!   is a terminal.
//! - **Terminals**: tagged at build time as [`Terminal::Literal`] (exact equality) or
//!   [`Terminal::Pattern`] (full regex match). See [`TerminalPolicy`] for how untagged
//!   names are classified.
//! - **Validation**: left recursion, empty rules and bad patterns are rejected by
//!   [`GrammarBuilder::build`]; unreachable rules become [`GrammarWarning`]s.
//!
//! ## Usage
//!
//! ```rust
//! use retro::grammar::GrammarBuilder;
//!
//! let grammar = GrammarBuilder::new()
//!     .entry_point("Expr")
//!     .rule("Expr", vec![vec!["Term", "+", "Expr"], vec!["Term"]])
//!     .rule("Term", vec![vec!["[0-9]+"]])
//!     .pattern("[0-9]+")
//!     .build()?;
//!
//! assert!(grammar.matches("[0-9]+", "17"));
//! assert!(grammar.matches("+", "+"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`GrammarWarning`]: crate::error::GrammarWarning

pub mod builder;
pub mod demo;
pub mod symbol;
pub mod validate;

#[cfg(feature = "serialize")]
pub mod definition;

pub use builder::*;
pub use symbol::*;
pub use validate::*;

#[cfg(feature = "serialize")]
pub use definition::*;
