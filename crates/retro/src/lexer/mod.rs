//! # Lexer Module
//!
//! Turns source text into the token strings the parser matches terminals against.
//!
//! The parser itself only sees strings, so any tokenizer can feed it. This module
//! provides a regex splitter ([`Tokenizer`]) with a default pattern set for the
//! demo language in [`crate::grammar::demo`].

pub mod tokenizer;

pub use tokenizer::{Tokenizer, DEFAULT_PATTERNS};
