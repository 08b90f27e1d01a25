//! Grammar tables in JSON form.
//!
//! ```json
//! {
//!   "start": "S",
//!   "patterns": ["[0-9]+"],
//!   "rules": [
//!     { "name": "S", "alternatives": [["[0-9]+", "S"], ["end"]] }
//!   ]
//! }
//! ```

use crate::error::GrammarError;
use crate::grammar::builder::DEFAULT_END_MARKER;
use crate::grammar::{Grammar, GrammarBuilder, Terminal, TerminalPolicy};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Serializable grammar table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarDefinition {
    pub start: CompactString,
    #[serde(default = "default_end_marker")]
    pub end_marker: CompactString,
    #[serde(default, alias = "terminals")]
    pub terminal_policy: TerminalPolicy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<CompactString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub literals: Vec<CompactString>,
    #[serde(default)]
    pub allow_left_recursion: bool,
    pub rules: Vec<RuleDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    pub name: CompactString,
    pub alternatives: Vec<Vec<CompactString>>,
}

fn default_end_marker() -> CompactString {
    CompactString::from(DEFAULT_END_MARKER)
}

impl GrammarDefinition {
    /// # Errors
    ///
    /// Returns the serde error if `json` is not a valid grammar table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Errors
    ///
    /// Returns the serde error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn to_builder(&self) -> GrammarBuilder {
        let mut builder = GrammarBuilder::new()
            .entry_point(self.start.clone())
            .end_marker(self.end_marker.clone())
            .terminal_policy(self.terminal_policy);
        if self.allow_left_recursion {
            builder = builder.allow_left_recursion();
        }
        for pattern in &self.patterns {
            builder = builder.pattern(pattern.clone());
        }
        for literal in &self.literals {
            builder = builder.literal(literal.clone());
        }
        for rule in &self.rules {
            builder = builder.rule(rule.name.clone(), rule.alternatives.clone());
        }
        builder
    }

    /// # Errors
    ///
    /// Returns any error [`GrammarBuilder::build`] reports for this table.
    pub fn build(&self) -> Result<Grammar, GrammarError> {
        self.to_builder().build()
    }
}

impl Grammar {
    /// Export this grammar as a table. Pattern terminals are listed explicitly, so
    /// the table rebuilds the same grammar under the default policy.
    #[must_use]
    pub fn to_definition(&self) -> GrammarDefinition {
        let patterns = self
            .terminals()
            .filter_map(|(_, terminal)| match terminal {
                Terminal::Pattern(pattern) => Some(CompactString::from(pattern.source())),
                Terminal::Literal(_) => None,
            })
            .collect();
        let rules = self
            .non_terminals()
            .map(|(id, name)| RuleDefinition {
                name: name.into(),
                alternatives: self
                    .alternatives_of(id)
                    .iter()
                    .map(|alternative| {
                        alternative
                            .iter()
                            .map(|symbol| CompactString::from(self.name(*symbol)))
                            .collect()
                    })
                    .collect(),
            })
            .collect();
        GrammarDefinition {
            start: self.entry_point_name().into(),
            end_marker: self.end_marker().into(),
            terminal_policy: TerminalPolicy::Literal,
            patterns,
            literals: Vec::new(),
            allow_left_recursion: self.validation_options().allow_left_recursion,
            rules,
        }
    }
}
