use crate::grammar::{Grammar, Symbol};
use crate::parser::{Configuration, Mode};
use std::fmt::Write as _;

/// Every configuration of one parser run, in order.
///
/// A trace is never empty: it starts with the initial configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    initial: Configuration,
    steps: Vec<Configuration>,
}

/// One configuration rendered as text, the shape of the diagnostic table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct TraceRow {
    pub mode: char,
    pub cursor: usize,
    pub rule: &'static str,
    /// Committed symbols, oldest first.
    pub matched: String,
    /// Pending symbols, next first.
    pub pending: String,
    /// Alternative indices of the open non-terminals, oldest first.
    pub alternatives: String,
}

impl Trace {
    pub(crate) fn new(initial: Configuration) -> Self {
        Self {
            initial,
            steps: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, configuration: Configuration) {
        self.steps.push(configuration);
    }

    /// Number of configurations, the initial one included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len() + 1
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Number of transitions applied.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub const fn first(&self) -> &Configuration {
        &self.initial
    }

    #[must_use]
    pub fn last(&self) -> &Configuration {
        self.steps.last().unwrap_or(&self.initial)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Configuration> {
        match index {
            0 => Some(&self.initial),
            _ => self.steps.get(index - 1),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Configuration> + '_ {
        std::iter::once(&self.initial).chain(&self.steps)
    }

    #[must_use]
    pub fn accepted(&self) -> bool {
        self.last().mode() == Mode::Success
    }

    #[must_use]
    pub fn rows(&self, grammar: &Grammar) -> Vec<TraceRow> {
        self.iter().map(|config| row(config, grammar)).collect()
    }

    /// Fixed-width text table with one line per configuration.
    #[must_use]
    pub fn render(&self, grammar: &Grammar) -> String {
        let rows = self.rows(grammar);
        let matched_width = rows
            .iter()
            .map(|row| row.matched.chars().count())
            .chain(std::iter::once("matched".len()))
            .max()
            .unwrap_or(0);
        let pending_width = rows
            .iter()
            .map(|row| row.pending.chars().count())
            .chain(std::iter::once("pending".len()))
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>5}  {}  {:>6}  {:<4}  {:<matched_width$}  {:<pending_width$}  alternatives",
            "step", "s", "cursor", "rule", "matched", "pending"
        );
        for (index, row) in rows.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>5}  {}  {:>6}  {:<4}  {:<matched_width$}  {:<pending_width$}  {}",
                index, row.mode, row.cursor, row.rule, row.matched, row.pending, row.alternatives
            );
        }
        out
    }

    /// Non-terminals of an accepted run in leftmost derivation order, each with the
    /// index of the alternative that succeeded. `None` if the run was not accepted.
    #[must_use]
    pub fn derivation<'g>(&self, grammar: &'g Grammar) -> Option<Vec<(&'g str, usize)>> {
        if !self.accepted() {
            return None;
        }
        let last = self.last();
        let non_terminals = last
            .matched_symbols()
            .into_iter()
            .filter_map(Symbol::as_non_terminal);
        Some(
            non_terminals
                .zip(last.alternative_history())
                .map(|(id, index)| (grammar.rule_name(id), index))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Configuration;
    type IntoIter =
        std::iter::Chain<std::iter::Once<&'a Configuration>, std::slice::Iter<'a, Configuration>>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(&self.initial).chain(self.steps.iter())
    }
}

fn row(config: &Configuration, grammar: &Grammar) -> TraceRow {
    TraceRow {
        mode: config.mode().code(),
        cursor: config.cursor(),
        rule: config.transition().tag(),
        matched: join_symbols(config.matched_symbols(), grammar),
        pending: join_symbols(config.pending_symbols(), grammar),
        alternatives: config
            .alternative_history()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn join_symbols(symbols: Vec<Symbol>, grammar: &Grammar) -> String {
    symbols
        .into_iter()
        .map(|symbol| grammar.name(symbol))
        .collect::<Vec<_>>()
        .join(" ")
}
