use crate::grammar::{Grammar, NonTerminalId, Symbol};
use crate::parser::Stack;

/// Which family of transitions applies next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    Matching,
    Backtrack,
    /// Final: the input derives from the start symbol.
    Success,
    /// Final: the start symbol ran out of alternatives.
    Fail,
}

impl Mode {
    /// Single-letter code used in the tabular trace view.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Matching => 'n',
            Self::Backtrack => 'r',
            Self::Success => 't',
            Self::Fail => 'e',
        }
    }

    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Success | Self::Fail)
    }
}

/// The transition that produced a configuration. Diagnostic only; the engine never
/// branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    Initial,
    Expansion,
    Match,
    Acceptance,
    Mismatch,
    Retreat,
    NextAlternative,
    Reject,
    Escalate,
}

impl Transition {
    /// Rule number as printed in the trace table.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Initial => "null",
            Self::Expansion => "1",
            Self::Match => "2",
            Self::Acceptance => "3",
            Self::Mismatch => "4",
            Self::Retreat => "5",
            Self::NextAlternative => "6a",
            Self::Reject => "6b",
            Self::Escalate => "6c",
        }
    }
}

/// Immutable snapshot of the parser.
///
/// - `matched` holds committed symbols; its top is the most recently committed one.
/// - `pending` holds the symbols still to process; its top is the next one.
/// - `alternatives` holds, for each non-terminal in `matched` and in the same order,
///   the index of the alternative currently being tried.
///
/// All three are [`Stack`]s, so successive configurations share structure and
/// cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) mode: Mode,
    pub(crate) cursor: usize,
    pub(crate) matched: Stack<Symbol>,
    pub(crate) pending: Stack<Symbol>,
    pub(crate) alternatives: Stack<usize>,
    pub(crate) transition: Transition,
    pub(crate) exhausted: bool,
}

impl Configuration {
    /// `matched = []`, `pending = [start, End]`, cursor at the first token.
    #[must_use]
    pub fn initial(start: NonTerminalId) -> Self {
        Self {
            mode: Mode::Matching,
            cursor: 0,
            matched: Stack::new(),
            pending: Stack::new()
                .push(Symbol::End)
                .push(Symbol::NonTerminal(start)),
            alternatives: Stack::new(),
            transition: Transition::Initial,
            exhausted: false,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the next token to match.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub const fn matched(&self) -> &Stack<Symbol> {
        &self.matched
    }

    #[must_use]
    pub const fn pending(&self) -> &Stack<Symbol> {
        &self.pending
    }

    #[must_use]
    pub const fn alternatives(&self) -> &Stack<usize> {
        &self.alternatives
    }

    #[must_use]
    pub const fn transition(&self) -> Transition {
        self.transition
    }

    /// Set while backtracking escalates past non-terminals with no alternatives left.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.mode.is_final()
    }

    /// Committed symbols, oldest first.
    #[must_use]
    pub fn matched_symbols(&self) -> Vec<Symbol> {
        self.matched.to_vec_bottom_up()
    }

    /// Pending symbols, next first.
    #[must_use]
    pub fn pending_symbols(&self) -> Vec<Symbol> {
        self.pending.iter().copied().collect()
    }

    /// Alternative indices of the open non-terminals, oldest first.
    #[must_use]
    pub fn alternative_history(&self) -> Vec<usize> {
        self.alternatives.to_vec_bottom_up()
    }

    /// Terminal names in `matched`, oldest first.
    #[must_use]
    pub fn matched_terminals<'g>(&self, grammar: &'g Grammar) -> Vec<&'g str> {
        self.matched_symbols()
            .into_iter()
            .filter(|symbol| symbol.is_terminal())
            .map(|symbol| grammar.name(symbol))
            .collect()
    }
}
