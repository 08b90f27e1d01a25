use compact_str::CompactString;
use regex::Regex;

/// Index of a non-terminal within its [`Grammar`](super::Grammar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminalId(pub(crate) u32);

impl NonTerminalId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a terminal within its [`Grammar`](super::Grammar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalId(pub(crate) u32);

impl TerminalId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A grammar symbol as it appears on the parser stacks.
///
/// Symbols are small `Copy` handles; their names live in the grammar and are
/// resolved with [`Grammar::name`](super::Grammar::name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    NonTerminal(NonTerminalId),
    Terminal(TerminalId),
    /// The sentinel placed below the start symbol. It is never matched against a
    /// token; it only takes part in acceptance.
    End,
}

impl Symbol {
    #[must_use]
    pub const fn is_non_terminal(self) -> bool {
        matches!(self, Self::NonTerminal(_))
    }

    /// Terminals and the end sentinel.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_non_terminal()
    }

    #[must_use]
    pub const fn as_non_terminal(self) -> Option<NonTerminalId> {
        match self {
            Self::NonTerminal(id) => Some(id),
            _ => None,
        }
    }
}

/// How a terminal is compared against the current token.
#[derive(Debug, Clone)]
pub enum Terminal {
    /// Exact string equality.
    Literal(CompactString),
    /// Full match of a regular expression.
    Pattern(Pattern),
}

impl Terminal {
    #[must_use]
    pub fn literal(text: impl Into<CompactString>) -> Self {
        Self::Literal(text.into())
    }

    /// Compile `source` as a pattern terminal.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `source` is not a valid regular expression.
    pub fn pattern(source: impl Into<CompactString>) -> Result<Self, regex::Error> {
        Pattern::new(source).map(Self::Pattern)
    }

    /// The text the terminal was declared with.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Literal(text) => text,
            Self::Pattern(pattern) => pattern.source(),
        }
    }

    #[must_use]
    pub const fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }

    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Self::Literal(text) => text.as_str() == token,
            Self::Pattern(pattern) => pattern.matches(token),
        }
    }
}

/// A regular expression terminal. Matching is anchored at both ends, so the
/// whole token has to match.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: CompactString,
    regex: Regex,
}

impl Pattern {
    /// # Errors
    ///
    /// Returns the regex error if `source` does not compile.
    pub fn new(source: impl Into<CompactString>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self { source, regex })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }
}

/// Whether `text` would be read as a pattern by structural inspection: it compiles as
/// a regular expression and contains at least one metacharacter.
pub(crate) fn looks_like_pattern(text: &str) -> bool {
    // `regex::escape` also escapes `-`, `#`, `&` and `~`, which mean nothing outside a class
    const META: &[char] = &[
        '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$', '\\',
    ];
    text.contains(META) && Regex::new(text).is_ok()
}
