use crate::error::LexerError;
use compact_str::CompactString;
use regex::Regex;

/// Token patterns of the demo language, tried in order. Malformed numbers come
/// first so they stay single tokens instead of splitting into valid pieces.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"\d+\.[a-zA-Z_][a-zA-Z0-9_]*",
    r"\d+[a-zA-Z_][a-zA-Z0-9_]*",
    r"\d+(\.\d+){2,}",
    r"\d+\.\d+",
    r"\d+\.",
    r"[a-zA-Z_][a-zA-Z0-9_]*",
    r"\d+",
    r#"(["])"#,
    r"([,.;:(){}\[\]\+\-\*/=<>!?#%&|@^~])",
    r"(\s)",
];

/// Regex splitter producing the token strings the parser consumes.
///
/// The patterns are combined into one alternation and applied to each line;
/// at every position the first pattern that matches wins. Whitespace and empty
/// matches are dropped, and characters no pattern covers are skipped (see
/// [`Tokenizer::unmatched`] to report them).
///
/// # Example
///
/// ```rust
/// use retro::lexer::Tokenizer;
///
/// let tokenizer = Tokenizer::standard()?;
/// assert_eq!(
///     tokenizer.tokenize_flat("x = 3.14;"),
///     vec!["x", "=", "3.14", ";"]
/// );
/// # Ok::<(), retro::error::LexerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer {
    patterns: Vec<CompactString>,
    regex: Regex,
}

impl Tokenizer {
    /// # Errors
    ///
    /// Returns [`LexerError::NoPatterns`] for an empty list and
    /// [`LexerError::InvalidPattern`] for the first pattern that does not compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, LexerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let patterns: Vec<CompactString> = patterns.into_iter().map(Into::into).collect();
        if patterns.is_empty() {
            return Err(LexerError::NoPatterns);
        }
        for pattern in &patterns {
            Regex::new(pattern).map_err(|error| LexerError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: error.to_string(),
            })?;
        }
        let combined = patterns
            .iter()
            .map(|pattern| format!("(?:{pattern})"))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&combined).map_err(|error| LexerError::InvalidPattern {
            pattern: combined.clone(),
            reason: error.to_string(),
        })?;
        Ok(Self { patterns, regex })
    }

    /// Tokenizer for the demo language, built from [`DEFAULT_PATTERNS`].
    ///
    /// # Errors
    ///
    /// Never fails in practice; the constructor result is passed through unchanged.
    pub fn standard() -> Result<Self, LexerError> {
        Self::new(DEFAULT_PATTERNS.iter().copied())
    }

    #[must_use]
    pub fn patterns(&self) -> &[CompactString] {
        &self.patterns
    }

    /// Tokens of each line of `source`.
    #[must_use]
    pub fn tokenize(&self, source: &str) -> Vec<Vec<CompactString>> {
        source.lines().map(|line| self.tokenize_line(line)).collect()
    }

    /// All tokens of `source`, in order.
    #[must_use]
    pub fn tokenize_flat(&self, source: &str) -> Vec<CompactString> {
        source.lines().flat_map(|line| self.tokenize_line(line)).collect()
    }

    fn tokenize_line(&self, line: &str) -> Vec<CompactString> {
        self.regex
            .find_iter(line)
            .map(|found| found.as_str())
            .filter(|text| !text.is_empty() && !text.chars().all(char::is_whitespace))
            .map(CompactString::from)
            .collect()
    }

    /// Non-whitespace characters that no pattern covers, with 1-based positions.
    #[must_use]
    pub fn unmatched(&self, source: &str) -> Vec<LexerError> {
        let mut errors = Vec::new();
        for (line_index, line) in source.lines().enumerate() {
            let mut covered_until = 0;
            let mut gaps = Vec::new();
            for found in self.regex.find_iter(line) {
                gaps.push(covered_until..found.start());
                covered_until = covered_until.max(found.end());
            }
            gaps.push(covered_until..line.len());

            for gap in gaps {
                for (offset, ch) in line[gap.clone()].char_indices() {
                    if ch.is_whitespace() {
                        continue;
                    }
                    errors.push(LexerError::UnexpectedChar {
                        ch,
                        line: line_index + 1,
                        column: line[..gap.start + offset].chars().count() + 1,
                    });
                }
            }
        }
        errors
    }
}
