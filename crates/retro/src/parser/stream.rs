use compact_str::CompactString;

/// Tokens handed to the parser, always terminated by exactly one end-marker token.
///
/// The marker is appended unless the last token already equals it. An input whose
/// final real token happens to be spelled like the marker is therefore read as
/// already terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<CompactString>,
}

#[allow(clippy::len_without_is_empty)]
impl TokenStream {
    pub fn new<I, S>(tokens: I, end_marker: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let mut tokens: Vec<CompactString> = tokens.into_iter().map(Into::into).collect();
        if tokens.last().map(CompactString::as_str) != Some(end_marker) {
            tokens.push(CompactString::from(end_marker));
        }
        Self { tokens }
    }

    /// Token at `index`, the end marker included.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(CompactString::as_str)
    }

    /// Number of tokens, the end marker included. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Number of tokens before the end marker.
    #[must_use]
    pub fn input_len(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    #[must_use]
    pub fn tokens(&self) -> &[CompactString] {
        &self.tokens
    }

    /// Tokens before the end marker.
    #[must_use]
    pub fn input(&self) -> &[CompactString] {
        &self.tokens[..self.input_len()]
    }

    #[must_use]
    pub fn end_marker(&self) -> &str {
        self.tokens.last().map_or("", CompactString::as_str)
    }
}
