use crate::error::{ParseError, ParseMetrics, ParseOutcome};
use crate::grammar::{Grammar, NonTerminalId};
use crate::parser::{step, Configuration, ParserConfig, TokenStream, Trace};
use compact_str::CompactString;
use std::time::Instant;

/// Runs the transition function from an initial configuration to `Success` or
/// `Fail`, recording every configuration on the way.
///
/// A parser only borrows its grammar, so one grammar can serve many parsers, on
/// many threads, at once.
///
/// # Example
///
/// ```rust
/// use retro::grammar::GrammarBuilder;
/// use retro::parser::Parser;
///
/// let grammar = GrammarBuilder::new()
///     .entry_point("S")
///     .rule("S", vec![vec!["a", "S"], vec!["b"]])
///     .build()?;
///
/// let outcome = Parser::new(&grammar).parse(["a", "a", "b"])?;
/// assert!(outcome.accepted);
/// assert_eq!(outcome.trace.last().alternative_history(), vec![0, 0, 1]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    config: ParserConfig,
}

impl<'g> Parser<'g> {
    #[must_use]
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_config(grammar, ParserConfig::default())
    }

    #[must_use]
    pub const fn with_config(grammar: &'g Grammar, config: ParserConfig) -> Self {
        Self { grammar, config }
    }

    #[must_use]
    pub const fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `tokens` from the grammar's entry point. The grammar's end marker is
    /// appended to the tokens unless they already end with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the run exceeds its budget or hits a corrupt
    /// configuration. Rejection is not an error; see [`ParseOutcome::accepted`].
    pub fn parse<I, S>(&self, tokens: I) -> Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let stream = TokenStream::new(tokens, self.grammar.end_marker());
        self.parse_stream(&stream, self.grammar.entry_point())
    }

    /// Parse `tokens` from the named non-terminal.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownSymbol`] if `start` is not a rule of the grammar,
    /// and otherwise the same errors as [`parse`](Self::parse).
    pub fn parse_from<I, S>(&self, tokens: I, start: &str) -> Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let start = self
            .grammar
            .non_terminal(start)
            .ok_or_else(|| ParseError::UnknownSymbol(start.into()))?;
        let stream = TokenStream::new(tokens, self.grammar.end_marker());
        self.parse_stream(&stream, start)
    }

    /// Parse a prepared stream.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse).
    pub fn parse_stream(
        &self,
        stream: &TokenStream,
        start: NonTerminalId,
    ) -> Result<ParseOutcome, ParseError> {
        let started = Instant::now();
        let mut metrics = ParseMetrics::default();
        let mut current = Configuration::initial(start);
        let mut trace = Trace::new(current.clone());

        while !current.is_final() {
            if let Some(limit) = self.config.max_steps {
                if metrics.steps >= limit {
                    return Err(ParseError::StepLimitExceeded {
                        limit,
                        trace: Box::new(trace),
                    });
                }
            }
            if let Some(limit) = self.config.time_limit {
                if started.elapsed() > limit {
                    return Err(ParseError::TimeLimitExceeded {
                        limit,
                        steps: metrics.steps,
                        trace: Box::new(trace),
                    });
                }
            }

            let next = step(&current, self.grammar, stream)?;
            metrics.record(next.transition(), next.matched().len());
            trace.push(next.clone());
            current = next;
        }

        metrics.parse_time = started.elapsed();
        Ok(ParseOutcome {
            accepted: trace.accepted(),
            trace,
            metrics,
        })
    }
}
