use std::time::Duration;

/// Budget for a single parser run.
///
/// Backtracking is unbounded and exponential in the worst case, and a
/// left-recursive grammar never terminates, so every run is checked against a
/// step budget and an optional wall-clock budget.
///
/// # Example
///
/// ```rust
/// use retro::parser::ParserConfig;
/// use std::time::Duration;
///
/// let config = ParserConfig {
///     max_steps: Some(10_000),
///     time_limit: Some(Duration::from_millis(50)),
/// };
/// assert_ne!(config, ParserConfig::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum number of transitions before the run is abandoned.
    pub max_steps: Option<usize>,

    /// Maximum wall-clock time before the run is abandoned.
    pub time_limit: Option<Duration>,
}

impl ParserConfig {
    /// No budget at all. Only safe for grammars without left recursion.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_steps: None,
            time_limit: None,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_steps: Some(1_000_000),
            time_limit: None,
        }
    }
}
