//! # Sentence Generators
//!
//! Random sentences derivable from a grammar, for property-based testing with
//! `proptest` and for benchmarks.
//!
//! ## Usage
//!
//! ```rust
//! use retro::grammar::GrammarBuilder;
//! use retro::parser::Parser;
//! use retro::testing::{GeneratorConfig, SentenceGenerator};
//!
//! let grammar = GrammarBuilder::new()
//!     .entry_point("S")
//!     .rule("S", vec![vec!["a", "S"], vec!["b"]])
//!     .build()?;
//!
//! let generator = SentenceGenerator::new(&grammar, GeneratorConfig::default());
//! for sentence in generator.generate_many(10) {
//!     assert!(Parser::new(&grammar).parse(sentence)?.accepted);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::grammar::{Grammar, NonTerminalId, Symbol, TerminalId};
use compact_str::CompactString;
use hashbrown::HashMap;

/// Candidate tokens tried for pattern terminals that have no explicit sample.
const FALLBACK_SAMPLES: &[&str] = &[
    "a", "x", "id", "abc", "a1", "a_b", "A", "Word", "0", "1", "42", "0.5", "3.14", "_",
];

/// Configuration for sentence generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Expansion depth after which only the shortest derivations are chosen
    pub max_depth: usize,
    /// Seed for reproducible generation
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            seed: None,
        }
    }
}

/// Generates token sequences that derive from a grammar's entry point.
///
/// Literal terminals produce their own text. Pattern terminals produce a sample
/// registered with [`with_sample`](Self::with_sample), or else the first built-in
/// candidate the pattern accepts.
pub struct SentenceGenerator<'g> {
    grammar: &'g Grammar,
    config: GeneratorConfig,
    samples: HashMap<TerminalId, Vec<CompactString>, ahash::RandomState>,
    /// Height of the shortest derivation tree per rule; `None` for rules that
    /// derive no sentence at all.
    heights: Vec<Option<usize>>,
}

impl<'g> SentenceGenerator<'g> {
    #[must_use]
    pub fn new(grammar: &'g Grammar, config: GeneratorConfig) -> Self {
        Self {
            grammar,
            config,
            samples: HashMap::with_hasher(ahash::RandomState::new()),
            heights: derivation_heights(grammar),
        }
    }

    /// Register a token to produce for the terminal named `terminal`.
    #[must_use]
    pub fn with_sample(mut self, terminal: &str, token: impl Into<CompactString>) -> Self {
        if let Some(Symbol::Terminal(id)) = self.grammar.symbol(terminal) {
            self.samples.entry(id).or_default().push(token.into());
        }
        self
    }

    /// One sentence from the entry point, or `None` if the entry point derives no
    /// sentence or a pattern terminal has no usable sample.
    #[must_use]
    pub fn generate(&self) -> Option<Vec<CompactString>> {
        let mut rng = self.rng();
        self.generate_from(self.grammar.entry_point(), &mut rng)
    }

    /// `count` sentences from one random sequence. Sentences that cannot be
    /// generated are left out.
    #[must_use]
    pub fn generate_many(&self, count: usize) -> Vec<Vec<CompactString>> {
        let mut rng = self.rng();
        (0..count)
            .filter_map(|_| self.generate_from(self.grammar.entry_point(), &mut rng))
            .collect()
    }

    fn rng(&self) -> SimpleRng {
        self.config
            .seed
            .map_or_else(SimpleRng::new, SimpleRng::with_seed)
    }

    fn generate_from(
        &self,
        start: NonTerminalId,
        rng: &mut SimpleRng,
    ) -> Option<Vec<CompactString>> {
        let mut tokens = Vec::new();
        self.expand(start, 0, rng, &mut tokens)?;
        Some(tokens)
    }

    fn expand(
        &self,
        id: NonTerminalId,
        depth: usize,
        rng: &mut SimpleRng,
        tokens: &mut Vec<CompactString>,
    ) -> Option<()> {
        let alternatives = self.grammar.alternatives_of(id);
        let heights: Vec<Option<usize>> = alternatives
            .iter()
            .map(|alternative| alternative_height(alternative, &self.heights))
            .collect();

        let candidates: Vec<usize> = if depth >= self.config.max_depth {
            let shortest = heights.iter().flatten().min()?;
            (0..alternatives.len())
                .filter(|index| heights[*index] == Some(*shortest))
                .collect()
        } else {
            (0..alternatives.len())
                .filter(|index| heights[*index].is_some())
                .collect()
        };
        if candidates.is_empty() {
            return None;
        }
        let choice = candidates[rng.below(candidates.len())];

        for symbol in &alternatives[choice] {
            match *symbol {
                Symbol::NonTerminal(inner) => self.expand(inner, depth + 1, rng, tokens)?,
                Symbol::Terminal(terminal) => tokens.push(self.sample(terminal, rng)?),
                Symbol::End => {}
            }
        }
        Some(())
    }

    fn sample(&self, id: TerminalId, rng: &mut SimpleRng) -> Option<CompactString> {
        if let Some(samples) = self.samples.get(&id).filter(|s| !s.is_empty()) {
            return Some(samples[rng.below(samples.len())].clone());
        }
        let terminal = self.grammar.terminal(id);
        if !terminal.is_pattern() {
            return Some(terminal.text().into());
        }
        FALLBACK_SAMPLES
            .iter()
            .find(|candidate| terminal.matches(candidate))
            .map(|candidate| CompactString::from(*candidate))
    }
}

/// Height of the shortest derivation tree of each rule, by fixpoint iteration.
fn derivation_heights(grammar: &Grammar) -> Vec<Option<usize>> {
    let mut heights: Vec<Option<usize>> = vec![None; grammar.rule_count()];
    let mut changed = true;
    while changed {
        changed = false;
        for (id, _) in grammar.non_terminals() {
            let best = grammar
                .alternatives_of(id)
                .iter()
                .filter_map(|alternative| alternative_height(alternative, &heights))
                .min();
            if best.is_some() && (heights[id.index()].is_none() || best < heights[id.index()]) {
                heights[id.index()] = best;
                changed = true;
            }
        }
    }
    heights
}

fn alternative_height(alternative: &[Symbol], heights: &[Option<usize>]) -> Option<usize> {
    alternative
        .iter()
        .try_fold(0, |height, symbol| match symbol {
            Symbol::NonTerminal(id) => heights[id.index()].map(|inner| height.max(inner)),
            Symbol::Terminal(_) | Symbol::End => Some(height),
        })
        .map(|height| height + 1)
}

/// Simple RNG for deterministic testing
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: 0x853c_49e6_748f_ea9b,
        }
    }

    /// A zero seed would lock XorShift at zero, so it falls back to the default.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        if seed == 0 {
            Self::new()
        } else {
            Self { state: seed }
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        // XorShift algorithm
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform-ish index below `bound`, which must be non-zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new()
    }
}
