use crate::error::{GrammarError, GrammarWarning};
use crate::grammar::symbol::looks_like_pattern;
use crate::grammar::{
    validate_grammar, GrammarValidationOptions, NonTerminalId, Symbol, Terminal, TerminalId,
};
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use lasso::{Rodeo, RodeoReader, Spur};
use smallvec::SmallVec;

/// Default end-marker text, the sentinel that terminates every token stream.
pub const DEFAULT_END_MARKER: &str = "#";

/// One candidate right-hand side of a rule.
pub type Alternative = SmallVec<[Symbol; 4]>;

/// Context-free grammar with ordered alternatives.
///
/// A symbol is a non-terminal iff it is the left-hand side of a rule; every other
/// symbol is a terminal. Terminals are tagged as literals or patterns when the
/// grammar is built and never reclassified afterwards.
///
/// A `Grammar` is immutable. It can be shared between any number of concurrent
/// parses; editing goes through [`Grammar::to_builder`], which produces a new grammar.
///
/// # Example
///
/// ```rust
/// use retro::grammar::GrammarBuilder;
///
/// let grammar = GrammarBuilder::new()
///     .entry_point("S")
///     .rule("S", vec![vec!["a", "S"], vec!["b"]])
///     .build()
///     .expect("Failed to build grammar");
///
/// assert!(grammar.is_non_terminal("S"));
/// assert!(grammar.is_terminal("a"));
/// assert_eq!(grammar.alternatives("S").unwrap().len(), 2);
/// ```
pub struct Grammar {
    rules: Vec<Rule>,
    terminals: Vec<Terminal>,
    /// Interned symbol names. Rule names and terminal texts share one namespace,
    /// which is what makes "is a rule key" the terminal/non-terminal test.
    interner: RodeoReader,
    symbols: HashMap<Spur, Symbol, ahash::RandomState>,
    entry_point: NonTerminalId,
    end_marker: CompactString,
    validation_options: GrammarValidationOptions,
    warnings: Vec<GrammarWarning>,
}

/// Production rule: a non-terminal and its alternatives in declaration order.
#[derive(Debug, Clone)]
pub struct Rule {
    name: Spur,
    alternatives: Vec<Alternative>,
}

impl Rule {
    #[must_use]
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }
}

impl Grammar {
    /// Start symbol used by [`Parser::parse`](crate::parser::Parser::parse).
    #[must_use]
    pub const fn entry_point(&self) -> NonTerminalId {
        self.entry_point
    }

    #[must_use]
    pub fn entry_point_name(&self) -> &str {
        self.rule_name(self.entry_point)
    }

    #[must_use]
    pub fn end_marker(&self) -> &str {
        &self.end_marker
    }

    /// Alternatives of the named non-terminal, in the order they are tried.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownSymbol`] if `name` is not a rule of this grammar.
    pub fn alternatives(&self, name: &str) -> Result<&[Alternative], GrammarError> {
        self.non_terminal(name)
            .map(|id| self.alternatives_of(id))
            .ok_or_else(|| GrammarError::UnknownSymbol(name.into()))
    }

    #[must_use]
    pub fn alternatives_of(&self, id: NonTerminalId) -> &[Alternative] {
        &self.rules[id.index()].alternatives
    }

    #[must_use]
    pub fn rule(&self, id: NonTerminalId) -> &Rule {
        &self.rules[id.index()]
    }

    #[must_use]
    pub fn rule_name(&self, id: NonTerminalId) -> &str {
        self.interner.resolve(&self.rules[id.index()].name)
    }

    /// All non-terminals in declaration order.
    pub fn non_terminals(&self) -> impl Iterator<Item = (NonTerminalId, &str)> + '_ {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| (NonTerminalId(to_id(index)), self.interner.resolve(&rule.name)))
    }

    /// All terminals in order of first appearance.
    pub fn terminals(&self) -> impl Iterator<Item = (TerminalId, &Terminal)> + '_ {
        self.terminals
            .iter()
            .enumerate()
            .map(|(index, terminal)| (TerminalId(to_id(index)), terminal))
    }

    #[must_use]
    pub fn terminal(&self, id: TerminalId) -> &Terminal {
        &self.terminals[id.index()]
    }

    /// Resolve a name used in this grammar to its symbol.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<Symbol> {
        self.interner
            .get(name)
            .and_then(|key| self.symbols.get(&key).copied())
    }

    #[must_use]
    pub fn non_terminal(&self, name: &str) -> Option<NonTerminalId> {
        self.symbol(name).and_then(Symbol::as_non_terminal)
    }

    #[must_use]
    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.non_terminal(name).is_some()
    }

    /// Every name that is not a rule key is a terminal, including names the grammar
    /// never mentions.
    #[must_use]
    pub fn is_terminal(&self, name: &str) -> bool {
        !self.is_non_terminal(name)
    }

    /// Whether `terminal` accepts `token`.
    ///
    /// Terminals declared in this grammar use their tagged kind. Any other text is
    /// compared literally.
    #[must_use]
    pub fn matches(&self, terminal: &str, token: &str) -> bool {
        match self.symbol(terminal) {
            Some(Symbol::Terminal(id)) => self.terminal(id).matches(token),
            Some(Symbol::NonTerminal(_)) => false,
            Some(Symbol::End) | None => terminal == token,
        }
    }

    /// Display name of a symbol.
    #[must_use]
    pub fn name(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::NonTerminal(id) => self.rule_name(id),
            Symbol::Terminal(id) => self.terminal(id).text(),
            Symbol::End => &self.end_marker,
        }
    }

    #[must_use]
    pub const fn validation_options(&self) -> GrammarValidationOptions {
        self.validation_options
    }

    #[must_use]
    pub fn warnings(&self) -> &[GrammarWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// An editable copy of this grammar. Terminal classifications are preserved.
    #[must_use]
    pub fn to_builder(&self) -> GrammarBuilder {
        let mut builder = GrammarBuilder::new()
            .entry_point(self.entry_point_name())
            .end_marker(self.end_marker.clone());
        builder.validation_options = self.validation_options;
        for (_, terminal) in self.terminals() {
            builder = match terminal {
                Terminal::Pattern(pattern) => builder.pattern(pattern.source()),
                Terminal::Literal(text) => builder.literal(text.clone()),
            };
        }
        for (id, name) in self.non_terminals() {
            let alternatives = self
                .alternatives_of(id)
                .iter()
                .map(|alternative| {
                    alternative
                        .iter()
                        .map(|symbol| CompactString::from(self.name(*symbol)))
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();
            builder = builder.rule(name, alternatives);
        }
        builder
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (id, name) in self.non_terminals() {
            let alternatives: Vec<Vec<&str>> = self
                .alternatives_of(id)
                .iter()
                .map(|alternative| alternative.iter().map(|s| self.name(*s)).collect())
                .collect();
            map.entry(&name, &alternatives);
        }
        map.finish()
    }
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, name) in self.non_terminals() {
            write!(f, "{name} ->")?;
            for (index, alternative) in self.alternatives_of(id).iter().enumerate() {
                if index > 0 {
                    write!(f, " |")?;
                }
                if alternative.is_empty() {
                    write!(f, " ε")?;
                }
                for symbol in alternative {
                    write!(f, " {}", self.name(*symbol))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// How untagged terminal texts are classified when a grammar is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum TerminalPolicy {
    /// Untagged terminals are literals. Patterns must be declared with
    /// [`GrammarBuilder::pattern`].
    #[default]
    Literal,
    /// Untagged terminals that compile as a regular expression are patterns. Each one
    /// that contains regex metacharacters is reported as
    /// [`GrammarWarning::AmbiguousTerminal`].
    Inferred,
}

#[derive(Debug, Clone)]
struct RuleSpec {
    name: CompactString,
    alternatives: Vec<Vec<CompactString>>,
}

/// Builder for [`Grammar`].
///
/// Fluent methods accumulate rules; [`add_rule`](Self::add_rule),
/// [`replace_rule`](Self::replace_rule) and [`remove_rule`](Self::remove_rule) are the
/// administrative edits and report conflicts immediately. All validation of the
/// finished grammar happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    rules: Vec<RuleSpec>,
    entry_point: Option<CompactString>,
    patterns: Vec<CompactString>,
    literals: Vec<CompactString>,
    policy: TerminalPolicy,
    end_marker: CompactString,
    validation_options: GrammarValidationOptions,
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            entry_point: None,
            patterns: Vec::new(),
            literals: Vec::new(),
            policy: TerminalPolicy::default(),
            end_marker: CompactString::from(DEFAULT_END_MARKER),
            validation_options: GrammarValidationOptions::default(),
        }
    }

    #[must_use]
    pub fn entry_point(mut self, name: impl Into<CompactString>) -> Self {
        self.entry_point = Some(name.into());
        self
    }

    /// Append `alternatives` to the rule for `lhs`, creating it if needed.
    #[must_use]
    pub fn rule<I, A, S>(mut self, lhs: impl Into<CompactString>, alternatives: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let lhs = lhs.into();
        let alternatives = collect_alternatives(alternatives);
        match self.rules.iter_mut().find(|rule| rule.name == lhs) {
            Some(rule) => rule.alternatives.extend(alternatives),
            None => self.rules.push(RuleSpec {
                name: lhs,
                alternatives,
            }),
        }
        self
    }

    /// Append a single alternative to the rule for `lhs`.
    #[must_use]
    pub fn alternative<A, S>(self, lhs: impl Into<CompactString>, symbols: A) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.rule(lhs, std::iter::once(symbols))
    }

    /// Tag a terminal text as a regular expression.
    #[must_use]
    pub fn pattern(mut self, text: impl Into<CompactString>) -> Self {
        self.patterns.push(text.into());
        self
    }

    /// Tag a terminal text as a literal, whatever the [`TerminalPolicy`].
    #[must_use]
    pub fn literal(mut self, text: impl Into<CompactString>) -> Self {
        self.literals.push(text.into());
        self
    }

    #[must_use]
    pub const fn terminal_policy(mut self, policy: TerminalPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn end_marker(mut self, marker: impl Into<CompactString>) -> Self {
        self.end_marker = marker.into();
        self
    }

    /// Accept left-recursive rules. They are reported as warnings instead of errors,
    /// and a parse that enters the cycle is only stopped by the step or time budget.
    #[must_use]
    pub const fn allow_left_recursion(mut self) -> Self {
        self.validation_options.allow_left_recursion = true;
        self
    }

    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.name == name)
    }

    /// Add a new rule.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::DuplicateRule`] if `lhs` already has a rule.
    pub fn add_rule<I, A, S>(
        &mut self,
        lhs: impl Into<CompactString>,
        alternatives: I,
    ) -> Result<&mut Self, GrammarError>
    where
        I: IntoIterator<Item = A>,
        A: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let lhs = lhs.into();
        if self.has_rule(&lhs) {
            return Err(GrammarError::DuplicateRule(lhs));
        }
        self.rules.push(RuleSpec {
            name: lhs,
            alternatives: collect_alternatives(alternatives),
        });
        Ok(self)
    }

    /// Replace every alternative of an existing rule.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownSymbol`] if `lhs` has no rule.
    pub fn replace_rule<I, A, S>(
        &mut self,
        lhs: impl Into<CompactString>,
        alternatives: I,
    ) -> Result<&mut Self, GrammarError>
    where
        I: IntoIterator<Item = A>,
        A: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let lhs = lhs.into();
        let rule = self
            .rules
            .iter_mut()
            .find(|rule| rule.name == lhs)
            .ok_or(GrammarError::UnknownSymbol(lhs))?;
        rule.alternatives = collect_alternatives(alternatives);
        Ok(self)
    }

    /// Remove a rule. Its name becomes a terminal wherever it is still referenced.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownSymbol`] if `lhs` has no rule.
    pub fn remove_rule(&mut self, lhs: &str) -> Result<&mut Self, GrammarError> {
        let index = self
            .rules
            .iter()
            .position(|rule| rule.name == lhs)
            .ok_or_else(|| GrammarError::UnknownSymbol(lhs.into()))?;
        self.rules.remove(index);
        Ok(self)
    }

    /// Build and validate the grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry point is missing or unknown, a rule has no
    /// alternatives, a declared pattern is invalid, names a rule or is also tagged as a
    /// literal, or the grammar is left recursive and
    /// [`allow_left_recursion`](Self::allow_left_recursion) was not set.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let entry_name = self
            .entry_point
            .clone()
            .ok_or(GrammarError::MissingEntryPoint)?;

        let mut interner = Rodeo::default();
        let mut symbols: HashMap<Spur, Symbol, ahash::RandomState> =
            HashMap::with_hasher(ahash::RandomState::new());
        let mut names = Vec::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.alternatives.is_empty() {
                return Err(GrammarError::EmptyRule(rule.name.clone()));
            }
            let key = interner.get_or_intern(rule.name.as_str());
            symbols.insert(key, Symbol::NonTerminal(NonTerminalId(to_id(index))));
            names.push(key);
        }

        let entry_point = interner
            .get(entry_name.as_str())
            .and_then(|key| symbols.get(&key))
            .and_then(|symbol| symbol.as_non_terminal())
            .ok_or(GrammarError::UnknownSymbol(entry_name))?;

        let patterns: HashSet<&str, ahash::RandomState> =
            self.patterns.iter().map(CompactString::as_str).collect();
        let literals: HashSet<&str, ahash::RandomState> =
            self.literals.iter().map(CompactString::as_str).collect();
        if let Some(shadowing) = self.patterns.iter().find(|p| self.has_rule(p)) {
            return Err(GrammarError::PatternShadowsRule(shadowing.clone()));
        }
        if let Some(conflict) = self.patterns.iter().find(|p| literals.contains(p.as_str())) {
            return Err(GrammarError::ConflictingTerminalTag(conflict.clone()));
        }
        // Declared patterns are compiled even when no rule uses them.
        for pattern in &self.patterns {
            compile_pattern(pattern)?;
        }

        let mut terminals = Vec::new();
        let mut warnings = Vec::new();
        let mut rules = Vec::with_capacity(self.rules.len());
        for (spec, name) in self.rules.iter().zip(names) {
            let mut alternatives = Vec::with_capacity(spec.alternatives.len());
            for texts in &spec.alternatives {
                let mut alternative = Alternative::new();
                for text in texts {
                    let key = interner.get_or_intern(text.as_str());
                    let symbol = if let Some(symbol) = symbols.get(&key) {
                        *symbol
                    } else {
                        let terminal =
                            self.classify(text, &patterns, &literals, &mut warnings)?;
                        let symbol = Symbol::Terminal(TerminalId(to_id(terminals.len())));
                        terminals.push(terminal);
                        symbols.insert(key, symbol);
                        symbol
                    };
                    alternative.push(symbol);
                }
                alternatives.push(alternative);
            }
            rules.push(Rule { name, alternatives });
        }

        let mut grammar = Grammar {
            rules,
            terminals,
            interner: interner.into_reader(),
            symbols,
            entry_point,
            end_marker: self.end_marker,
            validation_options: self.validation_options,
            warnings,
        };
        let validation_warnings = validate_grammar(&grammar, self.validation_options)?;
        grammar.warnings.extend(validation_warnings);
        Ok(grammar)
    }

    fn classify(
        &self,
        text: &CompactString,
        patterns: &HashSet<&str, ahash::RandomState>,
        literals: &HashSet<&str, ahash::RandomState>,
        warnings: &mut Vec<GrammarWarning>,
    ) -> Result<Terminal, GrammarError> {
        if patterns.contains(text.as_str()) {
            return compile_pattern(text);
        }
        if literals.contains(text.as_str()) {
            return Ok(Terminal::literal(text.clone()));
        }
        match self.policy {
            TerminalPolicy::Literal => Ok(Terminal::literal(text.clone())),
            // Plain words compile to a regex that only matches themselves, so only
            // texts with metacharacters change meaning under inference.
            TerminalPolicy::Inferred if looks_like_pattern(text) => {
                warnings.push(GrammarWarning::AmbiguousTerminal(text.clone()));
                compile_pattern(text)
            }
            TerminalPolicy::Inferred => Ok(Terminal::literal(text.clone())),
        }
    }
}

fn compile_pattern(text: &CompactString) -> Result<Terminal, GrammarError> {
    Terminal::pattern(text.clone()).map_err(|error| GrammarError::InvalidPattern {
        pattern: text.clone(),
        reason: error.to_string(),
    })
}

fn collect_alternatives<I, A, S>(alternatives: I) -> Vec<Vec<CompactString>>
where
    I: IntoIterator<Item = A>,
    A: IntoIterator<Item = S>,
    S: Into<CompactString>,
{
    alternatives
        .into_iter()
        .map(|alternative| alternative.into_iter().map(Into::into).collect())
        .collect()
}

// Symbol counts are extremely unlikely to exceed u32::MAX
#[allow(clippy::cast_possible_truncation)]
const fn to_id(index: usize) -> u32 {
    index as u32
}
