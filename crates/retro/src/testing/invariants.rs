//! # Trace Invariants
//!
//! Structural checks over a complete parser trace, shared by the unit tests,
//! the property tests and the fuzz target.

use crate::grammar::{Grammar, Symbol};
use crate::parser::{step, Configuration, Mode, TokenStream, Trace, Transition};
use thiserror::Error;

/// A trace property that does not hold at configuration `index`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("configuration {index}: {message}")]
pub struct InvariantViolation {
    pub index: usize,
    pub message: String,
}

/// Check every configuration of `trace` against the parser invariants:
///
/// - the trace starts from an initial configuration;
/// - every later configuration is exactly what [`step`] makes of its predecessor;
/// - only the last configuration may be final;
/// - each transition is one that can produce the configuration's mode;
/// - there is one alternative-history entry per non-terminal in `matched`;
/// - the cursor equals the number of terminals in `matched`, and those terminals
///   match the tokens before the cursor, in order;
/// - `exhausted` is only set while escalating, retreating after an escalation, or
///   on rejection;
/// - an accepted run has consumed every token before the end marker.
///
/// # Errors
///
/// Returns the first violation found.
pub fn check_trace(
    trace: &Trace,
    grammar: &Grammar,
    stream: &TokenStream,
) -> Result<(), InvariantViolation> {
    let first = trace.first();
    if first.transition() != Transition::Initial
        || first.mode() != Mode::Matching
        || first.cursor() != 0
        || !first.matched().is_empty()
    {
        return Err(violation(0, "trace does not start from an initial configuration"));
    }

    let last_index = trace.len() - 1;
    let mut previous: Option<&Configuration> = None;
    for (index, config) in trace.iter().enumerate() {
        if config.is_final() && index != last_index {
            return Err(violation(index, "final configuration is not the last one"));
        }
        if index > 0 && !produces(config.transition(), config.mode()) {
            return Err(violation(
                index,
                format!(
                    "transition {} cannot produce mode {:?}",
                    config.transition().tag(),
                    config.mode()
                ),
            ));
        }
        check_configuration(index, config, grammar, stream)?;
        if let Some(previous) = previous {
            if !matches!(step(previous, grammar, stream), Ok(ref next) if next == config) {
                return Err(violation(
                    index,
                    "configuration is not the successor of its predecessor",
                ));
            }
        }
        previous = Some(config);
    }

    let last = trace.last();
    if last.mode() == Mode::Success && last.cursor() < stream.input_len() {
        return Err(violation(last_index, "accepted before consuming the input"));
    }
    Ok(())
}

fn check_configuration(
    index: usize,
    config: &Configuration,
    grammar: &Grammar,
    stream: &TokenStream,
) -> Result<(), InvariantViolation> {
    let mut terminals = 0;
    let mut non_terminals = 0;
    for symbol in config.matched_symbols() {
        match symbol {
            Symbol::NonTerminal(_) => non_terminals += 1,
            Symbol::Terminal(id) => {
                let matches = stream
                    .get(terminals)
                    .is_some_and(|token| grammar.terminal(id).matches(token));
                if !matches {
                    return Err(violation(
                        index,
                        format!(
                            "matched terminal '{}' does not match token {terminals}",
                            grammar.name(symbol)
                        ),
                    ));
                }
                terminals += 1;
            }
            Symbol::End => return Err(violation(index, "end sentinel on the matched stack")),
        }
    }

    if config.alternatives().len() != non_terminals {
        return Err(violation(
            index,
            format!(
                "{} history entries for {non_terminals} open non-terminals",
                config.alternatives().len()
            ),
        ));
    }
    if config.cursor() != terminals {
        return Err(violation(
            index,
            format!("cursor {} after {terminals} matched terminals", config.cursor()),
        ));
    }
    if config.is_exhausted()
        && !matches!(
            config.transition(),
            Transition::Escalate | Transition::Retreat | Transition::Reject
        )
    {
        return Err(violation(
            index,
            format!("exhausted after transition {}", config.transition().tag()),
        ));
    }
    Ok(())
}

const fn produces(transition: Transition, mode: Mode) -> bool {
    match transition {
        Transition::Initial => false,
        Transition::Expansion | Transition::Match | Transition::NextAlternative => {
            matches!(mode, Mode::Matching)
        }
        Transition::Mismatch | Transition::Retreat | Transition::Escalate => {
            matches!(mode, Mode::Backtrack)
        }
        Transition::Acceptance => matches!(mode, Mode::Success),
        Transition::Reject => matches!(mode, Mode::Fail),
    }
}

fn violation(index: usize, message: impl Into<String>) -> InvariantViolation {
    InvariantViolation {
        index,
        message: message.into(),
    }
}
