use crate::error::{GrammarError, ParseError};
use crate::grammar::{Grammar, Symbol};
use crate::parser::{Configuration, Mode, TokenStream, Transition};

/// Apply exactly one transition to `config`.
///
/// This is a pure function: the same configuration, grammar and stream always yield
/// the same successor, and `config` is left untouched.
///
/// # Errors
///
/// Returns [`ParseError::CorruptConfiguration`] when `config` is final or its stacks
/// are inconsistent (an open non-terminal without a history entry, or a pending
/// stack that no longer starts with the alternative being replaced).
pub fn step(
    config: &Configuration,
    grammar: &Grammar,
    stream: &TokenStream,
) -> Result<Configuration, ParseError> {
    match config.mode {
        Mode::Matching => matching_step(config, grammar, stream),
        Mode::Backtrack => backtrack_step(config, grammar),
        Mode::Success | Mode::Fail => Err(ParseError::corrupt(format!(
            "no transition out of final mode {:?}",
            config.mode
        ))),
    }
}

fn matching_step(
    config: &Configuration,
    grammar: &Grammar,
    stream: &TokenStream,
) -> Result<Configuration, ParseError> {
    let Some((&head, rest)) = config.pending.pop() else {
        return Err(ParseError::corrupt("pending stack is empty"));
    };

    match head {
        // 1: expand the leftmost pending non-terminal with its first alternative
        Symbol::NonTerminal(id) => {
            let first = grammar
                .alternatives_of(id)
                .first()
                .ok_or_else(|| GrammarError::EmptyRule(grammar.rule_name(id).into()))?;
            Ok(Configuration {
                mode: Mode::Matching,
                cursor: config.cursor,
                matched: config.matched.push(head),
                pending: rest.push_all(first),
                alternatives: config.alternatives.push(0),
                transition: Transition::Expansion,
                exhausted: false,
            })
        }
        // 2: consume the current token
        Symbol::Terminal(id)
            if stream
                .get(config.cursor)
                .is_some_and(|token| grammar.terminal(id).matches(token)) =>
        {
            Ok(Configuration {
                mode: Mode::Matching,
                cursor: config.cursor + 1,
                matched: config.matched.push(head),
                pending: rest,
                alternatives: config.alternatives.clone(),
                transition: Transition::Match,
                exhausted: false,
            })
        }
        // 3: only the end sentinel is left and the input is consumed
        Symbol::End if rest.is_empty() && config.cursor >= stream.input_len() => {
            Ok(Configuration {
                mode: Mode::Success,
                transition: Transition::Acceptance,
                ..config.clone()
            })
        }
        // 4
        Symbol::Terminal(_) | Symbol::End => Ok(Configuration {
            mode: Mode::Backtrack,
            transition: Transition::Mismatch,
            ..config.clone()
        }),
    }
}

fn backtrack_step(config: &Configuration, grammar: &Grammar) -> Result<Configuration, ParseError> {
    let Some((&top, below)) = config.matched.pop() else {
        return Err(ParseError::corrupt("backtracking with an empty matched stack"));
    };

    match top {
        // 5: give the last matched terminal back
        Symbol::Terminal(_) => {
            let cursor = config
                .cursor
                .checked_sub(1)
                .ok_or_else(|| ParseError::corrupt("retreat before the first token"))?;
            Ok(Configuration {
                mode: Mode::Backtrack,
                cursor,
                matched: below,
                pending: config.pending.push(top),
                alternatives: config.alternatives.clone(),
                transition: Transition::Retreat,
                exhausted: config.exhausted,
            })
        }
        Symbol::End => Err(ParseError::corrupt("end sentinel on the matched stack")),
        Symbol::NonTerminal(id) => {
            let name = grammar.rule_name(id);
            let Some((&index, history)) = config.alternatives.pop() else {
                return Err(ParseError::corrupt(format!(
                    "open non-terminal '{name}' has no alternative history"
                )));
            };
            let alternatives = grammar.alternatives_of(id);
            let spliced = alternatives.get(index).ok_or_else(|| {
                ParseError::corrupt(format!("'{name}' has no alternative {index}"))
            })?;
            let rest = config.pending.strip_prefix(spliced).ok_or_else(|| {
                ParseError::corrupt(format!(
                    "pending stack does not start with alternative {index} of '{name}'"
                ))
            })?;

            if let Some(next) = alternatives.get(index + 1) {
                // 6a
                Ok(Configuration {
                    mode: Mode::Matching,
                    cursor: config.cursor,
                    matched: config.matched.clone(),
                    pending: rest.push_all(next),
                    alternatives: history.push(index + 1),
                    transition: Transition::NextAlternative,
                    exhausted: false,
                })
            } else if below.is_empty() {
                // 6b: the start symbol is out of alternatives
                Ok(Configuration {
                    mode: Mode::Fail,
                    transition: Transition::Reject,
                    exhausted: true,
                    ..config.clone()
                })
            } else {
                // 6c: reopen the parent's choice
                Ok(Configuration {
                    mode: Mode::Backtrack,
                    cursor: config.cursor,
                    matched: below,
                    pending: rest.push(top),
                    alternatives: history,
                    transition: Transition::Escalate,
                    exhausted: true,
                })
            }
        }
    }
}
