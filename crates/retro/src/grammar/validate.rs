use crate::error::{GrammarError, GrammarWarning};
use crate::grammar::{Grammar, NonTerminalId, Symbol};
use compact_str::CompactString;

/// Options for grammar validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrammarValidationOptions {
    /// Report left recursion as a warning instead of failing the build.
    pub allow_left_recursion: bool,
}

/// Validate a built grammar.
///
/// Left recursion is an error unless the options allow it. Unreachable rules are
/// always warnings.
///
/// # Errors
///
/// Returns [`GrammarError::LeftRecursion`] listing every cycle found.
pub fn validate_grammar(
    grammar: &Grammar,
    options: GrammarValidationOptions,
) -> Result<Vec<GrammarWarning>, GrammarError> {
    let mut warnings = Vec::new();

    let cycles: Vec<Vec<CompactString>> = detect_left_recursion(grammar)
        .into_iter()
        .map(|cycle| {
            cycle
                .into_iter()
                .map(|id| CompactString::from(grammar.rule_name(id)))
                .collect()
        })
        .collect();
    if !cycles.is_empty() {
        if !options.allow_left_recursion {
            return Err(GrammarError::LeftRecursion(cycles));
        }
        warnings.extend(cycles.into_iter().map(GrammarWarning::LeftRecursion));
    }

    warnings.extend(
        unreachable_rules(grammar)
            .into_iter()
            .map(|id| GrammarWarning::UnreachableRule(grammar.rule_name(id).into())),
    );
    Ok(warnings)
}

/// Non-terminals that can derive the empty string, indexed by rule.
#[must_use]
pub fn nullable_rules(grammar: &Grammar) -> Vec<bool> {
    let mut nullable = vec![false; grammar.rule_count()];
    let mut changed = true;
    while changed {
        changed = false;
        for (id, _) in grammar.non_terminals() {
            if nullable[id.index()] {
                continue;
            }
            let derives_empty = grammar.alternatives_of(id).iter().any(|alternative| {
                alternative.iter().all(|symbol| match symbol {
                    Symbol::NonTerminal(inner) => nullable[inner.index()],
                    Symbol::Terminal(_) | Symbol::End => false,
                })
            });
            if derives_empty {
                nullable[id.index()] = true;
                changed = true;
            }
        }
    }
    nullable
}

/// Non-terminals that can appear first when expanding each rule: the leading
/// non-terminal of every alternative, and those after it while the prefix is nullable.
fn left_corners(grammar: &Grammar, nullable: &[bool]) -> Vec<Vec<NonTerminalId>> {
    grammar
        .non_terminals()
        .map(|(id, _)| {
            let mut corners: Vec<NonTerminalId> = Vec::new();
            for alternative in grammar.alternatives_of(id) {
                for symbol in alternative {
                    let Symbol::NonTerminal(corner) = *symbol else {
                        break;
                    };
                    if !corners.contains(&corner) {
                        corners.push(corner);
                    }
                    if !nullable[corner.index()] {
                        break;
                    }
                }
            }
            corners
        })
        .collect()
}

/// Find left-recursive cycles, direct or through other rules.
///
/// Each cycle starts and ends with the same non-terminal, e.g. `[E, E]` for
/// `E -> E + T` or `[A, B, A]` for `A -> B x`, `B -> A y`.
#[must_use]
pub fn detect_left_recursion(grammar: &Grammar) -> Vec<Vec<NonTerminalId>> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Visit {
        New,
        Active,
        Done,
    }

    fn visit(
        node: NonTerminalId,
        corners: &[Vec<NonTerminalId>],
        state: &mut [Visit],
        path: &mut Vec<NonTerminalId>,
        cycles: &mut Vec<Vec<NonTerminalId>>,
    ) {
        state[node.index()] = Visit::Active;
        path.push(node);
        for &next in &corners[node.index()] {
            match state[next.index()] {
                Visit::New => visit(next, corners, state, path, cycles),
                Visit::Active => {
                    if let Some(start) = path.iter().position(|id| *id == next) {
                        let mut cycle = path[start..].to_vec();
                        cycle.push(next);
                        cycles.push(cycle);
                    }
                }
                Visit::Done => {}
            }
        }
        path.pop();
        state[node.index()] = Visit::Done;
    }

    let nullable = nullable_rules(grammar);
    let corners = left_corners(grammar, &nullable);
    let mut state = vec![Visit::New; corners.len()];
    let mut path = Vec::new();
    let mut cycles = Vec::new();
    for (id, _) in grammar.non_terminals() {
        if state[id.index()] == Visit::New {
            visit(id, &corners, &mut state, &mut path, &mut cycles);
        }
    }
    cycles
}

/// Rules that no derivation from the entry point can use.
#[must_use]
pub fn unreachable_rules(grammar: &Grammar) -> Vec<NonTerminalId> {
    let mut reached = vec![false; grammar.rule_count()];
    let mut queue = vec![grammar.entry_point()];
    reached[grammar.entry_point().index()] = true;
    while let Some(id) = queue.pop() {
        for alternative in grammar.alternatives_of(id) {
            for symbol in alternative {
                if let Symbol::NonTerminal(next) = *symbol {
                    if !reached[next.index()] {
                        reached[next.index()] = true;
                        queue.push(next);
                    }
                }
            }
        }
    }
    grammar
        .non_terminals()
        .filter(|(id, _)| !reached[id.index()])
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    #[test]
    fn test_direct_left_recursion_is_an_error() {
        let result = GrammarBuilder::new()
            .entry_point("E")
            .rule("E", vec![vec!["E", "+", "T"], vec!["T"]])
            .rule("T", vec![vec!["n"]])
            .build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::LeftRecursion(vec![vec!["E".into(), "E".into()]])
        );
    }

    #[test]
    fn test_indirect_left_recursion_is_an_error() {
        let result = GrammarBuilder::new()
            .entry_point("A")
            .rule("A", vec![vec!["B", "x"]])
            .rule("B", vec![vec!["A", "y"], vec!["z"]])
            .build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::LeftRecursion(vec![vec!["A".into(), "B".into(), "A".into()]])
        );
    }

    #[test]
    fn test_left_recursion_through_nullable_prefix() {
        let result = GrammarBuilder::new()
            .entry_point("S")
            .rule("S", vec![vec!["N", "S", "a"], vec!["b"]])
            .rule("N", vec![vec!["n"], vec![]])
            .build();
        assert!(matches!(result, Err(GrammarError::LeftRecursion(_))));
    }

    #[test]
    fn test_allowed_left_recursion_becomes_a_warning() {
        let grammar = GrammarBuilder::new()
            .entry_point("E")
            .rule("E", vec![vec!["E", "+", "n"], vec!["n"]])
            .allow_left_recursion()
            .build()
            .unwrap();
        assert_eq!(
            grammar.warnings(),
            &[GrammarWarning::LeftRecursion(vec!["E".into(), "E".into()])]
        );
    }

    #[test]
    fn test_right_recursion_is_fine() {
        let grammar = GrammarBuilder::new()
            .entry_point("S")
            .rule("S", vec![vec!["a", "S"], vec!["b"]])
            .build()
            .unwrap();
        assert!(detect_left_recursion(&grammar).is_empty());
        assert!(grammar.warnings().is_empty());
    }

    #[test]
    fn test_nullable_fixpoint() {
        let grammar = GrammarBuilder::new()
            .entry_point("S")
            .rule("S", vec![vec!["A", "B"]])
            .rule("A", vec![vec!["a"], vec![]])
            .rule("B", vec![vec!["A"]])
            .rule("C", vec![vec!["c"]])
            .build()
            .unwrap();
        assert_eq!(nullable_rules(&grammar), vec![true, true, true, false]);
    }

    #[test]
    fn test_unreachable_rules_are_warned() {
        let grammar = GrammarBuilder::new()
            .entry_point("S")
            .rule("S", vec![vec!["a"]])
            .rule("Orphan", vec![vec!["b"]])
            .build()
            .unwrap();
        assert_eq!(
            grammar.warnings(),
            &[GrammarWarning::UnreachableRule("Orphan".into())]
        );
    }
}
