//! Step-by-step behaviour of the parser engine on small grammars.

use retro::grammar::{demo, Grammar, GrammarBuilder};
use retro::parser::{Mode, Parser, ParserConfig, TokenStream, Transition};
use retro::testing::check_trace;
use retro::ParseError;

fn right_recursive() -> Grammar {
    GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["a", "S"], vec!["b"]])
        .build()
        .expect("Failed to build grammar")
}

/// `(mode, cursor, rule, matched, pending, alternatives, exhausted)` of one configuration.
type Row = (char, usize, String, String, String, String, bool);

fn table(grammar: &Grammar, tokens: &[&str]) -> Vec<Row> {
    let outcome = Parser::new(grammar).parse(tokens.iter().copied()).unwrap();
    outcome
        .trace
        .rows(grammar)
        .into_iter()
        .zip(outcome.trace.iter())
        .map(|(row, config)| {
            (
                row.mode,
                row.cursor,
                row.rule.to_string(),
                row.matched,
                row.pending,
                row.alternatives,
                config.is_exhausted(),
            )
        })
        .collect()
}

fn expected(rows: &[(char, usize, &str, &str, &str, &str, bool)]) -> Vec<Row> {
    rows.iter()
        .map(|(mode, cursor, rule, matched, pending, alternatives, exhausted)| {
            (
                *mode,
                *cursor,
                (*rule).to_string(),
                (*matched).to_string(),
                (*pending).to_string(),
                (*alternatives).to_string(),
                *exhausted,
            )
        })
        .collect()
}

#[test]
fn test_accepting_trace() {
    let grammar = right_recursive();
    assert_eq!(
        table(&grammar, &["a", "a", "b"]),
        expected(&[
            ('n', 0, "null", "", "S #", "", false),
            ('n', 0, "1", "S", "a S #", "0", false),
            ('n', 1, "2", "S a", "S #", "0", false),
            ('n', 1, "1", "S a S", "a S #", "0 0", false),
            ('n', 2, "2", "S a S a", "S #", "0 0", false),
            ('n', 2, "1", "S a S a S", "a S #", "0 0 0", false),
            ('r', 2, "4", "S a S a S", "a S #", "0 0 0", false),
            ('n', 2, "6a", "S a S a S", "b #", "0 0 1", false),
            ('n', 3, "2", "S a S a S b", "#", "0 0 1", false),
            ('t', 3, "3", "S a S a S b", "#", "0 0 1", false),
        ])
    );
}

#[test]
fn test_rejecting_trace() {
    let grammar = right_recursive();
    assert_eq!(
        table(&grammar, &["a", "c"]),
        expected(&[
            ('n', 0, "null", "", "S #", "", false),
            ('n', 0, "1", "S", "a S #", "0", false),
            ('n', 1, "2", "S a", "S #", "0", false),
            ('n', 1, "1", "S a S", "a S #", "0 0", false),
            ('r', 1, "4", "S a S", "a S #", "0 0", false),
            ('n', 1, "6a", "S a S", "b #", "0 1", false),
            ('r', 1, "4", "S a S", "b #", "0 1", false),
            ('r', 1, "6c", "S a", "S #", "0", true),
            ('r', 0, "5", "S", "a S #", "0", true),
            ('n', 0, "6a", "S", "b #", "1", false),
            ('r', 0, "4", "S", "b #", "1", false),
            ('e', 0, "6b", "S", "b #", "1", true),
        ])
    );
}

#[test]
fn test_accepted_run_is_sound() {
    let grammar = right_recursive();
    let outcome = Parser::new(&grammar).parse(["a", "a", "b"]).unwrap();
    let last = outcome.final_configuration();

    assert!(outcome.accepted);
    assert_eq!(last.mode(), Mode::Success);
    assert_eq!(last.matched_terminals(&grammar), vec!["a", "a", "b"]);
    assert_eq!(last.cursor(), 3);
    assert_eq!(last.alternative_history(), vec![0, 0, 1]);
    assert_eq!(
        outcome.trace.derivation(&grammar),
        Some(vec![("S", 0), ("S", 0), ("S", 1)])
    );
}

#[test]
fn test_explicit_end_marker_in_input() {
    let grammar = right_recursive();
    let implicit = Parser::new(&grammar).parse(["a", "a", "b"]).unwrap();
    let explicit = Parser::new(&grammar).parse(["a", "a", "b", "#"]).unwrap();
    assert_eq!(implicit.trace, explicit.trace);
}

#[test]
fn test_empty_input_requiring_a_terminal_fails() {
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["a"]])
        .build()
        .unwrap();
    let outcome = Parser::new(&grammar).parse(Vec::<&str>::new()).unwrap();
    assert!(!outcome.accepted);
    let transitions: Vec<Transition> = outcome.trace.iter().map(|c| c.transition()).collect();
    assert_eq!(
        transitions,
        vec![
            Transition::Initial,
            Transition::Expansion,
            Transition::Mismatch,
            Transition::Reject
        ]
    );
}

#[test]
fn test_start_symbol_deriving_the_end_marker_accepts_immediately() {
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["#"]])
        .build()
        .unwrap();
    let outcome = Parser::new(&grammar).parse(Vec::<&str>::new()).unwrap();

    assert!(outcome.accepted);
    assert_eq!(outcome.metrics.steps, 3);
    // the grammar consumed the marker token itself
    assert_eq!(outcome.final_configuration().cursor(), 1);
}

#[test]
fn test_epsilon_alternative() {
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["a", "S"], vec![]])
        .build()
        .unwrap();
    let parser = Parser::new(&grammar);
    assert!(parser.parse(Vec::<&str>::new()).unwrap().accepted);
    assert!(parser.parse(["a", "a"]).unwrap().accepted);
    assert!(!parser.parse(["a", "b"]).unwrap().accepted);
}

#[test]
fn test_leftmost_alternative_wins() {
    // both alternatives derive "x"; the first one must be used
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["A"], vec!["B"]])
        .rule("A", vec![vec!["x"]])
        .rule("B", vec![vec!["x"]])
        .build()
        .unwrap();
    let outcome = Parser::new(&grammar).parse(["x"]).unwrap();
    assert_eq!(
        outcome.trace.derivation(&grammar),
        Some(vec![("S", 0), ("A", 0)])
    );
    assert_eq!(outcome.metrics.alternatives_tried, 0);
}

#[test]
fn test_second_alternative_only_after_first_fails() {
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["A", "y"], vec!["B", "z"]])
        .rule("A", vec![vec!["x"]])
        .rule("B", vec![vec!["x"]])
        .build()
        .unwrap();
    let outcome = Parser::new(&grammar).parse(["x", "z"]).unwrap();
    assert!(outcome.accepted);
    assert_eq!(
        outcome.trace.derivation(&grammar),
        Some(vec![("S", 1), ("B", 0)])
    );

    let first_switch = outcome
        .trace
        .iter()
        .position(|c| c.transition() == Transition::NextAlternative)
        .unwrap();
    let first_mismatch = outcome
        .trace
        .iter()
        .position(|c| c.transition() == Transition::Mismatch)
        .unwrap();
    assert!(first_mismatch < first_switch);
}

#[test]
fn test_backtracking_reopens_completed_non_terminals() {
    // A completes with "a" first, but only A -> a a lets the rest match
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["A", "b"]])
        .rule("A", vec![vec!["a"], vec!["a", "a"]])
        .build()
        .unwrap();
    let outcome = Parser::new(&grammar).parse(["a", "a", "b"]).unwrap();
    assert!(outcome.accepted);
    assert_eq!(
        outcome.trace.derivation(&grammar),
        Some(vec![("S", 0), ("A", 1)])
    );
}

#[test]
fn test_pattern_terminals() {
    let grammar = GrammarBuilder::new()
        .entry_point("Sum")
        .rule("Sum", vec![vec!["Num", "+", "Sum"], vec!["Num"]])
        .rule("Num", vec![vec!["[0-9]+"]])
        .pattern("[0-9]+")
        .build()
        .unwrap();
    let parser = Parser::new(&grammar);
    assert!(parser.parse(["1", "+", "22", "+", "333"]).unwrap().accepted);
    assert!(!parser.parse(["1", "+", "x"]).unwrap().accepted);
    assert!(!parser.parse(["1", "+"]).unwrap().accepted);
}

#[test]
fn test_parse_from_inner_symbol() {
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["A", "A"]])
        .rule("A", vec![vec!["a"]])
        .build()
        .unwrap();
    let parser = Parser::new(&grammar);
    assert!(parser.parse_from(["a"], "A").unwrap().accepted);
    assert!(!parser.parse(["a"]).unwrap().accepted);
}

#[test]
fn test_custom_end_marker() {
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["#"]])
        .end_marker("$")
        .build()
        .unwrap();
    let parser = Parser::new(&grammar);
    // "#" is an ordinary token under a "$" marker
    assert!(parser.parse(["#"]).unwrap().accepted);
    assert!(!parser.parse(Vec::<&str>::new()).unwrap().accepted);
}

#[test]
fn test_determinism() {
    let grammar = demo::demo_grammar().unwrap();
    let tokens = retro::Tokenizer::standard().unwrap().tokenize_flat(demo::DEMO_PROGRAM);
    let parser = Parser::new(&grammar);
    let first = parser.parse(tokens.clone()).unwrap();
    let second = parser.parse(tokens).unwrap();
    assert_eq!(first.trace, second.trace);
    assert_eq!(first.accepted, second.accepted);
}

#[test]
fn test_demo_program() {
    let grammar = demo::demo_grammar().unwrap();
    let tokens = retro::Tokenizer::standard().unwrap().tokenize_flat(demo::DEMO_PROGRAM);
    assert_eq!(tokens.len(), 46);

    let stream = TokenStream::new(tokens.clone(), grammar.end_marker());
    let outcome = Parser::new(&grammar).parse(tokens).unwrap();
    assert!(outcome.accepted);
    assert_eq!(outcome.metrics.steps, 1203);
    check_trace(&outcome.trace, &grammar, &stream).unwrap();
}

#[test]
fn test_demo_program_with_dangling_operator() {
    let grammar = demo::demo_grammar().unwrap();
    let source = demo::DEMO_PROGRAM.replace("numero1 - numero2", "numero1 - ");
    let tokens = retro::Tokenizer::standard().unwrap().tokenize_flat(&source);

    let stream = TokenStream::new(tokens.clone(), grammar.end_marker());
    let outcome = Parser::new(&grammar).parse(tokens).unwrap();
    assert!(!outcome.accepted);
    assert_eq!(outcome.metrics.steps, 3393);
    assert_eq!(outcome.final_configuration().transition(), Transition::Reject);
    check_trace(&outcome.trace, &grammar, &stream).unwrap();
}

#[test]
fn test_concurrent_parses_share_a_grammar() {
    let grammar = right_recursive();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let grammar = &grammar;
                scope.spawn(move || {
                    let mut tokens = vec!["a"; n];
                    tokens.push("b");
                    Parser::new(grammar).parse(tokens).unwrap().accepted
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
}

#[test]
fn test_step_budget_error_carries_partial_trace() {
    let grammar = demo::demo_grammar().unwrap();
    let tokens = retro::Tokenizer::standard().unwrap().tokenize_flat(demo::DEMO_PROGRAM);
    let config = ParserConfig {
        max_steps: Some(100),
        time_limit: None,
    };
    let error = Parser::with_config(&grammar, config).parse(tokens).unwrap_err();
    assert!(matches!(error, ParseError::StepLimitExceeded { limit: 100, .. }));
    let trace = error.partial_trace().unwrap();
    assert_eq!(trace.len(), 101);
    assert!(!trace.accepted());
}
