//! Tests for grammar builder and validation

use retro::grammar::{demo, GrammarBuilder, Symbol, Terminal, TerminalPolicy};
use retro::{GrammarError, GrammarWarning};

#[test]
fn test_grammar_builder_simple() {
    let grammar = GrammarBuilder::new()
        .entry_point("Expr")
        .rule("Expr", vec![vec!["n"]])
        .build();

    assert!(grammar.is_ok(), "Should build simple grammar");
}

#[test]
fn test_classification_is_exhaustive_and_exclusive() {
    let grammar = GrammarBuilder::new()
        .entry_point("Expr")
        .rule("Expr", vec![vec!["Term", "+", "Expr"], vec!["Term"]])
        .rule("Term", vec![vec!["(", "Expr", ")"], vec!["n"]])
        .build()
        .unwrap();

    for name in ["Expr", "Term", "+", "(", ")", "n", "unused"] {
        assert_ne!(grammar.is_terminal(name), grammar.is_non_terminal(name), "{name}");
    }
    assert!(grammar.is_non_terminal("Term"));
    assert!(grammar.is_terminal("("));
}

#[test]
fn test_symbol_lookup_round_trips_names() {
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["a", "T"]])
        .rule("T", vec![vec!["b"]])
        .build()
        .unwrap();

    for name in ["S", "T", "a", "b"] {
        let symbol = grammar.symbol(name).unwrap();
        assert_eq!(grammar.name(symbol), name);
    }
    assert!(grammar.symbol("c").is_none());
    assert_eq!(grammar.name(Symbol::End), "#");
    assert_eq!(
        grammar.non_terminals().map(|(_, name)| name).collect::<Vec<_>>(),
        vec!["S", "T"]
    );
}

#[test]
fn test_matches_uses_terminal_kind() {
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["[a-z]+", "[0-9]+"]])
        .pattern("[a-z]+")
        .build()
        .unwrap();

    assert!(grammar.matches("[a-z]+", "abc"));
    assert!(!grammar.matches("[a-z]+", "abc1"));
    // untagged, so literal even though it is a valid regex
    assert!(!grammar.matches("[0-9]+", "7"));
    assert!(grammar.matches("[0-9]+", "[0-9]+"));
    // names the grammar never mentions compare literally
    assert!(grammar.matches("zzz", "zzz"));
    assert!(!grammar.matches("S", "S"));

    let kinds: Vec<bool> = grammar.terminals().map(|(_, t)| t.is_pattern()).collect();
    assert_eq!(kinds, vec![true, false]);
}

#[test]
fn test_inferred_policy_reproduces_structural_classification() {
    let grammar = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["if", "[a-z]+", "+"]])
        .terminal_policy(TerminalPolicy::Inferred)
        .build()
        .unwrap();

    assert!(grammar.matches("[a-z]+", "abc"));
    assert!(grammar.matches("if", "if"));
    // "+" does not compile on its own, so it stays literal
    assert!(grammar.matches("+", "+"));
    assert_eq!(
        grammar.warnings(),
        &[GrammarWarning::AmbiguousTerminal("[a-z]+".into())]
    );
}

#[test]
fn test_construction_errors() {
    assert_eq!(
        GrammarBuilder::new().build().unwrap_err(),
        GrammarError::MissingEntryPoint
    );
    assert_eq!(
        GrammarBuilder::new()
            .entry_point("S")
            .rule("S", Vec::<Vec<&str>>::new())
            .build()
            .unwrap_err(),
        GrammarError::EmptyRule("S".into())
    );
    assert!(matches!(
        GrammarBuilder::new()
            .entry_point("S")
            .rule("S", vec![vec!["S", "a"], vec!["a"]])
            .build(),
        Err(GrammarError::LeftRecursion(_))
    ));
}

#[test]
fn test_error_messages() {
    let error = GrammarBuilder::new()
        .entry_point("A")
        .rule("A", vec![vec!["B", "x"]])
        .rule("B", vec![vec!["A", "y"]])
        .build()
        .unwrap_err();
    assert_eq!(error.to_string(), "Left recursion detected: A -> B -> A");

    let error = GrammarBuilder::new()
        .entry_point("S")
        .rule("S", vec![vec!["a"]])
        .pattern("a")
        .pattern("(")
        .rule("S", vec![vec!["("]])
        .build()
        .unwrap_err();
    assert!(error.to_string().starts_with("Invalid pattern '('"));
}

#[test]
fn test_editing_goes_through_a_new_builder() {
    let grammar = demo::demo_grammar().unwrap();
    let mut builder = grammar.to_builder();
    builder
        .replace_rule(
            "tipo_dato",
            vec![
                vec!["entero"],
                vec!["numero"],
                vec!["palabra"],
                vec!["quiza"],
                vec!["texto_largo"],
            ],
        )
        .unwrap();
    let edited = builder.build().unwrap();

    assert_eq!(edited.alternatives("tipo_dato").unwrap().len(), 5);
    assert_eq!(grammar.alternatives("tipo_dato").unwrap().len(), 4);
    assert!(edited.matches(demo::IDENTIFIER, "x1"));
}

#[test]
fn test_demo_grammar_terminal_kinds() {
    let grammar = demo::demo_grammar().unwrap();
    let patterns: Vec<&str> = grammar
        .terminals()
        .filter(|(_, terminal)| terminal.is_pattern())
        .map(|(_, terminal)| terminal.text())
        .collect();
    assert_eq!(
        patterns,
        vec![demo::IDENTIFIER, demo::INTEGER, demo::DECIMAL, demo::WORD]
    );
    assert!(matches!(
        grammar.terminal(grammar.symbol("fin").and_then(|s| match s {
            Symbol::Terminal(id) => Some(id),
            _ => None,
        }).unwrap()),
        Terminal::Literal(_)
    ));
}

#[cfg(feature = "serialize")]
mod definitions {
    use retro::grammar::{demo, GrammarDefinition};
    use retro::parser::Parser;

    #[test]
    fn test_demo_grammar_survives_json() {
        let grammar = demo::demo_grammar().unwrap();
        let json = grammar.to_definition().to_json().unwrap();
        let reloaded = GrammarDefinition::from_json(&json).unwrap().build().unwrap();

        let tokens = retro::Tokenizer::standard()
            .unwrap()
            .tokenize_flat(demo::DEMO_PROGRAM);
        let original = Parser::new(&grammar).parse(tokens.clone()).unwrap();
        let reloaded = Parser::new(&reloaded).parse(tokens).unwrap();
        assert_eq!(original.accepted, reloaded.accepted);
        assert_eq!(original.metrics.steps, reloaded.metrics.steps);
    }
}
