#![no_main]
use libfuzzer_sys::fuzz_target;
use retro::grammar::{Grammar, GrammarBuilder};
use retro::parser::{Parser, ParserConfig, TokenStream};
use retro::testing::check_trace;
use retro::ParseError;
use std::sync::OnceLock;

const ALPHABET: [&str; 6] = ["n", "+", "*", "(", ")", "#"];

fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        GrammarBuilder::new()
            .entry_point("E")
            .rule("E", vec![vec!["T", "+", "E"], vec!["T"]])
            .rule("T", vec![vec!["F", "*", "T"], vec!["F"]])
            .rule("F", vec![vec!["(", "E", ")"], vec!["n"]])
            .build()
            .unwrap()
    })
}

fuzz_target!(|data: &[u8]| {
    let grammar = grammar();
    let tokens: Vec<&str> = data
        .iter()
        .take(24)
        .map(|byte| ALPHABET[usize::from(*byte) % ALPHABET.len()])
        .collect();

    let config = ParserConfig {
        max_steps: Some(100_000),
        time_limit: None,
    };
    match Parser::with_config(grammar, config).parse(tokens.iter().copied()) {
        Ok(outcome) => {
            let stream = TokenStream::new(tokens.iter().copied(), grammar.end_marker());
            if let Err(violation) = check_trace(&outcome.trace, grammar, &stream) {
                panic!("{violation} for {tokens:?}");
            }
        }
        Err(ParseError::StepLimitExceeded { .. }) => {}
        Err(other) => panic!("unexpected error {other} for {tokens:?}"),
    }
});
