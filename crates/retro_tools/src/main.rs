//! Retro CLI
//!
//! Command-line tool for running retro grammars. Exit code 0 means the input was
//! accepted, 1 rejected, 2 any error.

use clap::Parser as _;
use retro::grammar::demo;
use retro::{Grammar, ParseOutcome, Parser, ParserConfig, Tokenizer};
use retro_tools::cli::{Cli, Commands, OutputFormat};
use retro_tools::{
    load_grammar, read_file, render_metrics, render_outcome, render_token_lines,
    render_warnings, split_tokens, ToolError,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("Error: {error}");
            if let ToolError::Parse(parse_error) = &error {
                if let Some(trace) = parse_error.partial_trace() {
                    eprintln!("Stopped after {} steps", trace.steps());
                }
            }
            ExitCode::from(2)
        }
    }
}

/// `Ok(false)` only for a rejected parse.
fn run(command: Commands) -> Result<bool, ToolError> {
    match command {
        Commands::Parse {
            grammar,
            input,
            tokens,
            start,
            format,
            max_steps,
            stats,
        } => {
            let grammar = load_grammar(&grammar)?;
            eprint!("{}", render_warnings(&grammar));

            let tokens: Vec<String> = match (input, tokens) {
                (Some(path), _) => {
                    let source = read_file(&path)?;
                    Tokenizer::standard()?
                        .tokenize_flat(&source)
                        .into_iter()
                        .map(String::from)
                        .collect()
                }
                (None, Some(tokens)) => split_tokens(&tokens)
                    .into_iter()
                    .map(String::from)
                    .collect(),
                (None, None) => Vec::new(),
            };

            let config = ParserConfig {
                max_steps: (max_steps > 0).then_some(max_steps),
                ..ParserConfig::default()
            };
            let parser = Parser::with_config(&grammar, config);
            let outcome = match start {
                Some(start) => parser.parse_from(tokens, &start)?,
                None => parser.parse(tokens)?,
            };
            report(&outcome, &grammar, format, stats)
        }
        Commands::Check { grammar } => {
            let grammar = load_grammar(&grammar)?;
            eprint!("{}", render_warnings(&grammar));
            println!(
                "{} rules, entry point '{}'",
                grammar.rule_count(),
                grammar.entry_point_name()
            );
            print!("{grammar}");
            Ok(true)
        }
        Commands::Tokenize { input, patterns } => {
            let source = read_file(&input)?;
            let tokenizer = if patterns.is_empty() {
                Tokenizer::standard()?
            } else {
                Tokenizer::new(patterns)?
            };
            for error in tokenizer.unmatched(&source) {
                eprintln!("warning: {error}");
            }
            print!("{}", render_token_lines(&tokenizer.tokenize(&source)));
            Ok(true)
        }
        Commands::Demo { format, stats } => {
            let grammar = demo::demo_grammar()?;
            let tokens = Tokenizer::standard()?.tokenize_flat(demo::DEMO_PROGRAM);
            let outcome = Parser::new(&grammar).parse(tokens)?;
            report(&outcome, &grammar, format, stats)
        }
    }
}

fn report(
    outcome: &ParseOutcome,
    grammar: &Grammar,
    format: OutputFormat,
    stats: bool,
) -> Result<bool, ToolError> {
    print!("{}", render_outcome(outcome, grammar, format)?);
    if stats {
        eprint!("{}", render_metrics(&outcome.metrics));
    }
    Ok(outcome.accepted)
}
