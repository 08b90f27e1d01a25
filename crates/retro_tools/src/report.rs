//! Loading grammars and rendering parser runs

use crate::cli::OutputFormat;
use retro::grammar::GrammarDefinition;
use retro::{Grammar, GrammarError, LexerError, ParseError, ParseMetrics, ParseOutcome};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of a tool invocation. All of them map to exit code 2.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid grammar file {path}: {source}")]
    Definition {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Read a file to a string.
///
/// # Errors
///
/// Returns [`ToolError::Io`] with the offending path.
pub fn read_file(path: &Path) -> Result<String, ToolError> {
    std::fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and build a JSON grammar table.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a grammar table, or
/// describes an invalid grammar.
pub fn load_grammar(path: &Path) -> Result<Grammar, ToolError> {
    let json = read_file(path)?;
    let definition = GrammarDefinition::from_json(&json).map_err(|source| ToolError::Definition {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(definition.build()?)
}

/// Split a `--tokens` argument on whitespace.
#[must_use]
pub fn split_tokens(tokens: &str) -> Vec<&str> {
    tokens.split_whitespace().collect()
}

/// Render a finished run in the requested format.
///
/// # Errors
///
/// Returns [`ToolError::Json`] if JSON serialization fails.
pub fn render_outcome(
    outcome: &ParseOutcome,
    grammar: &Grammar,
    format: OutputFormat,
) -> Result<String, ToolError> {
    match format {
        OutputFormat::Table => {
            let mut out = outcome.trace.render(grammar);
            out.push_str(verdict(outcome));
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Summary => Ok(summary(outcome, grammar)),
        OutputFormat::Json => {
            let derivation = outcome.trace.derivation(grammar).map(|steps| {
                steps
                    .into_iter()
                    .map(|(rule, alternative)| {
                        serde_json::json!({ "rule": rule, "alternative": alternative })
                    })
                    .collect::<Vec<_>>()
            });
            let value = serde_json::json!({
                "accepted": outcome.accepted,
                "steps": outcome.metrics.steps,
                "derivation": derivation,
                "trace": outcome.trace.rows(grammar),
            });
            let mut out = serde_json::to_string_pretty(&value)?;
            out.push('\n');
            Ok(out)
        }
    }
}

fn verdict(outcome: &ParseOutcome) -> &'static str {
    if outcome.accepted {
        "accepted"
    } else {
        "rejected"
    }
}

fn summary(outcome: &ParseOutcome, grammar: &Grammar) -> String {
    let mut out = format!("{} after {} steps\n", verdict(outcome), outcome.metrics.steps);
    if let Some(derivation) = outcome.trace.derivation(grammar) {
        for (rule, alternative) in derivation {
            let _ = writeln!(out, "  {rule} #{alternative}");
        }
    }
    out
}

/// Run counters as printed by `--stats`.
#[must_use]
pub fn render_metrics(metrics: &ParseMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "steps:              {}", metrics.steps);
    let _ = writeln!(out, "expansions:         {}", metrics.expansions);
    let _ = writeln!(out, "matches:            {}", metrics.matches);
    let _ = writeln!(out, "mismatches:         {}", metrics.mismatches);
    let _ = writeln!(out, "retreats:           {}", metrics.retreats);
    let _ = writeln!(out, "alternatives tried: {}", metrics.alternatives_tried);
    let _ = writeln!(out, "escalations:        {}", metrics.escalations);
    let _ = writeln!(out, "max depth:          {}", metrics.max_depth);
    let _ = writeln!(out, "time:               {:?}", metrics.parse_time);
    out
}

/// One `warning:` line per grammar warning.
#[must_use]
pub fn render_warnings(grammar: &Grammar) -> String {
    grammar
        .warnings()
        .iter()
        .map(|warning| format!("warning: {warning}\n"))
        .collect()
}

/// One line of space-separated tokens per source line.
#[must_use]
pub fn render_token_lines<S: AsRef<str>>(lines: &[Vec<S>]) -> String {
    let mut out = String::new();
    for line in lines {
        let tokens: Vec<&str> = line.iter().map(AsRef::as_ref).collect();
        out.push_str(&tokens.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use retro::grammar::GrammarBuilder;
    use retro::Parser;

    fn grammar() -> Grammar {
        GrammarBuilder::new()
            .entry_point("S")
            .rule("S", vec![vec!["a", "S"], vec!["b"]])
            .build()
            .unwrap()
    }

    #[test]
    fn test_split_tokens() {
        assert_eq!(split_tokens("  a a\tb \n"), vec!["a", "a", "b"]);
        assert!(split_tokens("   ").is_empty());
    }

    #[test]
    fn test_table_output_ends_with_verdict() {
        let grammar = grammar();
        let outcome = Parser::new(&grammar).parse(["a", "c"]).unwrap();
        let table = render_outcome(&outcome, &grammar, OutputFormat::Table).unwrap();
        assert!(table.starts_with(" step"));
        assert!(table.ends_with("rejected\n"));
        // header, 12 configurations, verdict
        assert_eq!(table.lines().count(), 14);
    }

    #[test]
    fn test_summary_lists_derivation() {
        let grammar = grammar();
        let outcome = Parser::new(&grammar).parse(["a", "b"]).unwrap();
        let summary = render_outcome(&outcome, &grammar, OutputFormat::Summary).unwrap();
        assert_eq!(summary, "accepted after 7 steps\n  S #0\n  S #1\n");
    }

    #[test]
    fn test_json_output() {
        let grammar = grammar();
        let outcome = Parser::new(&grammar).parse(["a", "a", "b"]).unwrap();
        let json = render_outcome(&outcome, &grammar, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["accepted"], true);
        assert_eq!(value["steps"], 9);
        assert_eq!(value["trace"].as_array().unwrap().len(), 10);
        assert_eq!(value["trace"][0]["mode"], "n");
        assert_eq!(value["trace"][9]["rule"], "3");
        assert_eq!(value["derivation"][2]["alternative"], 1);
    }

    #[test]
    fn test_rejected_json_has_no_derivation() {
        let grammar = grammar();
        let outcome = Parser::new(&grammar).parse(["c"]).unwrap();
        let json = render_outcome(&outcome, &grammar, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["accepted"], false);
        assert!(value["derivation"].is_null());
    }

    #[test]
    fn test_metrics_and_warnings() {
        let grammar = grammar();
        let outcome = Parser::new(&grammar).parse(["b"]).unwrap();
        let stats = render_metrics(&outcome.metrics);
        assert!(stats.starts_with("steps:"));
        assert!(stats.contains("expansions:         1\n"));

        let unused = GrammarBuilder::new()
            .entry_point("S")
            .rule("S", vec![vec!["a"]])
            .rule("T", vec![vec!["b"]])
            .build()
            .unwrap();
        assert_eq!(
            render_warnings(&unused),
            "warning: rule 'T' is unreachable from the entry point\n"
        );
        assert!(render_warnings(&grammar).is_empty());
    }

    #[test]
    fn test_token_lines() {
        let lines = vec![vec!["a", "b"], vec![], vec!["c"]];
        assert_eq!(render_token_lines(&lines), "a b\n\nc\n");
    }
}
