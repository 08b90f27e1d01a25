//! A small imperative toy language, used by the CLI `demo` command, the benchmarks
//! and the integration tests.
//!
//! Programs are written between `fin` and `inicio`, statements end with `;`, and
//! comments are enclosed in `#`. Identifiers, numbers and string words are pattern
//! terminals; everything else is a keyword or punctuation literal.

use crate::error::GrammarError;
use crate::grammar::{Grammar, GrammarBuilder};

/// Lower-case identifier.
pub const IDENTIFIER: &str = "[a-z][a-zA-Z0-9_]*";
/// Unsigned integer.
pub const INTEGER: &str = "[0-9]+";
/// Decimal number with a fractional part.
pub const DECIMAL: &str = "[0-9]+\\.[0-9]+";
/// One word inside a string literal or comment.
pub const WORD: &str = "[a-zA-Z0-9_]+";

/// A program accepted by [`demo_grammar`].
pub const DEMO_PROGRAM: &str = "fin
palabra suma, numero1, numero2;
entero numero_decimal;
quiza bandera;
bandera = verdadero;
numero_decimal = 3.14;
ocultar (\"Dame un numero\");
borrar numero1;
# comentario de prueba #
suma = numero1 - numero2;
inicio";

/// Build the demo grammar. Its entry point is `programa`.
///
/// # Errors
///
/// Never fails in practice; the builder result is passed through unchanged.
pub fn demo_grammar() -> Result<Grammar, GrammarError> {
    demo_builder().build()
}

/// The demo grammar as an editable builder.
#[must_use]
pub fn demo_builder() -> GrammarBuilder {
    GrammarBuilder::new()
        .entry_point("programa")
        .rule("programa", vec![vec!["fin", "lista_instrucciones", "inicio"]])
        .rule(
            "lista_instrucciones",
            vec![
                vec!["instruccion"],
                vec!["instruccion", "lista_instrucciones"],
            ],
        )
        .rule(
            "instruccion",
            vec![
                vec!["declaracion", ";"],
                vec!["asignacion", ";"],
                vec!["entrada_salida", ";"],
                vec!["comentario"],
            ],
        )
        .rule("declaracion", vec![vec!["tipo_dato", "lista_variables"]])
        .rule(
            "lista_variables",
            vec![
                vec!["identificador"],
                vec!["identificador", ",", "lista_variables"],
            ],
        )
        .rule(
            "tipo_dato",
            vec![vec!["entero"], vec!["numero"], vec!["palabra"], vec!["quiza"]],
        )
        .rule("asignacion", vec![vec!["identificador", "=", "expresion"]])
        .rule(
            "entrada_salida",
            vec![
                vec!["ocultar", "(", "elemento_salida", ")"],
                vec!["borrar", "identificador"],
            ],
        )
        .rule(
            "elemento_salida",
            vec![
                vec!["expresion"],
                vec!["expresion", ",", "elemento_salida"],
            ],
        )
        .rule(
            "expresion",
            vec![
                vec!["termino"],
                vec!["termino", "operador_arit", "expresion"],
            ],
        )
        .rule("termino", vec![vec!["valor"], vec!["identificador"]])
        .rule(
            "operador_arit",
            vec![vec!["+"], vec!["-"], vec!["*"], vec!["/"]],
        )
        .rule(
            "valor",
            vec![
                vec!["numero_entero"],
                vec!["numero_decimal"],
                vec!["cadena"],
                vec!["verdadero"],
                vec!["falso"],
            ],
        )
        .rule("cadena", vec![vec!["\"", "texto", "\""]])
        .rule(
            "texto",
            vec![vec!["palabra_texto"], vec!["palabra_texto", "texto"]],
        )
        .rule("comentario", vec![vec!["#", "texto", "#"]])
        .rule("identificador", vec![vec![IDENTIFIER]])
        .rule("numero_entero", vec![vec![INTEGER]])
        .rule("numero_decimal", vec![vec![DECIMAL]])
        .rule("palabra_texto", vec![vec![WORD]])
        .pattern(IDENTIFIER)
        .pattern(INTEGER)
        .pattern(DECIMAL)
        .pattern(WORD)
}
