use thiserror::Error;

/// The three pipeline error kinds, in stage order. Lexical and syntax
/// errors are fatal on first occurrence; semantic errors are batched over
/// one whole analysis pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("lexical error at line {line}, column {column}: {message}")]
    Lexical {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("syntax error at line {line}, column {column}: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error(
        "semantic analysis failed with {} error(s):\n{}",
        .0.len(),
        .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n")
    )]
    Semantic(Vec<String>),
}
