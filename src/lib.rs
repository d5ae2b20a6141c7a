//! Source-to-source compiler for a French-keyword pseudo-code language
//! (`.pso`), producing a flat, directly executable Python script.

pub mod analyzer;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;

use analyzer::SemanticVisitor;
use codegen::Codegen;
use error::CompileError;
use lexer::Lexer;
use parser::Parser;

/// Runs the whole pipeline: tokenize, parse, analyze, generate. The code
/// generator is only reached when analysis found no errors.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = Lexer::tokenize(source)?;

    let mut parser = Parser::new(tokens);
    let program = parser.parse()?;

    let mut visitor = SemanticVisitor::new();
    visitor.analyze(&program)?;

    let mut codegen = Codegen::new();
    Ok(codegen.generate(&program))
}
