use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ArgParser;
use clap_stdin::FileOrStdin;

use psoc::analyzer::SemanticVisitor;
use psoc::codegen::Codegen;
use psoc::error::CompileError;
use psoc::lexer::Lexer;
use psoc::parser::Parser;

/// Compiles French pseudo-code (.pso) to a flat Python script.
#[derive(ArgParser, Debug)]
#[command(version, about)]
struct Args {
    /// Source file, or `-` to read from stdin
    input: FileOrStdin,

    /// Destination path (defaults to the source path with a .py extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the token stream after lexical analysis
    #[arg(long)]
    dump_tokens: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source_path = if args.input.is_stdin() {
        None
    } else {
        Some(PathBuf::from(args.input.filename()))
    };

    if let Some(path) = &source_path {
        if path.extension().map_or(true, |ext| ext != "pso") {
            eprintln!("error: the source file must have the .pso extension");
            return ExitCode::FAILURE;
        }
    }

    let source = match args.input.contents() {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read the source: {e}");
            return ExitCode::FAILURE;
        }
    };

    let tokens = match Lexer::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    eprintln!("lexical analysis: {} tokens", tokens.len());
    if args.dump_tokens {
        for token in &tokens {
            eprintln!(
                "  {}:{}: {:?}",
                token.line, token.column, token.kind
            );
        }
    }

    let mut parser = Parser::new(tokens);
    let program = match parser.parse() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    eprintln!(
        "syntax analysis: algorithm '{}', {} declaration(s), {} function(s), {} statement(s)",
        program.name,
        program.declarations.len(),
        program.functions.len(),
        program.body.0.len()
    );

    let mut visitor = SemanticVisitor::new();
    match visitor.analyze(&program) {
        Ok(()) => eprintln!("semantic analysis: ok"),
        Err(CompileError::Semantic(errors)) => {
            eprintln!(
                "error: semantic analysis failed with {} error(s):",
                errors.len()
            );
            for (i, message) in errors.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, message);
            }
            eprintln!("no output was written");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }

    let mut codegen = Codegen::new();
    let python = codegen.generate(&program);

    let destination = args
        .output
        .or_else(|| source_path.map(|p| p.with_extension("py")));
    match destination {
        Some(path) => {
            if let Err(e) = fs::write(&path, &python) {
                eprintln!("error: cannot write {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
            eprintln!("wrote {}", path.display());
        }
        None => print!("{python}"),
    }

    ExitCode::SUCCESS
}
