use psoc::analyzer::SemanticVisitor;
use psoc::compile;
use psoc::error::CompileError;
use psoc::lexer::{Lexer, TokenKind};
use psoc::parser::{BinOpKind, Expr, Parser, Program, Stmt};

fn wrap_program(vars: &str, body: &str) -> String {
    format!("ALGORITHME test\nVARIABLES\n{vars}\nDEBUT\n{body}\nFIN\n")
}

fn parse(source: &str) -> Program {
    let tokens = Lexer::tokenize(source).unwrap();
    Parser::new(tokens).parse().unwrap()
}

fn analyze(source: &str) -> Result<(), CompileError> {
    let program = parse(source);
    SemanticVisitor::new().analyze(&program)
}

fn semantic_errors(source: &str) -> Vec<String> {
    let Err(CompileError::Semantic(errors)) = analyze(source) else {
        panic!("expected a semantic failure");
    };
    errors
}

// ==================== lexer ====================

#[test]
fn integer_literals_round_trip() {
    for n in [0i64, 1, 7, 42, 1000, 1234567890123] {
        let text = n.to_string();
        let tokens = Lexer::tokenize(&text).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Num(n));
        assert_eq!(tokens[0].text, text);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }
}

#[test]
fn real_and_string_literals() {
    let tokens = Lexer::tokenize("3.25").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Real(3.25));
    assert_eq!(tokens[0].text, "3.25");

    let tokens = Lexer::tokenize("\"bonjour le monde\"").unwrap();
    assert_eq!(
        tokens[0].kind,
        TokenKind::Str("bonjour le monde".to_string())
    );
}

#[test]
fn tokenizing_twice_yields_identical_streams() {
    let source = wrap_program("x: ENTIER", "x <- 1\nECRIRE(x)");
    let first = Lexer::tokenize(&source).unwrap();
    let second = Lexer::tokenize(&source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn tokens_carry_line_and_column() {
    let tokens = Lexer::tokenize("x <- 1\ny <- 2").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Ident("x".to_string()));
    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    assert_eq!(tokens[1].kind, TokenKind::Assign);
    assert_eq!((tokens[1].line, tokens[1].column), (1, 3));
    assert_eq!(tokens[2].kind, TokenKind::Num(1));
    assert_eq!((tokens[2].line, tokens[2].column), (1, 6));
    assert_eq!(tokens[3].kind, TokenKind::Newline);

    assert_eq!(tokens[4].kind, TokenKind::Ident("y".to_string()));
    assert_eq!((tokens[4].line, tokens[4].column), (2, 1));
}

#[test]
fn keywords_fold_case_but_identifiers_do_not() {
    for word in ["DEBUT", "debut", "Debut"] {
        let tokens = Lexer::tokenize(word).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Debut);
        assert_eq!(tokens[0].text, "DEBUT");
    }

    let lower = Lexer::tokenize("x").unwrap();
    let upper = Lexer::tokenize("X").unwrap();
    assert_eq!(lower[0].kind, TokenKind::Ident("x".to_string()));
    assert_eq!(upper[0].kind, TokenKind::Ident("X".to_string()));
    assert_ne!(lower[0].kind, upper[0].kind);
}

#[test]
fn lowercase_a_stays_an_identifier() {
    let tokens = Lexer::tokenize("a").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Ident("a".to_string()));

    let tokens = Lexer::tokenize("A").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::A);
}

#[test]
fn comments_are_skipped() {
    let tokens = Lexer::tokenize("x // tout le reste\ny").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &TokenKind::Ident("x".to_string()),
            &TokenKind::Newline,
            &TokenKind::Ident("y".to_string()),
            &TokenKind::Eof,
        ]
    );
}

#[test]
fn unterminated_string_is_a_lexical_error() {
    assert!(matches!(
        Lexer::tokenize("\"abc"),
        Err(CompileError::Lexical { .. })
    ));
    assert!(matches!(
        Lexer::tokenize("\"ab\ncd\""),
        Err(CompileError::Lexical { line: 1, .. })
    ));
}

#[test]
fn stray_characters_are_lexical_errors() {
    let Err(CompileError::Lexical { line, column, .. }) = Lexer::tokenize("  @") else {
        panic!("expected a lexical error");
    };
    assert_eq!((line, column), (1, 3));

    // A lone `!` is not an operator.
    assert!(matches!(
        Lexer::tokenize("x ! y"),
        Err(CompileError::Lexical { .. })
    ));
}

// ==================== parser ====================

#[test]
fn multiplication_binds_tighter_than_addition() {
    let program = parse(&wrap_program("x: ENTIER", "x <- 2 + 3 * 4"));

    let expected = Expr::Binary(
        BinOpKind::Add,
        Box::new(Expr::Num(2)),
        Box::new(Expr::Binary(
            BinOpKind::Mul,
            Box::new(Expr::Num(3)),
            Box::new(Expr::Num(4)),
        )),
    );
    let Stmt::Assign(name, value) = &program.body.0[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(name, "x");
    assert_eq!(value, &expected);
}

#[test]
fn comparisons_do_not_chain() {
    let source = wrap_program(
        "a: ENTIER\nb: ENTIER\nc: ENTIER",
        "SI a < b < c ALORS\nFINSI",
    );
    let tokens = Lexer::tokenize(&source).unwrap();
    let result = Parser::new(tokens).parse();
    assert!(matches!(result, Err(CompileError::Syntax { .. })));
}

#[test]
fn mismatched_terminator_is_a_syntax_error() {
    let source = wrap_program("x: ENTIER", "TANTQUE x > 0 FAIRE\nx <- x - 1\nFINSI");
    let tokens = Lexer::tokenize(&source).unwrap();
    let Err(CompileError::Syntax {
        expected, found, ..
    }) = Parser::new(tokens).parse()
    else {
        panic!("expected a syntax error");
    };
    assert!(expected.contains("FINTANTQUE"));
    assert_eq!(found, "'FINSI'");
}

#[test]
fn syntax_errors_carry_positions() {
    let tokens = Lexer::tokenize("ALGORITHME test\nDEBUT\n123\nFIN\n").unwrap();
    let Err(CompileError::Syntax { line, column, .. }) = Parser::new(tokens).parse() else {
        panic!("expected a syntax error");
    };
    // The stray number stops the main block, so FIN is expected right there.
    assert_eq!((line, column), (3, 1));
}

// ==================== semantic analyzer ====================

#[test]
fn arithmetic_promotes_but_assignment_matches_exactly() {
    let real_target = wrap_program("x: REEL", "x <- 1 + 2.0");
    assert!(analyze(&real_target).is_ok());

    let int_target = wrap_program("x: ENTIER", "x <- 1 + 2.0");
    let errors = semantic_errors(&int_target);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("cannot assign a value of type REEL"));
}

#[test]
fn duplicate_global_yields_one_error() {
    let errors = semantic_errors(&wrap_program("x: ENTIER\nx: TEXTE", "x <- 1"));
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("already declared"));
}

#[test]
fn local_reusing_a_parameter_name_yields_one_error() {
    let source = "ALGORITHME test
FONCTION f(x: ENTIER)
RETOURNE ENTIER
x: ENTIER
RETOURNE x
FINFONCTION
DEBUT
FIN
";
    let errors = semantic_errors(source);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("function 'f'"));
    assert!(errors[0].contains("already declared"));
}

#[test]
fn three_undeclared_uses_yield_three_messages() {
    let source = "ALGORITHME test\nDEBUT\nECRIRE(x)\nECRIRE(y)\nECRIRE(z)\nFIN\n";
    let errors = semantic_errors(source);
    assert_eq!(errors.len(), 3);
    assert!(errors[0].contains("'x'"));
    assert!(errors[1].contains("'y'"));
    assert!(errors[2].contains("'z'"));
}

#[test]
fn globals_are_visible_inside_functions() {
    let source = "ALGORITHME test
VARIABLES
total: ENTIER
PROCEDURE bump()
total <- total + 1
FINPROCEDURE
DEBUT
bump()
FIN
";
    assert!(analyze(source).is_ok());
}

#[test]
fn ordering_comparisons_require_numbers() {
    let errors = semantic_errors(&wrap_program("s: TEXTE", "SI s > 1 ALORS\nFINSI"));
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("requires numeric operands"));
}

#[test]
fn equality_requires_matching_types() {
    let errors = semantic_errors(&wrap_program("s: TEXTE", "SI s == 1 ALORS\nFINSI"));
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("incompatible types TEXTE and ENTIER"));
}

#[test]
fn pour_bounds_must_be_numeric() {
    let errors = semantic_errors(&wrap_program(
        "i: ENTIER",
        "POUR i DE \"a\" A 3 FAIRE\nFINPOUR",
    ));
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("numeric start expression"));
}

#[test]
fn array_size_must_be_positive() {
    let errors = semantic_errors(&wrap_program("t[0]: ENTIER", "ECRIRE(1)"));
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("positive"));
}

#[test]
fn logical_operators_do_not_constrain_operands() {
    let source = wrap_program("x: ENTIER", "SI x ET 1 OU NON x ALORS\nFINSI");
    assert!(analyze(&source).is_ok());
}

// ==================== code generator ====================

#[test]
fn end_to_end_sum() {
    let source = "ALGORITHME somme
VARIABLES
a: ENTIER
b: ENTIER
DEBUT
a <- 2
b <- (a + 3)
ECRIRE(b)
FIN
";
    let python = compile(source).unwrap();
    assert_eq!(python, "a = 2\nb = (a + 3)\nprint(b)\n");
}

#[test]
fn pour_loop_is_an_inclusive_range() {
    let source = wrap_program("i: ENTIER", "POUR i DE 1 A 3 FAIRE\nECRIRE(i)\nFINPOUR");
    let python = compile(&source).unwrap();
    assert_eq!(python, "for i in range(1, 3 + 1):\n    print(i)\n");
}

#[test]
fn switch_lowers_to_an_if_elif_else_chain() {
    let source = wrap_program(
        "x: ENTIER",
        "x <- 2\nCAS x FAIRE\n1:\nECRIRE(\"un\")\n2:\nECRIRE(\"deux\")\nDEFAUT:\nECRIRE(\"autre\")\nFINCAS",
    );
    let python = compile(&source).unwrap();
    assert_eq!(
        python,
        "x = 2\nif x == 1:\n    print(\"un\")\nelif x == 2:\n    print(\"deux\")\nelse:\n    print(\"autre\")\n"
    );
}

#[test]
fn lire_coerces_by_declared_type() {
    let source = wrap_program(
        "n: ENTIER\nr: REEL\ns: TEXTE",
        "LIRE(n)\nLIRE(r)\nLIRE(s)",
    );
    let python = compile(&source).unwrap();
    assert_eq!(
        python,
        "n = int(input())\nr = float(input())\ns = input()\n"
    );
}

#[test]
fn functions_emit_defs_with_zero_initialized_locals() {
    let source = "ALGORITHME test
VARIABLES
r: ENTIER
FONCTION double(n: ENTIER)
RETOURNE ENTIER
t: ENTIER
t <- n * 2
RETOURNE t
FINFONCTION
DEBUT
r <- double(4)
ECRIRE(r)
FIN
";
    let python = compile(source).unwrap();
    assert_eq!(
        python,
        "def double(n):\n    t = 0\n    t = (n * 2)\n    return t\n\nr = double(4)\nprint(r)\n"
    );
}

#[test]
fn procedures_and_standalone_calls() {
    let source = "ALGORITHME test
PROCEDURE salut()
ECRIRE(\"bonjour\")
FINPROCEDURE
DEBUT
salut()
FIN
";
    let python = compile(source).unwrap();
    assert_eq!(python, "def salut():\n    print(\"bonjour\")\n\nsalut()\n");
}

#[test]
fn empty_blocks_emit_pass() {
    let source = wrap_program("x: ENTIER", "SI x > 0 ALORS\nSINON\nFINSI");
    let python = compile(&source).unwrap();
    assert_eq!(python, "if (x > 0):\n    pass\nelse:\n    pass\n");
}

#[test]
fn arrays_declare_assign_and_index() {
    let source = wrap_program(
        "t[3]: ENTIER\ni: ENTIER",
        "t[0] <- 5\ni <- t[0]\nECRIRE(t[0])",
    );
    let python = compile(&source).unwrap();
    assert_eq!(python, "t = [0] * 3\nt[0] = 5\ni = t[0]\nprint(t[0])\n");
}

#[test]
fn logical_operators_translate_to_python_spellings() {
    let source = wrap_program(
        "a: BOOLEEN\nb: BOOLEEN\nc: BOOLEEN",
        "SI a ET b OU NON c ALORS\nECRIRE(1)\nFINSI",
    );
    let python = compile(&source).unwrap();
    assert_eq!(python, "if ((a and b) or (not c)):\n    print(1)\n");
}

#[test]
fn boolean_and_real_literals_use_python_spellings() {
    let source = wrap_program("ok: BOOLEEN\nr: REEL", "ok <- VRAI\nr <- 2.0");
    let python = compile(&source).unwrap();
    assert_eq!(python, "ok = True\nr = 2.0\n");
}

#[test]
fn ecrire_takes_positional_arguments_and_afficher_is_an_alias() {
    let source = wrap_program("x: ENTIER", "x <- 1\nECRIRE(\"x =\", x)\nAFFICHER(x)");
    let python = compile(&source).unwrap();
    assert_eq!(python, "x = 1\nprint(\"x =\", x)\nprint(x)\n");
}

#[test]
fn string_quotes_are_escaped() {
    // Build the quoted payload through the AST to avoid source-level quoting.
    let mut program = parse(&wrap_program("s: TEXTE", "s <- \"abc\""));
    program.body.0[0] = Stmt::Assign("s".to_string(), Expr::Str("dit \"oui\"".to_string()));
    let mut codegen = psoc::codegen::Codegen::new();
    assert_eq!(codegen.generate(&program), "s = \"dit \\\"oui\\\"\"\n");
}

#[test]
fn generation_is_deterministic() {
    let source = wrap_program(
        "x: ENTIER\nt[2]: REEL",
        "x <- 1\nTANTQUE x < 3 FAIRE\nx <- x + 1\nFINTANTQUE\nECRIRE(x)",
    );
    let program = parse(&source);
    SemanticVisitor::new().analyze(&program).unwrap();

    let mut codegen = psoc::codegen::Codegen::new();
    let first = codegen.generate(&program);
    let second = codegen.generate(&program);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn generator_is_never_reached_on_a_failed_tree() {
    let source = wrap_program("x: ENTIER", "x <- \"oups\"");
    assert!(matches!(
        compile(&source),
        Err(CompileError::Semantic(_))
    ));
}

#[test]
fn recursive_function_compiles() {
    let source = "ALGORITHME fact
VARIABLES
n: ENTIER
FONCTION factorielle(n: ENTIER)
RETOURNE ENTIER
SI n <= 1 ALORS
RETOURNE 1
FINSI
RETOURNE n * factorielle(n - 1)
FINFONCTION
DEBUT
n <- 5
ECRIRE(factorielle(n))
FIN
";
    let python = compile(source).unwrap();
    assert_eq!(
        python,
        "def factorielle(n):\n    if (n <= 1):\n        return 1\n    return (n * factorielle((n - 1)))\n\nn = 5\nprint(factorielle(n))\n"
    );
}
