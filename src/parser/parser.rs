use crate::analyzer::Ty;
use crate::error::CompileError;
use crate::lexer::{Token, TokenKind};

use super::{
    ArrayDecl, BinOpKind, Block, Case, Declaration, Expr, FuncDef, Param, Program, Stmt,
    UnaryOpKind, VarDecl,
};

/// Recursive-descent parser with one token of lookahead. `Newline` tokens
/// are grammatically inert: `advance` skips any that follow the consumed
/// token, so the cursor always rests on a meaningful token.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn parse(&mut self) -> Result<Program, CompileError> {
        self.skip_newlines();
        self.parse_program()
    }

    fn current(&self) -> &Token {
        // The token stream always ends with Eof.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn skip_newlines(&mut self) {
        while self.current().kind == TokenKind::Newline {
            self.index += 1;
        }
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        self.skip_newlines();
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn syntax_error(&self, expected: &str) -> CompileError {
        let t = self.current();
        CompileError::Syntax {
            expected: expected.to_string(),
            found: t.describe(),
            line: t.line,
            column: t.column,
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, CompileError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.syntax_error(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<Token, CompileError> {
        if matches!(self.current().kind, TokenKind::Ident(_)) {
            Ok(self.advance())
        } else {
            Err(self.syntax_error(expected))
        }
    }

    fn expect_num(&mut self, expected: &str) -> Result<(i64, Token), CompileError> {
        if let TokenKind::Num(value) = self.current().kind {
            Ok((value, self.advance()))
        } else {
            Err(self.syntax_error(expected))
        }
    }

    fn check_ident(&self) -> bool {
        matches!(self.current().kind, TokenKind::Ident(_))
    }

    /// True when the token after the current one (newlines aside) is `kind`.
    fn next_is(&self, kind: &TokenKind) -> bool {
        self.tokens
            .iter()
            .skip(self.index + 1)
            .find(|t| t.kind != TokenKind::Newline)
            .is_some_and(|t| &t.kind == kind)
    }

    /// A block stops at whichever terminator ends the innermost open
    /// construct; the caller then expects its own terminator, so a
    /// mismatched one surfaces as a syntax error there. An integer literal
    /// also stops a block: it can only legitimately start the next CAS
    /// branch.
    fn at_block_end(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Fin
                | TokenKind::Sinon
                | TokenKind::FinSi
                | TokenKind::FinTantQue
                | TokenKind::FinPour
                | TokenKind::FinCas
                | TokenKind::Defaut
                | TokenKind::FinFonction
                | TokenKind::FinProcedure
                | TokenKind::Num(_)
                | TokenKind::Eof
        )
    }

    // ==================== program structure ====================

    /// programme = "ALGORITHME" ident ("VARIABLES" declaration*)? fonction*
    ///             "DEBUT" instruction* "FIN"
    fn parse_program(&mut self) -> Result<Program, CompileError> {
        self.expect(&TokenKind::Algorithme, "keyword 'ALGORITHME'")?;
        let name = self.expect_ident("the algorithm name")?;

        let mut declarations = vec![];
        if self.consume(&TokenKind::Variables) {
            declarations = self.parse_declarations()?;
        }

        let mut functions = vec![];
        while self.check(&TokenKind::Fonction) || self.check(&TokenKind::Procedure) {
            functions.push(self.parse_function()?);
        }

        self.expect(&TokenKind::Debut, "keyword 'DEBUT'")?;
        let body = self.parse_block()?;
        self.expect(&TokenKind::Fin, "keyword 'FIN'")?;

        Ok(Program {
            name: name.text,
            declarations,
            functions,
            body,
        })
    }

    /// declaration = ident ":" type
    ///             | ident "[" num "]" ":" type
    fn parse_declarations(&mut self) -> Result<Vec<Declaration>, CompileError> {
        let mut declarations = vec![];
        while self.check_ident() {
            declarations.push(self.parse_declaration()?);
        }
        Ok(declarations)
    }

    fn parse_declaration(&mut self) -> Result<Declaration, CompileError> {
        let name = self.expect_ident("a variable name")?;

        if self.consume(&TokenKind::OpenSquareBrace) {
            let (size, _) = self.expect_num("the array size")?;
            self.expect(&TokenKind::CloseSquareBrace, "']' after the array size")?;
            self.expect(&TokenKind::Colon, "':' after the array size")?;
            let ty = self.parse_type()?;
            return Ok(Declaration::Array(ArrayDecl {
                name: name.text,
                size,
                ty,
                line: name.line,
            }));
        }

        self.expect(&TokenKind::Colon, "':' after the variable name")?;
        let ty = self.parse_type()?;
        Ok(Declaration::Var(VarDecl {
            name: name.text,
            ty,
            line: name.line,
        }))
    }

    fn parse_type(&mut self) -> Result<Ty, CompileError> {
        let ty = match self.current().kind {
            TokenKind::Entier => Ty::Entier,
            TokenKind::Reel => Ty::Reel,
            TokenKind::Texte => Ty::Texte,
            TokenKind::Booleen => Ty::Booleen,
            _ => return Err(self.syntax_error("a type (ENTIER, REEL, TEXTE or BOOLEEN)")),
        };
        self.advance();
        Ok(ty)
    }

    /// fonction = ("FONCTION" | "PROCEDURE") ident "(" params? ")"
    ///            ("RETOURNE" type)? local_decl* instruction*
    ///            ("FINFONCTION" | "FINPROCEDURE")
    fn parse_function(&mut self) -> Result<FuncDef, CompileError> {
        let is_procedure = self.check(&TokenKind::Procedure);
        self.advance();

        let name = self.expect_ident("the function name")?;
        self.expect(&TokenKind::OpenParen, "'(' after the function name")?;

        let mut params = vec![];
        if !self.check(&TokenKind::CloseParen) {
            params = self.parse_params()?;
        }
        self.expect(&TokenKind::CloseParen, "')' after the parameters")?;

        let mut return_type = None;
        if !is_procedure && self.consume(&TokenKind::Retourne) {
            return_type = Some(self.parse_type()?);
        }

        // Local declarations sit between the signature and the first
        // statement; `ident :` cannot start a statement, so one extra token
        // of lookahead is enough to tell them apart.
        let mut locals = vec![];
        while self.check_ident() && self.next_is(&TokenKind::Colon) {
            let name = self.expect_ident("a variable name")?;
            self.expect(&TokenKind::Colon, "':' after the variable name")?;
            let ty = self.parse_type()?;
            locals.push(VarDecl {
                name: name.text,
                ty,
                line: name.line,
            });
        }

        let body = self.parse_block()?;

        if is_procedure {
            self.expect(&TokenKind::FinProcedure, "keyword 'FINPROCEDURE'")?;
        } else {
            self.expect(&TokenKind::FinFonction, "keyword 'FINFONCTION'")?;
        }

        Ok(FuncDef {
            name: name.text,
            params,
            return_type,
            locals,
            body,
            is_procedure,
        })
    }

    /// params = ident ":" type ("," ident ":" type)*
    fn parse_params(&mut self) -> Result<Vec<Param>, CompileError> {
        let mut params = vec![];
        loop {
            let name = self.expect_ident("a parameter name")?;
            self.expect(&TokenKind::Colon, "':' after the parameter name")?;
            let ty = self.parse_type()?;
            params.push(Param {
                name: name.text,
                ty,
                line: name.line,
            });
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    // ==================== statements ====================

    fn parse_block(&mut self) -> Result<Block, CompileError> {
        let mut stmts = vec![];
        while !self.at_block_end() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(Block(stmts))
    }

    /// instruction = retourne | si | cas | tantque | pour | ecrire | lire
    ///             | affectation_ou_appel
    fn parse_stmt(&mut self) -> Result<Stmt, CompileError> {
        match self.current().kind {
            TokenKind::Retourne => self.parse_return(),
            TokenKind::Si => self.parse_if(),
            TokenKind::Cas => self.parse_switch(),
            TokenKind::TantQue => self.parse_while(),
            TokenKind::Pour => self.parse_for(),
            TokenKind::Ecrire => self.parse_print(),
            TokenKind::Lire => self.parse_read(),
            TokenKind::Ident(_) => self.parse_assign_or_call(),
            _ => Err(self.syntax_error("a statement")),
        }
    }

    /// retourne = "RETOURNE" expression
    fn parse_return(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        let value = self.parse_expression()?;
        Ok(Stmt::Return(value))
    }

    /// affectation_ou_appel = ident "<-" expression
    ///                      | ident "[" expression "]" "<-" expression
    ///                      | ident "(" (expression ("," expression)*)? ")"
    fn parse_assign_or_call(&mut self) -> Result<Stmt, CompileError> {
        let name = self.expect_ident("a variable name")?;

        if self.consume(&TokenKind::OpenParen) {
            let args = self.parse_args()?;
            return Ok(Stmt::Call(name.text, args));
        }

        if self.consume(&TokenKind::OpenSquareBrace) {
            let index = self.parse_expression()?;
            self.expect(&TokenKind::CloseSquareBrace, "']' after the array index")?;
            self.expect(&TokenKind::Assign, "operator '<-'")?;
            let value = self.parse_expression()?;
            return Ok(Stmt::ArrayAssign(name.text, index, value));
        }

        self.expect(&TokenKind::Assign, "operator '<-'")?;
        let value = self.parse_expression()?;
        Ok(Stmt::Assign(name.text, value))
    }

    /// si = "SI" condition "ALORS" instruction* ("SINON" instruction*)? "FINSI"
    fn parse_if(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        let condition = self.parse_condition()?;
        self.expect(&TokenKind::Alors, "keyword 'ALORS' after the condition")?;

        let then_block = self.parse_block()?;

        let else_block = if self.consume(&TokenKind::Sinon) {
            Some(self.parse_block()?)
        } else {
            None
        };

        self.expect(&TokenKind::FinSi, "keyword 'FINSI'")?;
        Ok(Stmt::If(condition, then_block, else_block))
    }

    /// tantque = "TANTQUE" condition "FAIRE" instruction* "FINTANTQUE"
    fn parse_while(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        let condition = self.parse_condition()?;
        self.expect(&TokenKind::Faire, "keyword 'FAIRE' after the condition")?;

        let body = self.parse_block()?;
        self.expect(&TokenKind::FinTantQue, "keyword 'FINTANTQUE'")?;
        Ok(Stmt::While(condition, body))
    }

    /// pour = "POUR" ident "DE" expression "A" expression "FAIRE"
    ///        instruction* "FINPOUR"
    fn parse_for(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        let var = self.expect_ident("the loop variable name")?;
        self.expect(&TokenKind::De, "keyword 'DE' after the loop variable")?;

        let from = self.parse_expression()?;
        self.expect(&TokenKind::A, "keyword 'A' after the start expression")?;
        let to = self.parse_expression()?;
        self.expect(&TokenKind::Faire, "keyword 'FAIRE' after the end expression")?;

        let body = self.parse_block()?;
        self.expect(&TokenKind::FinPour, "keyword 'FINPOUR'")?;
        Ok(Stmt::For(var.text, from, to, body))
    }

    /// cas = "CAS" expression "FAIRE" (num ":" instruction*)*
    ///       ("DEFAUT" ":" instruction*)? "FINCAS"
    fn parse_switch(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        let scrutinee = self.parse_expression()?;
        self.expect(&TokenKind::Faire, "keyword 'FAIRE' after the CAS expression")?;

        let mut cases = vec![];
        let mut default = None;

        while !self.check(&TokenKind::FinCas) && !self.check(&TokenKind::Eof) {
            if self.consume(&TokenKind::Defaut) {
                self.expect(&TokenKind::Colon, "':' after DEFAUT")?;
                default = Some(self.parse_block()?);
                break;
            }
            if matches!(self.current().kind, TokenKind::Num(_)) {
                let (value, _) = self.expect_num("a case value")?;
                self.expect(&TokenKind::Colon, "':' after the case value")?;
                let body = self.parse_block()?;
                cases.push(Case { value, body });
            } else {
                return Err(self.syntax_error("a case value, 'DEFAUT' or 'FINCAS'"));
            }
        }

        self.expect(&TokenKind::FinCas, "keyword 'FINCAS'")?;
        Ok(Stmt::Switch(scrutinee, cases, default))
    }

    /// ecrire = "ECRIRE" "(" expression ("," expression)* ")"
    fn parse_print(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        self.expect(&TokenKind::OpenParen, "'(' after ECRIRE")?;

        let mut expressions = vec![self.parse_expression()?];
        while self.consume(&TokenKind::Comma) {
            expressions.push(self.parse_expression()?);
        }

        self.expect(&TokenKind::CloseParen, "')' after the expressions")?;
        Ok(Stmt::Print(expressions))
    }

    /// lire = "LIRE" "(" ident ")"
    fn parse_read(&mut self) -> Result<Stmt, CompileError> {
        self.advance();
        self.expect(&TokenKind::OpenParen, "'(' after LIRE")?;
        let name = self.expect_ident("a variable name")?;
        self.expect(&TokenKind::CloseParen, "')' after the variable")?;
        Ok(Stmt::Read(name.text))
    }

    // ==================== expressions ====================

    /// condition = disjonction
    /// disjonction = conjonction ("OU" conjonction)*
    fn parse_condition(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_conjunction()?;
        while self.consume(&TokenKind::Ou) {
            let right = self.parse_conjunction()?;
            left = Expr::Binary(BinOpKind::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// conjonction = comparaison ("ET" comparaison)*
    fn parse_conjunction(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_comparison()?;
        while self.consume(&TokenKind::Et) {
            let right = self.parse_comparison()?;
            left = Expr::Binary(BinOpKind::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// comparaison = expression ((">"|"<"|"=="|"!="|">="|"<=") expression)?
    ///
    /// Comparisons do not chain: `a < b < c` needs parentheses and ET.
    fn parse_comparison(&mut self) -> Result<Expr, CompileError> {
        let left = self.parse_expression()?;

        let op = match self.current().kind {
            TokenKind::GreaterThan => BinOpKind::GreaterThan,
            TokenKind::LessThan => BinOpKind::LessThan,
            TokenKind::GreaterEqual => BinOpKind::GreaterEqual,
            TokenKind::LessEqual => BinOpKind::LessEqual,
            TokenKind::DoubleEqual => BinOpKind::Equal,
            TokenKind::NotEqual => BinOpKind::NotEqual,
            _ => return Ok(left),
        };
        self.advance();

        let right = self.parse_expression()?;
        Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
    }

    /// expression = terme (("+"|"-") terme)*
    fn parse_expression(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOpKind::Add,
                TokenKind::Minus => BinOpKind::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    /// terme = unaire (("*"|"/"|"%") unaire)*
    fn parse_term(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOpKind::Mul,
                TokenKind::Slash => BinOpKind::Div,
                TokenKind::Percent => BinOpKind::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    /// unaire = "NON" unaire | primaire
    fn parse_unary(&mut self) -> Result<Expr, CompileError> {
        if self.consume(&TokenKind::Non) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryOpKind::Not, Box::new(operand)));
        }
        self.parse_primary()
    }

    /// primaire = num | reel | chaine | "VRAI" | "FAUX"
    ///          | ident ("(" args? ")" | "[" expression "]")?
    ///          | "(" condition ")"
    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        match self.current().kind.clone() {
            TokenKind::Num(value) => {
                self.advance();
                Ok(Expr::Num(value))
            }
            TokenKind::Real(value) => {
                self.advance();
                Ok(Expr::Real(value))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expr::Str(value))
            }
            TokenKind::Vrai => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            TokenKind::Faux => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            TokenKind::Ident(name) => {
                self.advance();
                self.parse_postfix(name)
            }
            TokenKind::OpenParen => {
                self.advance();
                let expr = self.parse_condition()?;
                self.expect(&TokenKind::CloseParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.syntax_error("an expression")),
        }
    }

    /// At most one postfix operator per primary: a call or an index.
    fn parse_postfix(&mut self, name: String) -> Result<Expr, CompileError> {
        if self.consume(&TokenKind::OpenParen) {
            let args = self.parse_args()?;
            return Ok(Expr::Call(name, args));
        }

        if self.consume(&TokenKind::OpenSquareBrace) {
            let index = self.parse_expression()?;
            self.expect(&TokenKind::CloseSquareBrace, "']' after the array index")?;
            return Ok(Expr::ArrayAccess(name, Box::new(index)));
        }

        Ok(Expr::Ident(name))
    }

    /// args = (expression ("," expression)*)? ")"  -- '(' already consumed
    fn parse_args(&mut self) -> Result<Vec<Expr>, CompileError> {
        let mut args = vec![];
        if !self.check(&TokenKind::CloseParen) {
            args.push(self.parse_expression()?);
            while self.consume(&TokenKind::Comma) {
                args.push(self.parse_expression()?);
            }
        }
        self.expect(&TokenKind::CloseParen, "')' after the arguments")?;
        Ok(args)
    }
}
