use crate::error::CompileError;
use crate::parser::{
    ArrayDecl, BinOpKind, Block, Declaration, Expr, FuncDef, Program, Stmt, UnaryOpKind, VarDecl,
};

use super::{Symbol, SymbolTable, Ty};

/// Walks the whole tree once and accumulates every violation; nothing stops
/// the walk early. Scoping is two-level: the global table lives for the
/// whole pass, and one local table exists while a single function body is
/// being analyzed.
pub struct SemanticVisitor {
    globals: SymbolTable,
    locals: Option<SymbolTable>,
    errors: Vec<String>,
}

impl SemanticVisitor {
    pub fn new() -> Self {
        Self {
            globals: SymbolTable::new(),
            locals: None,
            errors: vec![],
        }
    }

    pub fn analyze(&mut self, program: &Program) -> Result<(), CompileError> {
        for declaration in &program.declarations {
            self.visit_declaration(declaration);
        }

        for func_def in &program.functions {
            self.visit_func_def(func_def);
        }

        self.visit_block(&program.body);

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CompileError::Semantic(std::mem::take(&mut self.errors)))
        }
    }

    fn visit_declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Var(VarDecl { name, ty, line }) => {
                if let Err(msg) = self.globals.declare(name, *ty, *line) {
                    self.errors.push(msg);
                }
            }
            Declaration::Array(ArrayDecl {
                name,
                size,
                ty,
                line,
            }) => {
                if *size <= 0 {
                    self.errors.push(format!(
                        "the size of array '{}' must be a positive integer",
                        name
                    ));
                    return;
                }
                if let Err(msg) = self.globals.declare(name, *ty, *line) {
                    self.errors.push(msg);
                }
            }
        }
    }

    /// Parameters are seeded first, then locals; every collision inside the
    /// function scope is recorded and analysis of the body still runs.
    fn visit_func_def(&mut self, func_def: &FuncDef) {
        let mut scope = SymbolTable::new();

        for param in &func_def.params {
            if let Err(msg) = scope.declare(&param.name, param.ty, param.line) {
                self.errors
                    .push(format!("in function '{}': {}", func_def.name, msg));
            }
        }

        for local in &func_def.locals {
            if scope.contains(&local.name) {
                self.errors.push(format!(
                    "in function '{}': local variable '{}' is already declared as a parameter or local",
                    func_def.name, local.name
                ));
                continue;
            }
            if let Err(msg) = scope.declare(&local.name, local.ty, local.line) {
                self.errors
                    .push(format!("in function '{}': {}", func_def.name, msg));
            }
        }

        self.locals = Some(scope);
        self.visit_block(&func_def.body);
        self.locals = None;
    }

    fn visit_block(&mut self, block: &Block) {
        for stmt in &block.0 {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(name, value) => self.visit_assign(name, value),
            Stmt::ArrayAssign(name, index, value) => self.visit_array_assign(name, index, value),
            Stmt::If(condition, then_block, else_block) => {
                self.expr_type(condition);
                self.visit_block(then_block);
                if let Some(else_block) = else_block {
                    self.visit_block(else_block);
                }
            }
            Stmt::While(condition, body) => {
                self.expr_type(condition);
                self.visit_block(body);
            }
            Stmt::For(_, from, to, body) => self.visit_for(from, to, body),
            Stmt::Switch(scrutinee, cases, default) => {
                self.expr_type(scrutinee);
                for case in cases {
                    self.visit_block(&case.body);
                }
                if let Some(default) = default {
                    self.visit_block(default);
                }
            }
            Stmt::Print(expressions) => {
                for expr in expressions {
                    self.expr_type(expr);
                }
            }
            Stmt::Read(name) => {
                if self.lookup(name).is_none() {
                    self.errors.push(format!(
                        "variable '{}' is not declared; LIRE needs a declared target",
                        name
                    ));
                }
            }
            Stmt::Return(value) => {
                self.expr_type(value);
            }
            Stmt::Call(_, args) => {
                for arg in args {
                    self.expr_type(arg);
                }
            }
        }
    }

    fn visit_assign(&mut self, name: &str, value: &Expr) {
        let target = self.lookup(name).map(|s| s.ty);
        if target.is_none() {
            self.errors.push(format!(
                "variable '{}' is not declared; declare it in the VARIABLES section or as a parameter",
                name
            ));
        }

        let value_ty = self.expr_type(value);

        // Assignment never promotes: the value type must match the declared
        // type exactly when both are known.
        if let (Some(target), Some(value_ty)) = (target, value_ty) {
            if target != value_ty {
                self.errors.push(format!(
                    "cannot assign a value of type {} to '{}' of type {}",
                    value_ty, name, target
                ));
            }
        }
    }

    fn visit_array_assign(&mut self, name: &str, index: &Expr, value: &Expr) {
        let target = self.lookup(name).map(|s| s.ty);
        if target.is_none() {
            self.errors.push(format!(
                "variable '{}' is not declared; declare it in the VARIABLES section or as a parameter",
                name
            ));
        }

        self.expr_type(index);
        let value_ty = self.expr_type(value);

        if let (Some(target), Some(value_ty)) = (target, value_ty) {
            if target != value_ty {
                self.errors.push(format!(
                    "cannot assign a value of type {} to '{}' of type {}",
                    value_ty, name, target
                ));
            }
        }
    }

    fn visit_for(&mut self, from: &Expr, to: &Expr, body: &Block) {
        let from_ty = self.expr_type(from);
        let to_ty = self.expr_type(to);

        if let Some(ty) = from_ty {
            if !ty.is_numeric() {
                self.errors.push(format!(
                    "the POUR loop requires a numeric start expression (ENTIER or REEL), found {}",
                    ty
                ));
            }
        }
        if let Some(ty) = to_ty {
            if !ty.is_numeric() {
                self.errors.push(format!(
                    "the POUR loop requires a numeric end expression (ENTIER or REEL), found {}",
                    ty
                ));
            }
        }

        self.visit_block(body);
    }

    /// Determines an expression's type, recording every violation found on
    /// the way. `None` means unknown; unknown operands are never reported a
    /// second time by their parent expression.
    fn expr_type(&mut self, expr: &Expr) -> Option<Ty> {
        match expr {
            Expr::Num(_) => Some(Ty::Entier),
            Expr::Real(_) => Some(Ty::Reel),
            Expr::Str(_) => Some(Ty::Texte),
            Expr::Bool(_) => Some(Ty::Booleen),
            Expr::Ident(name) => self.resolve_var(name),
            Expr::ArrayAccess(name, index) => {
                let element = self.resolve_var(name);
                self.expr_type(index);
                element
            }
            Expr::Call(_, args) => {
                // Call results stay untyped: signatures are not tracked.
                for arg in args {
                    self.expr_type(arg);
                }
                None
            }
            Expr::Unary(UnaryOpKind::Not, operand) => {
                self.expr_type(operand);
                Some(Ty::Booleen)
            }
            Expr::Binary(op, left, right) => self.binary_type(*op, left, right),
        }
    }

    fn binary_type(&mut self, op: BinOpKind, left: &Expr, right: &Expr) -> Option<Ty> {
        let left_ty = self.expr_type(left);
        let right_ty = self.expr_type(right);

        if op.is_arithmetic() {
            self.check_numeric_operand(op, left_ty, "left");
            self.check_numeric_operand(op, right_ty, "right");
            if left_ty == Some(Ty::Reel) || right_ty == Some(Ty::Reel) {
                return Some(Ty::Reel);
            }
            return Some(Ty::Entier);
        }

        if op.is_ordering() {
            self.check_numeric_operand(op, left_ty, "left");
            self.check_numeric_operand(op, right_ty, "right");
            return Some(Ty::Booleen);
        }

        if op.is_equality() {
            if let (Some(left_ty), Some(right_ty)) = (left_ty, right_ty) {
                if left_ty != right_ty {
                    self.errors.push(format!(
                        "operator '{}' compares incompatible types {} and {}",
                        op.source_op(),
                        left_ty,
                        right_ty
                    ));
                }
            }
            return Some(Ty::Booleen);
        }

        // ET / OU: operands unconstrained.
        Some(Ty::Booleen)
    }

    fn check_numeric_operand(&mut self, op: BinOpKind, ty: Option<Ty>, side: &str) {
        if let Some(ty) = ty {
            if !ty.is_numeric() {
                self.errors.push(format!(
                    "operator '{}' requires numeric operands (ENTIER or REEL), but the {} operand is {}",
                    op.source_op(),
                    side,
                    ty
                ));
            }
        }
    }

    /// Resolves an identifier, local scope first, recording an error when
    /// it is nowhere declared.
    fn resolve_var(&mut self, name: &str) -> Option<Ty> {
        if let Some(ty) = self.lookup(name).map(|s| s.ty) {
            return Some(ty);
        }
        self.errors.push(format!(
            "variable '{}' is not declared; declare it in the VARIABLES section or as a parameter",
            name
        ));
        None
    }

    fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.locals
            .as_ref()
            .and_then(|scope| scope.get(name))
            .or_else(|| self.globals.get(name))
    }
}

impl Default for SemanticVisitor {
    fn default() -> Self {
        Self::new()
    }
}
