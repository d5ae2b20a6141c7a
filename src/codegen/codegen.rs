use std::collections::HashMap;

use crate::analyzer::Ty;
use crate::parser::{ArrayDecl, Block, Case, Declaration, Expr, FuncDef, Program, Stmt, VarDecl};

const INDENT: &str = "    ";

/// Renders a validated tree as a flat Python script: array initializers,
/// then function definitions, then the main body. The traversal is a single
/// deterministic top-down pass; all state is reset at the start of each
/// `generate` call, so regenerating from the same tree is byte-identical.
pub struct Codegen {
    out: String,
    indent: usize,
    var_types: HashMap<String, Ty>,
}

impl Codegen {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
            var_types: HashMap::new(),
        }
    }

    pub fn generate(&mut self, program: &Program) -> String {
        self.out.clear();
        self.indent = 0;
        self.var_types.clear();

        for declaration in &program.declarations {
            match declaration {
                Declaration::Var(VarDecl { name, ty, .. }) => {
                    self.var_types.insert(name.clone(), *ty);
                }
                Declaration::Array(ArrayDecl { name, size, .. }) => {
                    self.push_line(&format!("{} = [0] * {}", name, size));
                }
            }
        }

        for func_def in &program.functions {
            self.gen_func_def(func_def);
        }

        self.gen_block(&program.body);

        std::mem::take(&mut self.out)
    }

    fn push_line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn gen_func_def(&mut self, func_def: &FuncDef) {
        let params = func_def
            .params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.push_line(&format!("def {}({}):", func_def.name, params));

        // Parameters and locals shadow globals for LIRE coercion while the
        // body is being generated.
        let mut shadowed = vec![];
        for param in &func_def.params {
            shadowed.push((param.name.clone(), self.var_types.get(&param.name).copied()));
            self.var_types.insert(param.name.clone(), param.ty);
        }
        for local in &func_def.locals {
            shadowed.push((local.name.clone(), self.var_types.get(&local.name).copied()));
            self.var_types.insert(local.name.clone(), local.ty);
        }

        self.indent += 1;
        for local in &func_def.locals {
            self.push_line(&format!("{} = {}", local.name, local.ty.zero_literal()));
        }
        if func_def.body.0.is_empty() {
            self.push_line("pass");
        } else {
            self.gen_block(&func_def.body);
        }
        self.indent -= 1;

        self.out.push('\n');

        for (name, previous) in shadowed.into_iter().rev() {
            match previous {
                Some(ty) => self.var_types.insert(name, ty),
                None => self.var_types.remove(&name),
            };
        }
    }

    fn gen_block(&mut self, block: &Block) {
        for stmt in &block.0 {
            self.gen_stmt(stmt);
        }
    }

    /// Emits a statement body, falling back to `pass` when it is empty.
    fn gen_body(&mut self, block: &Block) {
        self.indent += 1;
        if block.0.is_empty() {
            self.push_line("pass");
        } else {
            self.gen_block(block);
        }
        self.indent -= 1;
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(name, value) => {
                let value = self.gen_expr(value);
                self.push_line(&format!("{} = {}", name, value));
            }
            Stmt::ArrayAssign(name, index, value) => {
                let index = self.gen_expr(index);
                let value = self.gen_expr(value);
                self.push_line(&format!("{}[{}] = {}", name, index, value));
            }
            Stmt::Call(name, args) => {
                let call = self.gen_call(name, args);
                self.push_line(&call);
            }
            Stmt::If(condition, then_block, else_block) => {
                let condition = self.gen_expr(condition);
                self.push_line(&format!("if {}:", condition));
                self.gen_body(then_block);
                if let Some(else_block) = else_block {
                    self.push_line("else:");
                    self.gen_body(else_block);
                }
            }
            Stmt::While(condition, body) => {
                let condition = self.gen_expr(condition);
                self.push_line(&format!("while {}:", condition));
                self.gen_body(body);
            }
            Stmt::For(var, from, to, body) => {
                let from = self.gen_expr(from);
                let to = self.gen_expr(to);
                // Both bounds inclusive, step +1; an empty range is fine.
                self.push_line(&format!("for {} in range({}, {} + 1):", var, from, to));
                self.gen_body(body);
            }
            Stmt::Switch(scrutinee, cases, default) => self.gen_switch(scrutinee, cases, default),
            Stmt::Print(expressions) => {
                let args = expressions
                    .iter()
                    .map(|e| self.gen_expr(e))
                    .collect::<Vec<_>>()
                    .join(", ");
                self.push_line(&format!("print({})", args));
            }
            Stmt::Read(name) => {
                let input = match self.var_types.get(name) {
                    Some(Ty::Entier) => "int(input())",
                    Some(Ty::Reel) => "float(input())",
                    _ => "input()",
                };
                self.push_line(&format!("{} = {}", name, input));
            }
            Stmt::Return(value) => {
                let value = self.gen_expr(value);
                self.push_line(&format!("return {}", value));
            }
        }
    }

    /// The scrutinee is rendered once and compared against each case value
    /// in order; the default branch closes the chain.
    fn gen_switch(&mut self, scrutinee: &Expr, cases: &[Case], default: &Option<Block>) {
        let scrutinee = self.gen_expr(scrutinee);

        for (i, case) in cases.iter().enumerate() {
            let keyword = if i == 0 { "if" } else { "elif" };
            self.push_line(&format!("{} {} == {}:", keyword, scrutinee, case.value));
            self.gen_body(&case.body);
        }

        if let Some(default) = default {
            self.push_line("else:");
            self.gen_body(default);
        }
    }

    fn gen_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Num(value) => value.to_string(),
            // `{:?}` keeps the decimal point on whole reals (2.0, not 2).
            Expr::Real(value) => format!("{:?}", value),
            Expr::Str(value) => format!("\"{}\"", value.replace('"', "\\\"")),
            Expr::Bool(true) => "True".to_string(),
            Expr::Bool(false) => "False".to_string(),
            Expr::Ident(name) => name.clone(),
            Expr::ArrayAccess(name, index) => {
                format!("{}[{}]", name, self.gen_expr(index))
            }
            Expr::Call(name, args) => self.gen_call(name, args),
            Expr::Binary(op, left, right) => {
                // Always parenthesized: evaluation order stays unambiguous
                // without re-deriving precedence on the Python side.
                format!(
                    "({} {} {})",
                    self.gen_expr(left),
                    op.python_op(),
                    self.gen_expr(right)
                )
            }
            Expr::Unary(op, operand) => {
                format!("({} {})", op.python_op(), self.gen_expr(operand))
            }
        }
    }

    fn gen_call(&mut self, name: &str, args: &[Expr]) -> String {
        let args = args
            .iter()
            .map(|a| self.gen_expr(a))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", name, args)
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}
