use crate::analyzer::Ty;

use super::Expr;

/// Root of the tree: one named algorithm with its global declarations,
/// function definitions and main body.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub name: String,
    pub declarations: Vec<Declaration>,
    pub functions: Vec<FuncDef>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    Var(VarDecl),
    Array(ArrayDecl),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: Ty,
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayDecl {
    pub name: String,
    pub size: i64,
    pub ty: Ty,
    pub line: usize,
}

/// A function (`FONCTION`, with an optional return type) or a procedure
/// (`PROCEDURE`, never returns a value). Locals are the declarations at the
/// top of the body.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDef {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<Ty>,
    pub locals: Vec<VarDecl>,
    pub body: Block,
    pub is_procedure: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block(pub Vec<Stmt>);

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Assign(String, Expr),
    ArrayAssign(String, Expr, Expr),
    If(Expr, Block, Option<Block>),
    While(Expr, Block),
    For(String, Expr, Expr, Block),
    Switch(Expr, Vec<Case>, Option<Block>),
    Print(Vec<Expr>),
    Read(String),
    Return(Expr),
    /// Standalone call whose result is discarded.
    Call(String, Vec<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Case {
    pub value: i64,
    pub body: Block,
}
