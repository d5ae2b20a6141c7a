/// Expression tree. Operator identity is fixed here, once, by the parser;
/// later stages match on the enums and never re-read operator text.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(i64),
    Real(f64),
    Str(String),
    Bool(bool),
    Ident(String),
    ArrayAccess(String, Box<Expr>),
    Call(String, Vec<Expr>),
    Binary(BinOpKind, Box<Expr>, Box<Expr>),
    Unary(UnaryOpKind, Box<Expr>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

impl BinOpKind {
    /// Source spelling, used in diagnostics.
    pub fn source_op(self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Mod => "%",
            BinOpKind::GreaterThan => ">",
            BinOpKind::LessThan => "<",
            BinOpKind::GreaterEqual => ">=",
            BinOpKind::LessEqual => "<=",
            BinOpKind::Equal => "==",
            BinOpKind::NotEqual => "!=",
            BinOpKind::And => "ET",
            BinOpKind::Or => "OU",
        }
    }

    /// Python spelling. Only the keyword operators change surface.
    pub fn python_op(self) -> &'static str {
        match self {
            BinOpKind::And => "and",
            BinOpKind::Or => "or",
            other => other.source_op(),
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOpKind::Add | BinOpKind::Sub | BinOpKind::Mul | BinOpKind::Div | BinOpKind::Mod
        )
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinOpKind::GreaterThan
                | BinOpKind::LessThan
                | BinOpKind::GreaterEqual
                | BinOpKind::LessEqual
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinOpKind::Equal | BinOpKind::NotEqual)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOpKind {
    Not,
}

impl UnaryOpKind {
    pub fn python_op(self) -> &'static str {
        match self {
            UnaryOpKind::Not => "not",
        }
    }
}
