//! AST for formula expressions and scripts.

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal.
    Number(f64),

    /// A string literal.
    Str(String),

    /// A boolean literal.
    Bool(bool),

    /// The `null` literal.
    Null,

    /// A variable reference.
    Var(String),

    /// A function call, e.g. `date('+ 7 days')`.
    Call { name: String, args: Vec<Expr> },

    /// A property access, e.g. `item.title`.
    Property { target: Box<Expr>, name: String },

    /// An index access, e.g. `labels[0]`.
    Index { target: Box<Expr>, index: Box<Expr> },

    /// A unary operation.
    Unary { op: UnaryOp, expr: Box<Expr> },

    /// A binary operation.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// A conditional, e.g. `count > 5 ? 'red' : 'green'`.
    Ternary {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },

    /// An object literal, e.g. `{ value: total, color: 'red' }`.
    Object(Vec<(String, Expr)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-`).
    Neg,
    /// Logical negation (`!`).
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// The target of an assignment: a root variable plus a property path,
/// e.g. `userdata.totals.open`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignTarget {
    pub root: String,
    pub path: Vec<String>,
}

/// A statement in a setup or shutdown script.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// An assignment through a variable path.
    Assign { target: AssignTarget, value: Expr },

    /// A bare expression, evaluated for its value.
    Expr(Expr),
}

/// A parsed script: a sequence of semicolon-separated statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub statements: Vec<Stmt>,
}
