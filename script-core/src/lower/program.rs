use crate::parser::prelude::{ArrayFn, DebugFn, MathFn, TextFn, VarType};

/// The lowered form of a parsed program: a flat list of operations with all
/// source locations and surface syntax stripped. Compiling the same source
/// twice yields structurally equal programs.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableProgram {
    pub ops: Vec<Op>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Declare {
        var_type: VarType,
        name: String,
        value: Option<Expr>,
    },
    Assign {
        name: String,
        value: Expr,
    },
    Print(Expr),
    If {
        condition: Expr,
        consequence: Vec<Op>,
        alternative: Option<Vec<Op>>,
    },
    For {
        init: (String, Expr),
        condition: Expr,
        increment: (String, Expr),
        body: Vec<Op>,
    },
    While {
        condition: Expr,
        body: Vec<Op>,
    },
    /// An expression evaluated for its effect, result discarded.
    Expr(Expr),
}

/// Binary operators are split by family so the evaluator can route only
/// arithmetic through the checked-arithmetic path. Comparison and logic
/// never raise `DivisionByZero`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl std::fmt::Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithOp::Add => write!(f, "+"),
            ArithOp::Sub => write!(f, "-"),
            ArithOp::Mul => write!(f, "*"),
            ArithOp::Div => write!(f, "/"),
            ArithOp::Mod => write!(f, "%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareOp::Equal => write!(f, "=="),
            CompareOp::NotEqual => write!(f, "!="),
            CompareOp::LessThan => write!(f, "<"),
            CompareOp::LessThanOrEqual => write!(f, "<="),
            CompareOp::GreaterThan => write!(f, ">"),
            CompareOp::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    Var(String),
    Neg(Box<Expr>),
    Arith {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logic {
        op: LogicOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Input {
        prompt: Option<String>,
    },
    Math {
        function: MathFn,
        arguments: Vec<Expr>,
    },
    Text {
        function: TextFn,
        arguments: Vec<Expr>,
    },
    Debug {
        function: DebugFn,
        arguments: Vec<Expr>,
    },
    ArrayLit(Vec<Expr>),
    Array {
        function: ArrayFn,
        array: String,
        argument: Option<Box<Expr>>,
    },
}
