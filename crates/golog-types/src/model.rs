use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type ActionName = String;
pub type VarName = String;

/// Call arguments as written in the program; evaluated against the state at dispatch.
pub type ArgExprs = IndexMap<String, Expr>;

/// A program node. The tree is owned exclusively by whoever is stepping it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Program {
    Block(ProgramBlock),
    If(ProgramIf),
    Test(ProgramTest),
    Call(ActionCall),
    Bind(VarBind),
    Control(Control),
    /// Scheduler sentinel: the thread in this slot has finished.
    Done,
    /// Scheduler sentinel: the thread in this slot has an action in flight.
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgramBlock {
    #[serde(default)]
    pub statements: Vec<Program>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramIf {
    pub test: Expr,
    pub consequent: Box<Program>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate: Option<Box<Program>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramTest {
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCall {
    pub name: ActionName,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub args: ArgExprs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarBind {
    pub var: VarName,
    pub init: Box<Program>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub kind: ControlKind,
    pub branches: Vec<Program>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Or,
    Conc,
    Either,
    Plan,
}

impl ControlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlKind::Or => "or",
            ControlKind::Conc => "conc",
            ControlKind::Either => "either",
            ControlKind::Plan => "plan",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Program {
    /// Node kind used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Program::Block(_) => "block",
            Program::If(_) => "if",
            Program::Test(_) => "test",
            Program::Call(_) => "call",
            Program::Bind(_) => "bind",
            Program::Control(control) => control.kind.as_str(),
            Program::Done => "done",
            Program::Blocked => "blocked",
        }
    }

    pub fn block(statements: impl IntoIterator<Item = Program>) -> Self {
        Program::Block(ProgramBlock {
            statements: statements.into_iter().collect(),
        })
    }

    pub fn if_then(test: Expr, consequent: Program) -> Self {
        Program::If(ProgramIf {
            test,
            consequent: Box::new(consequent),
            alternate: None,
        })
    }

    pub fn if_else(test: Expr, consequent: Program, alternate: Program) -> Self {
        Program::If(ProgramIf {
            test,
            consequent: Box::new(consequent),
            alternate: Some(Box::new(alternate)),
        })
    }

    pub fn test(expr: Expr) -> Self {
        Program::Test(ProgramTest { expr })
    }

    pub fn call(
        name: impl Into<String>,
        args: impl IntoIterator<Item = (impl Into<String>, Expr)>,
    ) -> Self {
        Program::Call(ActionCall {
            name: name.into(),
            args: args.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    pub fn bind(var: impl Into<String>, init: Program) -> Self {
        Program::Bind(VarBind {
            var: var.into(),
            init: Box::new(init),
        })
    }

    pub fn control(kind: ControlKind, branches: impl IntoIterator<Item = Program>) -> Self {
        Program::Control(Control {
            kind,
            branches: branches.into_iter().collect(),
        })
    }

    pub fn or(branches: impl IntoIterator<Item = Program>) -> Self {
        Self::control(ControlKind::Or, branches)
    }

    pub fn conc(branches: impl IntoIterator<Item = Program>) -> Self {
        Self::control(ControlKind::Conc, branches)
    }

    pub fn either(branches: impl IntoIterator<Item = Program>) -> Self {
        Self::control(ControlKind::Either, branches)
    }

    pub fn plan(body: Program) -> Self {
        Self::control(ControlKind::Plan, [body])
    }
}

/// Value expression. Pure: evaluation only reads state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expr {
    Ref(ExprRef),
    Const(ExprConst),
    Op(ExprOp),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprRef {
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprConst {
    #[serde(rename = "const")]
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprOp {
    pub op: ExprOpCode,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprOpCode {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ExprOpCode {
    pub fn symbol(&self) -> &'static str {
        match self {
            ExprOpCode::Eq => "==",
            ExprOpCode::Ne => "!=",
            ExprOpCode::Lt => "<",
            ExprOpCode::Le => "<=",
            ExprOpCode::Gt => ">",
            ExprOpCode::Ge => ">=",
            ExprOpCode::And => "&&",
            ExprOpCode::Or => "||",
            ExprOpCode::Add => "+",
            ExprOpCode::Sub => "-",
            ExprOpCode::Mul => "*",
            ExprOpCode::Div => "/",
            ExprOpCode::Mod => "%",
        }
    }
}

impl Expr {
    pub fn reference(name: impl Into<String>) -> Self {
        Expr::Ref(ExprRef {
            reference: name.into(),
        })
    }

    pub fn lit(value: impl Into<Literal>) -> Self {
        Expr::Const(ExprConst {
            value: value.into(),
        })
    }

    pub fn binary(op: ExprOpCode, left: Expr, right: Expr) -> Self {
        Expr::Op(ExprOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary(ExprOpCode::Eq, left, right)
    }

    pub fn ne(left: Expr, right: Expr) -> Self {
        Self::binary(ExprOpCode::Ne, left, right)
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::binary(ExprOpCode::And, left, right)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ref(r) => f.write_str(&r.reference),
            Expr::Const(c) => write!(f, "{}", c.value),
            Expr::Op(op) => write!(f, "({} {} {})", op.left, op.op.symbol(), op.right),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value.into())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}
