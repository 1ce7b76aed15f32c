//! Tree-walking evaluator for transaction scripts

use crate::script::parser::{parse, BinOp, Expr, ParseError, Stmt};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

/// Script execution errors
///
/// These never escape a transaction: the engine swallows them and the
/// transaction output stays null.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("undefined name '{0}'")]
    Undefined(String),
    #[error("unsupported operand types for {op}: {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("bad operand type for unary -: {0}")]
    BadUnaryOperand(&'static str),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
}

/// A value a script can compute
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Type label used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Int(n) => JsonValue::from(*n),
            Value::Float(x) => serde_json::Number::from_f64(*x)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Str(s) => JsonValue::String(s.clone()),
        }
    }
}

/// Variable scope shared between the scripts of one transaction
pub type Scope = HashMap<String, Value>;

/// Execute a script against a scope
///
/// The script is parsed in full first: a syntax error runs nothing.
/// Statements then execute in order until the first runtime error, whose
/// predecessors' bindings remain in the scope.
pub fn run_script(source: &str, scope: &mut Scope) -> Result<(), ScriptError> {
    let program = parse(source)?;

    for statement in program {
        match statement {
            Stmt::Assign { name, value } => {
                let value = eval(&value, scope)?;
                scope.insert(name, value);
            }
            Stmt::Expr(expr) => {
                eval(&expr, scope)?;
            }
        }
    }

    Ok(())
}

fn eval(expr: &Expr, scope: &Scope) -> Result<Value, ScriptError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Var(name) => scope
            .get(name)
            .cloned()
            .ok_or_else(|| ScriptError::Undefined(name.clone())),
        Expr::Neg(inner) => match eval(inner, scope)? {
            Value::Int(n) => n.checked_neg().map(Value::Int).ok_or(ScriptError::Overflow),
            Value::Float(x) => Ok(Value::Float(-x)),
            value => Err(ScriptError::BadUnaryOperand(value.type_name())),
        },
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs, scope)?;
            let rhs = eval(rhs, scope)?;
            apply(*op, lhs, rhs)
        }
    }
}

fn apply(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ScriptError> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) if op == BinOp::Add => Ok(Value::Str(a + &b)),
        (Value::Int(a), Value::Int(b)) => apply_int(op, a, b),
        (Value::Int(a), Value::Float(b)) => apply_float(op, a as f64, b),
        (Value::Float(a), Value::Int(b)) => apply_float(op, a, b as f64),
        (Value::Float(a), Value::Float(b)) => apply_float(op, a, b),
        (lhs, rhs) => Err(ScriptError::TypeMismatch {
            op: op.symbol(),
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }),
    }
}

fn apply_int(op: BinOp, a: i64, b: i64) -> Result<Value, ScriptError> {
    match op {
        BinOp::Add => a.checked_add(b).map(Value::Int).ok_or(ScriptError::Overflow),
        BinOp::Sub => a.checked_sub(b).map(Value::Int).ok_or(ScriptError::Overflow),
        BinOp::Mul => a.checked_mul(b).map(Value::Int).ok_or(ScriptError::Overflow),
        // `/` is true division and always yields a float
        BinOp::Div => apply_float(op, a as f64, b as f64),
        BinOp::Rem => {
            if b == 0 {
                return Err(ScriptError::DivisionByZero);
            }
            a.checked_rem(b).map(Value::Int).ok_or(ScriptError::Overflow)
        }
    }
}

fn apply_float(op: BinOp, a: f64, b: f64) -> Result<Value, ScriptError> {
    match op {
        BinOp::Add => Ok(Value::Float(a + b)),
        BinOp::Sub => Ok(Value::Float(a - b)),
        BinOp::Mul => Ok(Value::Float(a * b)),
        BinOp::Div | BinOp::Rem if b == 0.0 => Err(ScriptError::DivisionByZero),
        BinOp::Div => Ok(Value::Float(a / b)),
        BinOp::Rem => Ok(Value::Float(a % b)),
    }
}
