//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::callable::{Callable, LoxInstance};

/// Numeric payload.  Integer literals stay `Int` until they take part in
/// arithmetic, which always produces a `Float`.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(n) => n,
        }
    }
}

impl PartialEq for Number {
    /// Mathematical equality; an `Int` is widened when compared with a `Float`.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),

            // Shortest representation that round-trips; integral floats
            // print without a trailing `.0`.
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

/// The runtime-typed universe of golox.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(Number),
    String(Rc<str>),
    Callable(Rc<dyn Callable>),
    Instance(Rc<LoxInstance>),
    Array(Rc<RefCell<Vec<Value>>>),
}

impl Value {
    pub fn int(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }

    pub fn float(n: f64) -> Self {
        Value::Number(Number::Float(n))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// `nil` and `false` are falsey; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// Name of the value's kind, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Callable(_) => "callable",
            Value::Instance(_) => "instance",
            Value::Array(_) => "array",
        }
    }
}

impl PartialEq for Value {
    /// Same kind and equal payload.  Reference kinds compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Number(n) => write!(f, "{}", n),

            Value::String(s) => write!(f, "{}", s),

            Value::Callable(c) => write!(f, "{}", c),

            Value::Instance(i) => write!(f, "{}", i),

            Value::Array(items) => write_array(f, items, &mut Vec::new()),
        }
    }
}

/// Arrays already being printed further up are shown as `[...]`, so an
/// array that contains itself prints finitely.
fn write_array(
    f: &mut fmt::Formatter<'_>,
    items: &Rc<RefCell<Vec<Value>>>,
    open: &mut Vec<*const RefCell<Vec<Value>>>,
) -> fmt::Result {
    let ptr = Rc::as_ptr(items);
    if open.contains(&ptr) {
        return write!(f, "[...]");
    }

    open.push(ptr);
    write!(f, "[")?;
    for (i, item) in items.borrow().iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        match item {
            Value::Array(inner) => write_array(f, inner, open)?,
            other => write!(f, "{}", other)?,
        }
    }
    open.pop();
    write!(f, "]")
}
