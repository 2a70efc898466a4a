//! Everything that can appear to the left of `(…)`: user functions (closures
//! and bound methods), classes, and native built‑ins.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::ast::FunctionDecl;
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::interpreter::{Interpreter, Unwind};
use crate::token::Token;
use crate::value::Value;

/// Number of arguments a callable accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }

    /// The runtime error message for a call with `count` arguments.
    pub fn mismatch(self, count: usize) -> String {
        match self {
            Arity::Fixed(n) => format!("Expected {} arguments but got {}.", n, count),
            Arity::AtLeast(n) => format!("Expected at least {} arguments but got {}.", n, count),
        }
    }
}

pub trait Callable: fmt::Debug + fmt::Display {
    fn arity(&self) -> Arity;

    /// Invoke with already-checked arguments.  `site` is the call's closing
    /// paren, used to locate errors raised inside natives.
    fn call(
        self: Rc<Self>,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        site: &Token,
    ) -> Result<Value>;
}

// ─────────────────────────────────────────────────────────────────────────────
// User functions
// ─────────────────────────────────────────────────────────────────────────────

/// A function value: declaration plus the environment captured where it was
/// defined.
#[derive(Debug)]
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(
        declaration: Rc<FunctionDecl>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// A copy of this method whose closure has an extra innermost scope
    /// binding `this` to `instance`.
    pub fn bind(&self, instance: Rc<LoxInstance>) -> LoxFunction {
        let mut env = Environment::with_enclosing(Rc::clone(&self.closure));
        env.define("this", Value::Instance(instance));

        LoxFunction {
            declaration: Rc::clone(&self.declaration),
            closure: Rc::new(RefCell::new(env)),
            is_initializer: self.is_initializer,
        }
    }

    fn bound_this(&self) -> Result<Value> {
        Environment::get_at(&self.closure, 0, "this")
    }
}

impl Callable for LoxFunction {
    fn arity(&self) -> Arity {
        Arity::Fixed(self.declaration.params.len())
    }

    fn call(
        self: Rc<Self>,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        _site: &Token,
    ) -> Result<Value> {
        debug!("Calling user-defined function '{}'", self.name());

        let mut env = Environment::with_enclosing(Rc::clone(&self.closure));
        for (param, arg) in self.declaration.params.iter().zip(arguments) {
            env.define(&param.lexeme, arg);
        }

        let outcome = interpreter.execute_block(&self.declaration.body, Rc::new(RefCell::new(env)));

        let value = match outcome {
            Ok(()) => Value::Nil,
            Err(Unwind::Return(value)) => value,
            Err(Unwind::Error(e)) => return Err(e),
            Err(Unwind::Break(_)) | Err(Unwind::Continue(_)) => {
                return Err(LoxError::internal(format!(
                    "loop control escaped function '{}'",
                    self.name()
                )))
            }
        };

        if self.is_initializer {
            return self.bound_this();
        }

        Ok(value)
    }
}

impl fmt::Display for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classes and instances
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct LoxClass {
    pub name: String,
    methods: HashMap<String, Rc<LoxFunction>>,
}

impl LoxClass {
    pub fn new(name: String, methods: HashMap<String, Rc<LoxFunction>>) -> Self {
        Self { name, methods }
    }

    pub fn find_method(&self, name: &str) -> Option<&Rc<LoxFunction>> {
        self.methods.get(name)
    }
}

impl Callable for LoxClass {
    /// Arity of `init`, or zero without one.
    fn arity(&self) -> Arity {
        self.find_method("init")
            .map(|init| init.arity())
            .unwrap_or(Arity::Fixed(0))
    }

    fn call(
        self: Rc<Self>,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        site: &Token,
    ) -> Result<Value> {
        debug!("Constructing instance of '{}'", self.name);

        let instance = Rc::new(LoxInstance::new(Rc::clone(&self)));

        if let Some(init) = self.find_method("init") {
            Rc::new(init.bind(Rc::clone(&instance))).call(interpreter, arguments, site)?;
        }

        Ok(Value::Instance(instance))
    }
}

impl fmt::Display for LoxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An object created by calling a class.  Instances carry no fields; every
/// property access goes through the class's methods.
#[derive(Debug)]
pub struct LoxInstance {
    class: Rc<LoxClass>,
}

impl LoxInstance {
    pub fn new(class: Rc<LoxClass>) -> Self {
        Self { class }
    }

    /// `instance.name` → the method bound to this instance.
    pub fn get(self: &Rc<Self>, name: &Token) -> Result<Value> {
        match self.class.find_method(&name.lexeme) {
            Some(method) => Ok(Value::Callable(Rc::new(method.bind(Rc::clone(self))))),
            None => Err(LoxError::runtime(
                name,
                format!("Undefined property '{}'.", name.lexeme),
            )),
        }
    }
}

impl fmt::Display for LoxInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.class.name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Natives
// ─────────────────────────────────────────────────────────────────────────────

pub type NativeFn = fn(&[Value]) -> std::result::Result<Value, String>;

/// A host function exposed in the global scope.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: Arity,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl Callable for NativeFunction {
    fn arity(&self) -> Arity {
        self.arity
    }

    fn call(
        self: Rc<Self>,
        _interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        site: &Token,
    ) -> Result<Value> {
        debug!("Calling native function '{}'", self.name);
        (self.func)(&arguments).map_err(|msg| LoxError::runtime(site, msg))
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
