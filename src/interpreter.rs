//! Tree‑walking evaluator.
//!
//! Statements return `Result<(), Unwind>`, where [`Unwind`] is either a real
//! error or one of the non‑local control signals `return`, `break` and
//! `continue`.  Expressions return `Result<Value, LoxError>`: a signal can
//! never surface from an expression because function calls consume `return`
//! at their boundary.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, ExprId, LiteralValue, Stmt};
use crate::builtins;
use crate::callable::{LoxClass, LoxFunction};
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::reporter::Reporter;
use crate::token::{Token, TokenType};
use crate::value::{Number, Value};

/// Why statement execution stopped early.
#[derive(Debug)]
pub enum Unwind {
    Error(LoxError),

    /// `return` with its value (`nil` for a bare `return;`).
    Return(Value),

    /// `break`, optionally targeting a labeled loop.
    Break(Option<String>),

    /// `continue`, optionally targeting a labeled loop.
    Continue(Option<String>),
}

impl From<LoxError> for Unwind {
    fn from(e: LoxError) -> Self {
        Unwind::Error(e)
    }
}

/// Convenient alias for statement execution results.
pub type ExecResult = std::result::Result<(), Unwind>;

/// Deepest chain of nested calls before `Stack overflow.` is raised.
pub const MAX_CALL_DEPTH: usize = 1000;

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<ExprId, usize>,
    depth: usize,
    out: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter printing to stdout, with the built‑ins defined.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// An interpreter whose `print` statements write to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));
        builtins::define_all(&mut globals.borrow_mut());

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            depth: 0,
            out,
        }
    }

    /// Record a local binding found by the resolver.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Drop side-table entries for nodes that can never run again.
    pub fn forget(&mut self, ids: &[ExprId]) {
        for id in ids {
            self.locals.remove(id);
        }
    }

    /// Number of resolved local references currently remembered.
    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    /// Run a program.  The first runtime error is reported and ends the run.
    pub fn interpret(&mut self, statements: &[Stmt], reporter: &mut dyn Reporter) {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            let error = match self.execute(stmt) {
                Ok(()) => continue,
                Err(Unwind::Error(e)) => e,
                Err(signal) => LoxError::internal(format!(
                    "control signal escaped to top level: {:?}",
                    signal
                )),
            };

            // A runtime error may leave us inside a nested scope.
            self.environment = Rc::clone(&self.globals);
            self.depth = 0;
            reporter.runtime_error(&error);
            return;
        }

        if let Err(e) = self.out.flush() {
            reporter.runtime_error(&LoxError::from(e));
            return;
        }

        info!("Interpretation completed successfully");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    pub fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value).map_err(LoxError::from)?;
                debug!("Printed value: {}", value);
                Ok(())
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Defining variable '{}' = {}", name.lexeme, value);
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(())
            }

            Stmt::Block(statements) => {
                let env = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, Rc::new(RefCell::new(env)))
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(())
                }
            }

            Stmt::While {
                label,
                condition,
                body,
                increment,
            } => self.execute_while(label.as_ref(), condition, body, increment.as_ref()),

            Stmt::For { initializer, body } => {
                let env = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
                    &self.environment,
                ))));
                let previous = std::mem::replace(&mut self.environment, env);

                let result = match initializer {
                    Some(init) => self.execute(init),
                    None => Ok(()),
                }
                .and_then(|()| self.execute(body));

                self.environment = previous;
                result
            }

            Stmt::Function(decl) => {
                debug!("Defining function '{}'", decl.name.lexeme);
                let function =
                    LoxFunction::new(Rc::clone(decl), Rc::clone(&self.environment), false);
                self.environment
                    .borrow_mut()
                    .define(&decl.name.lexeme, Value::Callable(Rc::new(function)));
                Ok(())
            }

            Stmt::Class { name, methods } => {
                debug!("Defining class '{}'", name.lexeme);
                let methods = methods
                    .iter()
                    .map(|decl| {
                        let function = LoxFunction::new(
                            Rc::clone(decl),
                            Rc::clone(&self.environment),
                            decl.name.lexeme == "init",
                        );
                        (decl.name.lexeme.clone(), Rc::new(function))
                    })
                    .collect();

                let class = LoxClass::new(name.lexeme.clone(), methods);
                self.environment
                    .borrow_mut()
                    .define(&name.lexeme, Value::Callable(Rc::new(class)));
                Ok(())
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(e) => self.evaluate(e)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }

            Stmt::Break { label, .. } => Err(Unwind::Break(label.as_ref().map(|l| l.lexeme.clone()))),

            Stmt::Continue { label, .. } => {
                Err(Unwind::Continue(label.as_ref().map(|l| l.lexeme.clone())))
            }
        }
    }

    fn execute_while(
        &mut self,
        label: Option<&Token>,
        condition: &Expr,
        body: &Stmt,
        increment: Option<&Expr>,
    ) -> ExecResult {
        let own_label: Option<&str> = label.map(|l| l.lexeme.as_str());
        // An unlabeled signal targets the innermost loop; a labeled one only
        // the loop carrying that label.
        let targets_me = |target: &Option<String>| match target {
            None => true,
            Some(t) => Some(t.as_str()) == own_label,
        };

        while self.evaluate(condition)?.is_truthy() {
            match self.execute(body) {
                Ok(()) => {}
                Err(Unwind::Break(target)) if targets_me(&target) => break,
                Err(Unwind::Continue(target)) if targets_me(&target) => {}
                Err(other) => return Err(other),
            }

            if let Some(inc) = increment {
                self.evaluate(inc)?;
            }
        }

        Ok(())
    }

    /// Run `statements` in `env`, restoring the current environment on every
    /// exit path.
    pub fn execute_block(&mut self, statements: &[Stmt], env: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, env);

        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));

        self.environment = previous;
        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::string(s.as_str()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match operator.token_type {
                    TokenType::MINUS => match right.as_number() {
                        Some(n) => Ok(Value::float(-n)),
                        None => Err(LoxError::runtime(operator, "Operand must be a number.")),
                    },
                    TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),
                    _ => Err(LoxError::internal(format!(
                        "invalid unary operator '{}'",
                        operator.lexeme
                    ))),
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary(operator, left, right)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let short_circuits = match operator.token_type {
                    TokenType::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&distance) => Environment::assign_at(
                        &self.environment,
                        distance,
                        &name.lexeme,
                        value.clone(),
                    )?,
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }
                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut args: Vec<Value> = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg)?);
                }

                let Value::Callable(function) = callee else {
                    return Err(LoxError::runtime(
                        paren,
                        "Can only call functions and classes.",
                    ));
                };

                let arity = function.arity();
                if !arity.accepts(args.len()) {
                    return Err(LoxError::runtime(paren, arity.mismatch(args.len())));
                }

                if self.depth >= MAX_CALL_DEPTH {
                    return Err(LoxError::runtime(paren, "Stack overflow."));
                }

                self.depth += 1;
                let result = function.call(self, args, paren);
                self.depth -= 1;
                result
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => instance.get(name),
                _ => Err(LoxError::runtime(name, "Only instances have properties.")),
            },

            Expr::Set { object, name, value } => {
                let object = self.evaluate(object)?;
                if !matches!(object, Value::Instance(_)) {
                    return Err(LoxError::runtime(name, "Only instances have properties."));
                }
                self.evaluate(value)?;
                Err(LoxError::runtime(name, "Instance fields are not supported."))
            }

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, &name.lexeme),
            None => self.globals.borrow().get(name),
        }
    }
}

/// Arithmetic, comparison, equality and the comma operator.
fn binary(operator: &Token, left: Value, right: Value) -> Result<Value> {
    let numbers = || number_operands(operator, &left, &right);

    match operator.token_type {
        TokenType::COMMA => Ok(right.clone()),

        TokenType::EQUAL_EQUAL => Ok(Value::Bool(left == right)),
        TokenType::BANG_EQUAL => Ok(Value::Bool(left != right)),

        TokenType::PLUS => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => {
                Ok(Value::Number(Number::Float(a.as_f64() + b.as_f64())))
            }
            (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{}{}", a, b))),
            _ => Err(LoxError::runtime(
                operator,
                "Operands must be either numbers or strings.",
            )),
        },

        TokenType::MINUS => numbers().map(|(a, b)| Value::float(a - b)),
        TokenType::STAR => numbers().map(|(a, b)| Value::float(a * b)),
        // IEEE semantics: x/0 is ±inf or NaN, never an error.
        TokenType::SLASH => numbers().map(|(a, b)| Value::float(a / b)),

        TokenType::GREATER => numbers().map(|(a, b)| Value::Bool(a > b)),
        TokenType::GREATER_EQUAL => numbers().map(|(a, b)| Value::Bool(a >= b)),
        TokenType::LESS => numbers().map(|(a, b)| Value::Bool(a < b)),
        TokenType::LESS_EQUAL => numbers().map(|(a, b)| Value::Bool(a <= b)),

        _ => Err(LoxError::internal(format!(
            "invalid binary operator '{}'",
            operator.lexeme
        ))),
    }
}

fn number_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64)> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(LoxError::runtime(operator, "Operands must be numbers.")),
    }
}
