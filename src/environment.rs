use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One scope in the environment chain.  Scopes are shared (`Rc`) because a
/// closure keeps its defining scope alive after the block that created it
/// has exited.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Walks outward through enclosing scopes.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// The scope exactly `distance` hops out from `env`.
    fn ancestor(env: &Rc<RefCell<Environment>>, distance: usize) -> Option<Rc<RefCell<Environment>>> {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            let next = current.borrow().enclosing.clone()?;
            current = next;
        }
        Some(current)
    }

    /// Read `name` from the scope `distance` hops out.  Failure means the
    /// resolver and the runtime disagree, which is an internal error.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &str) -> Result<Value> {
        Self::ancestor(env, distance)
            .and_then(|scope| scope.borrow().values.get(name).cloned())
            .ok_or_else(|| {
                LoxError::internal(format!(
                    "resolved '{}' at distance {} but no such binding exists",
                    name, distance
                ))
            })
    }

    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        value: Value,
    ) -> Result<()> {
        let scope = Self::ancestor(env, distance).ok_or_else(|| {
            LoxError::internal(format!(
                "environment chain is shorter than distance {} for '{}'",
                distance, name
            ))
        })?;

        let mut scope = scope.borrow_mut();
        match scope.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(LoxError::internal(format!(
                "resolved '{}' at distance {} but no such binding exists",
                name, distance
            ))),
        }
    }
}
