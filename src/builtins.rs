//! Native functions injected into the global environment at startup.

use std::rc::Rc;

use chrono::Utc;
use log::debug;

use crate::callable::{Arity, NativeFunction};
use crate::environment::Environment;
use crate::value::Value;

const NATIVES: &[NativeFunction] = &[
    NativeFunction {
        name: "clock",
        arity: Arity::Fixed(0),
        func: clock,
    },
    NativeFunction {
        name: "len",
        arity: Arity::Fixed(1),
        func: len,
    },
    NativeFunction {
        name: "append",
        arity: Arity::AtLeast(1),
        func: append,
    },
    NativeFunction {
        name: "array",
        arity: Arity::AtLeast(0),
        func: array,
    },
];

pub fn define_all(globals: &mut Environment) {
    for native in NATIVES {
        debug!("Defining native function '{}'", native.name);

        let value = NativeFunction {
            name: native.name,
            arity: native.arity,
            func: native.func,
        };
        globals.define(native.name, Value::Callable(Rc::new(value)));
    }
}

/// Whole seconds since the Unix epoch.
fn clock(_args: &[Value]) -> Result<Value, String> {
    Ok(Value::int(Utc::now().timestamp()))
}

fn len(args: &[Value]) -> Result<Value, String> {
    match args.first() {
        Some(Value::Array(items)) => Ok(Value::int(items.borrow().len() as i64)),
        Some(other) => Err(format!("len() expects an array, got {}.", other.type_name())),
        None => Err("len() expects an array.".to_string()),
    }
}

/// Pushes every argument after the first onto the array, in order.
fn append(args: &[Value]) -> Result<Value, String> {
    match args.split_first() {
        Some((Value::Array(items), rest)) => {
            items.borrow_mut().extend(rest.iter().cloned());
            Ok(Value::Nil)
        }
        Some((other, _)) => Err(format!(
            "append() expects an array as its first argument, got {}.",
            other.type_name()
        )),
        None => Err("append() expects an array as its first argument.".to_string()),
    }
}

fn array(args: &[Value]) -> Result<Value, String> {
    Ok(Value::array(args.to_vec()))
}
