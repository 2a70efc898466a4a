#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::thread;

use golox::lox::{Lox, STACK_SIZE};
use golox::reporter::CollectingReporter;

/// A `Write` sink the test can read back after the interpreter is done.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output is UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Outcome {
    pub stdout: String,
    pub static_errors: Vec<String>,
    pub runtime_errors: Vec<String>,
    pub exit_code: u8,
}

/// Run `source` as a script in a fresh session, on a thread with the same
/// stack the binary gives the interpreter.
pub fn run(source: &str) -> Outcome {
    let source = source.to_string();

    thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(move || run_in_place(&source))
        .expect("spawn interpreter thread")
        .join()
        .expect("interpreter thread panicked")
}

fn run_in_place(source: &str) -> Outcome {
    let out = SharedBuffer::default();
    let mut lox = Lox::with_output(CollectingReporter::new(), Box::new(out.clone()));
    let exit_code = lox.run_script(source.as_bytes());

    Outcome {
        stdout: out.contents(),
        static_errors: lox.reporter().static_errors.clone(),
        runtime_errors: lox.reporter().runtime_errors.clone(),
        exit_code,
    }
}

/// Run and return stdout, asserting that nothing went wrong.
pub fn output_of(source: &str) -> String {
    let outcome = run(source);
    assert!(
        outcome.static_errors.is_empty() && outcome.runtime_errors.is_empty(),
        "unexpected errors: {:?} {:?}",
        outcome.static_errors,
        outcome.runtime_errors
    );
    outcome.stdout
}
