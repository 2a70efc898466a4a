//! Driver tying the pipeline together: scan → parse → resolve → interpret.
//! Each phase runs only if the previous ones reported no error.

use std::io::{self, BufRead, Write};

use log::{debug, info};

use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::reporter::Reporter;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

/// Process exit codes, following the sysexits convention used by Lox.
pub mod exit {
    pub const OK: u8 = 0;
    pub const UNREADABLE_SOURCE: u8 = 2;
    pub const USAGE: u8 = 64;
    pub const STATIC_ERROR: u8 = 65;
    pub const RUNTIME_ERROR: u8 = 70;
}

pub const BANNER: &str = "Golox 0.02";

/// Stack reserved for the thread that runs the interpreter.  Sized so that
/// [`MAX_CALL_DEPTH`](crate::interpreter::MAX_CALL_DEPTH) nested calls fit
/// even in unoptimised builds.
pub const STACK_SIZE: usize = 256 * 1024 * 1024;
pub const PROMPT: &str = ">> ";

pub struct Lox<R: Reporter> {
    interpreter: Interpreter,
    reporter: R,
}

impl<R: Reporter> Lox<R> {
    /// A session printing to stdout.
    pub fn new(reporter: R) -> Self {
        Self {
            interpreter: Interpreter::new(),
            reporter,
        }
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output(reporter: R, out: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
            reporter,
        }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Run one chunk of source against the session's global state.
    pub fn run(&mut self, source: &[u8]) {
        let tokens = Scanner::new(source).scan_tokens(&mut self.reporter);
        if self.reporter.had_error() {
            info!("Scan failed; skipping parse");
            return;
        }

        let statements = Parser::new(tokens, &mut self.reporter).parse();
        if self.reporter.had_error() {
            info!("Parse failed; skipping resolve");
            return;
        }

        let transient = Resolver::new(&mut self.interpreter, &mut self.reporter).resolve(&statements);
        if self.reporter.had_error() {
            info!("Resolve failed; skipping execution");
        } else {
            self.interpreter.interpret(&statements, &mut self.reporter);
        }

        self.interpreter.forget(&transient);
    }

    /// Run a whole script and map the outcome to an exit code.
    pub fn run_script(&mut self, source: &[u8]) -> u8 {
        self.run(source);
        self.exit_code()
    }

    pub fn exit_code(&self) -> u8 {
        if self.reporter.had_error() {
            exit::STATIC_ERROR
        } else if self.reporter.had_runtime_error() {
            exit::RUNTIME_ERROR
        } else {
            exit::OK
        }
    }

    /// Line‑at‑a‑time REPL.  Errors are reported and forgotten after each
    /// line; definitions persist.  Returns on end of input.
    pub fn run_prompt<I: BufRead, W: Write>(&mut self, input: I, console: &mut W) -> io::Result<()> {
        writeln!(console, "{}", BANNER)?;

        let mut lines = input.lines();
        loop {
            write!(console, "{}", PROMPT)?;
            console.flush()?;

            let Some(line) = lines.next() else {
                writeln!(console)?;
                break;
            };
            let line = line?;

            debug!("REPL input: {}", line);
            self.run(line.as_bytes());
            self.reporter.reset();
        }

        info!("REPL session ended");
        Ok(())
    }
}
