//! golox: a tree‑walking interpreter for a small Lox‑family language.
//!
//! The pipeline is strictly linear:
//!
//! ```text
//! bytes ─► Scanner ─► tokens ─► Parser ─► AST ─► Resolver ─► Interpreter
//! ```
//!
//! Every stage reports diagnostics through an explicit
//! [`Reporter`](reporter::Reporter); a stage that reported an error
//! suppresses the stages after it.  [`Lox`](lox::Lox) wires them together.
//!
//! ```
//! use golox::lox::Lox;
//! use golox::reporter::CollectingReporter;
//!
//! let mut lox = Lox::new(CollectingReporter::new());
//! lox.run(b"fn add(a, b) { return a + b; } print add(1, 2);");
//! assert_eq!(lox.exit_code(), 0);
//! ```

pub mod ast;
pub mod ast_printer;
pub mod builtins;
pub mod callable;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lox;
pub mod parser;
pub mod reporter;
pub mod resolver;
pub mod scanner;
pub mod token;
pub mod value;
