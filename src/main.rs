use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::error::ErrorKind;
use clap::{Parser as ClapParser, ValueEnum};
use env_logger::Builder;
use log::{debug, info};

use golox::ast_printer::AstPrinter;
use golox::lox::{exit, Lox, STACK_SIZE};
use golox::parser::Parser;
use golox::reporter::{ConsoleReporter, Reporter};
use golox::scanner::Scanner;
use golox::token::Token;

#[derive(ClapParser, Debug)]
#[command(name = "golox", version, about = "Golox language interpreter", long_about = None)]
pub struct Cli {
    /// Script to run; without one an interactive prompt starts
    script: Option<PathBuf>,

    /// Enable logging to golox.log
    #[arg(long)]
    log: bool,

    /// Print an intermediate form of the script instead of running it
    #[arg(long, value_enum, requires = "script")]
    emit: Option<Emit>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Emit {
    /// One token per line
    Tokens,

    /// The token stream as JSON
    Json,

    /// Each parsed statement as an S-expression
    Ast,
}

/// Reads the contents of a file into a Vec<u8>
fn read_file(filename: &Path) -> Result<Vec<u8>> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("golox.log").context("Failed to create golox.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("golox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // overridable with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to golox.log");
    Ok(())
}

fn emit(kind: Emit, source: &[u8]) -> Result<u8> {
    let mut reporter = ConsoleReporter::new();

    match kind {
        Emit::Tokens => {
            let tokens = Scanner::new(source).scan_tokens(&mut reporter);
            for token in &tokens {
                println!("{}", token);
            }
        }

        Emit::Json => {
            let tokens: Vec<Token> = Scanner::new(source).scan_tokens(&mut reporter);
            let json = serde_json::to_string_pretty(&tokens).context("Failed to encode tokens")?;
            println!("{}", json);
        }

        Emit::Ast => {
            let tokens = Scanner::new(source).scan_tokens(&mut reporter);
            if !reporter.had_error() {
                let statements = Parser::new(tokens, &mut reporter).parse();
                let printer = AstPrinter;
                for stmt in &statements {
                    println!("{}", printer.print_stmt(stmt));
                }
            }
        }
    }

    Ok(if reporter.had_error() {
        exit::STATIC_ERROR
    } else {
        exit::OK
    })
}

fn run(cli: Cli) -> Result<u8> {
    match cli.script {
        Some(path) => {
            let source = match read_file(&path) {
                Ok(source) => source,
                Err(e) => {
                    eprintln!("{:#}", e);
                    return Ok(exit::UNREADABLE_SOURCE);
                }
            };

            if let Some(kind) = cli.emit {
                return emit(kind, &source);
            }

            let mut lox = Lox::new(ConsoleReporter::new());
            let code = lox.run_script(&source);
            debug!("Script finished with exit code {}", code);
            Ok(code)
        }

        None => {
            let mut lox = Lox::new(ConsoleReporter::new());
            let stdin = io::stdin();
            lox.run_prompt(stdin.lock(), &mut io::stdout())
                .context("REPL I/O failed")?;
            Ok(exit::OK)
        }
    }
}

fn main() -> ExitCode {
    let cli: Cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return ExitCode::SUCCESS;
            }
            _ => {
                eprintln!("Usage: golox [script]");
                return ExitCode::from(exit::USAGE);
            }
        },
    };

    if cli.log {
        if let Err(e) = init_logger() {
            eprintln!("{:#}", e);
        }
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", cli);

    // Deep recursion in scripts needs more stack than the main thread has.
    let outcome = thread::Builder::new()
        .name("golox".to_string())
        .stack_size(STACK_SIZE)
        .spawn(move || run(cli))
        .context("Failed to start the interpreter thread")
        .and_then(|handle| match handle.join() {
            Ok(result) => result,
            Err(_) => Err(anyhow!("Interpreter thread panicked")),
        });

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::from(exit::RUNTIME_ERROR)
        }
    }
}
