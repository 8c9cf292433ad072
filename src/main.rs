//! rlox CLI: run a source file or start the REPL.

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use colored::Colorize;

use rlox::error::LoxError;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// Exit codes, from sysexits.h
const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_SOFTWARE: i32 = 70;
const EX_IOERR: i32 = 74;

/// CLI command to execute.
enum Command {
    /// Run a source file
    Run { file: String },
    /// Start the REPL
    Repl,
}

/// CLI options parsed from arguments.
struct Options {
    command: Command,
    disassemble: bool,
}

fn print_usage() {
    eprintln!("rlox {} - Lox expression interpreter", VERSION);
    eprintln!();
    eprintln!("Usage: rlox [--disassemble] [path]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --disassemble, -d  Print the compiled bytecode before running");
    eprintln!("  --help, -h         Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  rlox               Start interactive REPL");
    eprintln!("  rlox expr.lox      Evaluate the expression in a file");
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut options = Options {
        command: Command::Repl,
        disassemble: false,
    };

    for arg in &args {
        match arg.as_str() {
            "--disassemble" | "-d" => options.disassemble = true,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            _ if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                print_usage();
                process::exit(EX_USAGE);
            }
            _ => {
                if let Command::Run { .. } = options.command {
                    print_usage();
                    process::exit(EX_USAGE);
                }
                options.command = Command::Run { file: arg.clone() };
            }
        }
    }

    options
}

fn main() {
    let options = parse_args();

    match &options.command {
        Command::Repl => run_repl(&options),
        Command::Run { file } => {
            let code = run_file(file, &options);
            if code != 0 {
                process::exit(code);
            }
        }
    }
}

/// Interpret a file and print its value, returning the process exit code.
fn run_file(path: &str, options: &Options) -> i32 {
    match rlox::run_file_with_disassembly(path, options.disassemble) {
        Ok(value) => {
            println!("{}", value);
            0
        }
        Err(LoxError::Io(e)) => {
            eprintln!("Could not read file \"{}\": {}", path, e);
            EX_IOERR
        }
        Err(e) => {
            report(&e);
            exit_code(&e)
        }
    }
}

fn run_repl(options: &Options) {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => match rlox::interpret_with_disassembly(&line, options.disassemble) {
                Ok(value) => println!("{}", value),
                Err(e) => report(&e),
            },
            Err(e) => {
                eprintln!("{} {}", "Error reading input:".red().bold(), e);
                process::exit(EX_IOERR);
            }
        }
    }
}

/// Write an error to stderr, highlighting the message.
fn report(error: &LoxError) {
    match error {
        LoxError::Compile(errors) => {
            for error in errors {
                eprintln!("{}", error.to_string().red().bold());
            }
        }
        LoxError::Runtime(error) => {
            let rendered = error.to_string();
            let (message, location) = rendered.split_once('\n').unwrap_or((rendered.as_str(), ""));
            eprintln!("{}", message.red().bold());
            if !location.is_empty() {
                eprintln!("{}", location);
            }
        }
        LoxError::Io(e) => eprintln!("{} {}", "Error:".red().bold(), e),
    }
}

fn exit_code(error: &LoxError) -> i32 {
    match error {
        LoxError::Compile(_) => EX_DATAERR,
        LoxError::Runtime(_) => EX_SOFTWARE,
        LoxError::Io(_) => EX_IOERR,
    }
}
