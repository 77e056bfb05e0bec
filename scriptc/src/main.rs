mod cli;
mod rlpl;
mod rppl;

use std::path::PathBuf;

use clap::Parser;
use cli::{print_compiled, print_compiling, print_finished, print_running};
use script_core::{compile_file, execute, parser::prelude::parse_source, utils::prelude::Error};

#[derive(Parser)]
enum Command {
    /// Compiles a source file and runs it
    Run {
        /// Path of source file
        path: PathBuf,
    },
    /// Compiles a source file without running it
    Check {
        /// Path of source file
        path: PathBuf,
        /// Do not print parsed source code
        #[arg(short, long, default_value_t = false)]
        no_output: bool,
        /// Print ast instead of parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl,
}

fn main() {
    match Command::parse() {
        Command::Run { path } => run(path),
        Command::Check {
            path,
            no_output,
            print_ast,
        } => check(path, no_output, print_ast),
        Command::Rlpl => {
            let _ = rlpl::start();
        }
        Command::Rppl => {
            let _ = rppl::start();
        }
    }
}

fn run(path: PathBuf) {
    // Executions can block on `input()`; let Ctrl-C end the process instead
    // of being swallowed by the pending read.
    ctrlc::set_handler(|| std::process::exit(130)).expect("Setting Ctrl-C handler");

    print_compiling(path.to_string_lossy().as_ref());
    let start = std::time::Instant::now();

    let program = match compile_file(path.clone()) {
        Ok(program) => program,
        Err(err) => return print_error(&err),
    };

    print_compiled(std::time::Instant::now() - start);

    print_running(path.to_string_lossy().as_ref());
    let start = std::time::Instant::now();

    match execute(&program) {
        Ok(execution) => {
            // Diagnostics go to stderr so piped output stays clean.
            for line in execution.diagnostics {
                eprintln!("{line}");
            }
            for line in execution.output {
                println!("{line}");
            }
            print_finished(std::time::Instant::now() - start);
        }
        Err(err) => print_error(&err),
    }
}

fn check(path: PathBuf, no_output: bool, print_ast: bool) {
    print_compiling(path.to_string_lossy().as_ref());
    let start = std::time::Instant::now();

    let src = match std::fs::read_to_string(&path) {
        Ok(src) => src,
        Err(err) => return print_error(&Error::StdIo { err: err.kind() }),
    };

    match parse_source(&src) {
        Ok(parsed) => {
            if !no_output {
                if print_ast {
                    println!("{:#?}", parsed.program);
                } else {
                    println!("{}", parsed.program);
                }
            }
        }
        Err(error) => {
            return print_error(&Error::Parse { path, src, error });
        }
    }

    print_compiled(std::time::Instant::now() - start);
}

fn print_error(err: &Error) {
    let buf_writer = cli::stderr_buffer_writer();
    let mut buf = buf_writer.buffer();
    err.pretty(&mut buf);
    buf_writer.print(&buf).expect("Writing error to stderr");
}
