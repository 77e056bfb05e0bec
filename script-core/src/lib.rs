pub mod environment;
pub mod eval;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod utils;

use std::path::PathBuf;

use utf8_chars::BufReadCharsExt;

use crate::{
    eval::prelude::{execute_with_input, Execution, InputSource},
    lower::prelude::{lower, ExecutableProgram},
    parser::{parser::parse_source_from_stream, prelude::parse_source},
    utils::prelude::Error,
};

/// Compile source text into its executable form. Fails with `EmptyInput`
/// when there is nothing but whitespace to compile, otherwise surfaces the
/// parser's error unchanged.
pub fn compile(src: &str) -> Result<ExecutableProgram, Error> {
    compile_source(PathBuf::from("<input>"), src)
}

pub fn compile_source(path: PathBuf, src: &str) -> Result<ExecutableProgram, Error> {
    if src.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    let parsed = match parse_source(src) {
        Ok(parsed) => parsed,
        Err(error) => {
            return Err(Error::Parse {
                path,
                src: src.to_string(),
                error,
            })
        }
    };

    Ok(lower(&parsed.program))
}

/// Compile a file without reading it into memory up front: the lexer pulls
/// characters straight off a buffered reader. The source accumulates on the
/// side so parse errors can still point into it.
pub fn compile_file(path: PathBuf) -> Result<ExecutableProgram, Error> {
    let file = match std::fs::File::open(&path) {
        Ok(file) => file,
        Err(err) => return Err(Error::StdIo { err: err.kind() }),
    };

    let file_size = file
        .metadata()
        .map_err(|err| Error::StdIo { err: err.kind() })?
        .len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut reader = std::io::BufReader::new(file);
    let stream = reader.chars().map_while(Result::ok).map(|c| {
        src.push(c);
        c
    });

    let parsed = match parse_source_from_stream(stream) {
        Ok(parsed) => parsed,
        Err(error) => return Err(Error::Parse { path, src, error }),
    };

    if src.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    Ok(lower(&parsed.program))
}

/// Run a compiled program to completion, collecting everything it printed
/// along with the diagnostics channel.
pub fn execute(program: &ExecutableProgram) -> Result<Execution, Error> {
    eval::prelude::execute(program).map_err(|error| Error::Runtime { error })
}

pub fn execute_with(
    program: &ExecutableProgram,
    input: &mut dyn InputSource,
) -> Result<Execution, Error> {
    execute_with_input(program, input).map_err(|error| Error::Runtime { error })
}
