use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::RuntimeError,
    parser::prelude::{ParseError, ParseErrorType},
    utils::prelude::SrcSpan,
};

use super::diagnostic::{Diagnostic, Label, Level, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("no source code provided")]
    EmptyInput,
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        error: ParseError,
    },
    #[error("execution failed")]
    Runtime { error: RuntimeError },
    #[error("IO operation failed")]
    StdIo { err: std::io::ErrorKind },
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        self.to_diagnostic().write(buf);
        writeln!(buf).expect("write new line diagnostic");
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::EmptyInput => Diagnostic {
                title: "Empty input".into(),
                text: "There is no source code to compile".into(),
                level: Level::Error,
                location: None,
            },
            Error::Parse { path, src, error } => {
                let (label, extra) = error.details();
                let text = extra.join("\n");

                // Eof errors carry no usable span; point at the end of the
                // source instead.
                let adjusted_location = if matches!(error.error, ParseErrorType::UnexpectedEof) {
                    SrcSpan {
                        start: src.len() as u32,
                        end: src.len() as u32,
                    }
                } else {
                    error.span
                };

                Diagnostic {
                    title: "Syntax error".into(),
                    text,
                    level: Level::Error,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label),
                            span: adjusted_location,
                        },
                    }),
                }
            }
            Error::Runtime { error } => Diagnostic {
                title: "Runtime error".into(),
                text: format!("{error}"),
                level: Level::Error,
                location: None,
            },
            Error::StdIo { err } => Diagnostic {
                title: "Standard IO error".into(),
                text: format!("{err}"),
                level: Level::Error,
                location: None,
            },
        }
    }
}
