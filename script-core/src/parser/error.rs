use crate::{lexer::prelude::Token, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectedIdent,
    ExpectedType,
    InvalidAssignmentTarget,
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    WrongArgumentCount {
        function: String,
        expected: String,
        got: usize,
    },
    /// The token sequence ended while a production still needed input.
    /// Kept distinct from `UnexpectedToken` so callers can tell a truncated
    /// program from a malformed one.
    UnexpectedEof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan,
}

impl ParseError {
    pub fn details(&self) -> (String, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedIdent => ("Expected identifier".into(), vec![]),
            ParseErrorType::ExpectedType => (
                "Expected a type after `set`".into(),
                vec!["One of: int, float, char, string, array".into()],
            ),
            ParseErrorType::InvalidAssignmentTarget => (
                "Invalid left-hand side in assignment".into(),
                vec!["Only an identifier can be assigned to".into()],
            ),
            ParseErrorType::UnexpectedToken { token, expected } => {
                let found = match token {
                    Token::Int(_) => "an Int".to_string(),
                    Token::Float(_) => "a Float".to_string(),
                    Token::Str { .. } => "a String".to_string(),
                    Token::Ident(_) => "an Identifier".to_string(),
                    _ if token.is_reserved_word() => {
                        format!("the keyword `{}`", token.as_literal())
                    }
                    _ => format!("`{}`", token.as_literal()),
                };

                let messages = std::iter::once(format!("Found {found}, expected one of: "))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this".into(), messages)
            }
            ParseErrorType::WrongArgumentCount {
                function,
                expected,
                got,
            } => (
                format!("Wrong number of arguments to `{function}`"),
                vec![format!("Expected {expected}, got {got}")],
            ),
            ParseErrorType::UnexpectedEof => ("Unexpected end of input".into(), vec![]),
        }
    }
}
