use super::ast::{Parsed, Program};
use super::error::{ParseError, ParseErrorType};
use crate::{
    lexer::prelude::{Lexer, Spanned, Token},
    utils::prelude::SrcSpan,
};

pub trait Parse<T: Iterator<Item = Spanned>>
where
    Self: Sized,
{
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError>;
}

/// Recursive-descent parser state: the token stream plus one token of
/// lookahead. Every grammar rule receives the parser by mutable reference,
/// so the cursor position is always explicit.
pub struct Parser<T: Iterator<Item = Spanned>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub comments: Vec<SrcSpan>,

    tokens: T,
}

impl<T: Iterator<Item = Spanned>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            comments: vec![],

            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();
        let mut next = None;

        loop {
            match self.tokens.next() {
                Some((start, Token::Comment, end)) => {
                    self.comments.push(SrcSpan { start, end });
                }
                Some(tok) => {
                    next = Some(tok);
                    break;
                }
                None => break,
            }
        }

        self.current_token = self.next_token.take();
        self.next_token = next;

        t
    }

    pub fn at_end(&self) -> bool {
        matches!(self.current_token, None | Some((_, Token::Eof, _)))
    }

    pub fn parse(&mut self) -> Result<Parsed, ParseError> {
        let program = Program::parse(self)?;

        Ok(Parsed {
            program,
            comments: std::mem::take(&mut self.comments),
        })
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        match self.current_token.take() {
            Some((start, tok, end)) if tok == token => {
                self.step();
                Ok((start, end))
            }
            Some((start, Token::Eof, end)) => {
                self.current_token = Some((start, Token::Eof, end));

                parse_error(ParseErrorType::UnexpectedEof, SrcSpan { start, end })
            }
            Some(t) => {
                let (start, tok, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: tok,
                        expected: vec![format!("`{}`", token.as_literal())],
                    },
                    SrcSpan { start, end },
                )
            }
            None => parse_error(ParseErrorType::UnexpectedEof, SrcSpan { start: 0, end: 0 }),
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::Ident(value), end)) => {
                self.step();
                Ok((start, value, end))
            }
            Some((start, Token::Eof, end)) => {
                self.current_token = Some((start, Token::Eof, end));

                parse_error(ParseErrorType::UnexpectedEof, SrcSpan { start, end })
            }
            Some(t) => {
                let (start, _, end) = t.clone();
                self.current_token = Some(t);

                parse_error(ParseErrorType::ExpectedIdent, SrcSpan { start, end })
            }
            None => parse_error(ParseErrorType::UnexpectedEof, SrcSpan { start: 0, end: 0 }),
        }
    }

    /// Span of the current token, for error reporting at the cursor.
    pub fn current_span(&self) -> SrcSpan {
        match &self.current_token {
            Some((start, _, end)) => SrcSpan {
                start: *start,
                end: *end,
            },
            None => SrcSpan { start: 0, end: 0 },
        }
    }
}

pub fn parse_source(src: &str) -> Result<Parsed, ParseError> {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);

    parser.parse()
}

pub fn parse_source_from_stream(stream: impl Iterator<Item = char>) -> Result<Parsed, ParseError> {
    let lexer = Lexer::new(stream.scan(0u32, |pos, c| {
        let start = *pos;
        *pos += c.len_utf8() as u32;
        Some((start, c))
    }));
    let mut parser = Parser::new(lexer);

    parser.parse()
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
