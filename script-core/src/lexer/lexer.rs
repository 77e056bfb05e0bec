use super::token::{str_to_keyword, Token};
use std::fmt::Display;

pub type Spanned = (u32, Token, u32);

/// Tokenizer over a positioned character stream.
///
/// Lexing never fails: characters that start no token are dropped and the
/// scan continues. This permissive policy is deliberate and matches the
/// error taxonomy, which reserves failures for the parser and the runtime.
#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
    position: u32,
    next_position: u32,
    ch: Option<char>,
    next_ch: Option<char>,
    input: T,

    line: u32,
    eof_emitted: bool,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Lexer {{\n\tposition: {},\n\tline: {},\n\tch: {:?}, next_ch: {:?}\n}}",
            self.position, self.line, self.ch, self.next_ch
        )
    }
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
    pub fn new(input: T) -> Self {
        let mut lexer = Self {
            position: 0,
            next_position: 0,
            ch: None,
            next_ch: None,
            input,

            line: 1,
            eof_emitted: false,
        };

        lexer.next_char();
        lexer.next_char();

        lexer
    }

    /// Current 1-based source line, for diagnostics only.
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn next_token(&mut self) -> Spanned {
        loop {
            match self.ch {
                Some(ch) => match ch {
                    c if c.is_whitespace() => {
                        self.next_char();
                    }
                    '/' if self.next_ch == Some('/') => return self.lex_line_comment(),
                    '/' if self.next_ch == Some('*') => return self.lex_block_comment(),
                    '"' | '\'' => return self.lex_string(),
                    'a'..='z' | 'A'..='Z' => return self.lex_word(),
                    '0'..='9' => return self.lex_number(),
                    '-' if matches!(self.next_ch, Some(c) if c.is_ascii_digit()) => {
                        // A `-` directly before a digit always folds into the
                        // numeric literal, even right after another number.
                        return self.lex_number();
                    }
                    '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '&' | '|' => {
                        return self.lex_operator()
                    }
                    '(' => return self.eat_one_char(Token::LParen),
                    ')' => return self.eat_one_char(Token::RParen),
                    '{' => return self.eat_one_char(Token::LBrace),
                    '}' => return self.eat_one_char(Token::RBrace),
                    ',' => return self.eat_one_char(Token::Comma),
                    ';' => return self.eat_one_char(Token::Semicolon),
                    '[' => return self.eat_one_char(Token::LBracket),
                    ']' => return self.eat_one_char(Token::RBracket),
                    _ => {
                        // Anything else is silently dropped.
                        self.next_char();
                    }
                },
                None => {
                    let pos = self.position;
                    return (pos, Token::Eof, pos);
                }
            }
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.ch;

        let next = match self.input.next() {
            Some((pos, ch)) => {
                self.position = self.next_position;
                self.next_position = pos;

                Some(ch)
            }
            None => {
                self.position = self.next_position;
                self.next_position += 1;

                None
            }
        };

        self.ch = self.next_ch;
        self.next_ch = next;

        if ch == Some('\n') {
            self.line += 1;
        }

        ch
    }

    fn eat_one_char(&mut self, token: Token) -> Spanned {
        let start_pos = self.position;
        self.next_char();
        let end_pos = self.position;

        (start_pos, token, end_pos)
    }

    fn lex_word(&mut self) -> Spanned {
        let start_pos = self.position;
        let mut word = String::new();

        while let Some(ch) = self.ch {
            if ch.is_ascii_alphanumeric() {
                word.push(self.next_char().unwrap());
            } else {
                break;
            }
        }

        let end_pos = self.position;

        let token = match str_to_keyword(&word) {
            Some(keyword) => keyword,
            None => Token::Ident(word),
        };

        (start_pos, token, end_pos)
    }

    fn lex_number(&mut self) -> Spanned {
        let start_pos = self.position;
        let mut value = String::new();

        if self.ch == Some('-') {
            value.push(self.next_char().unwrap());
        }

        let mut is_float = false;

        loop {
            match self.ch {
                Some(ch) if ch.is_ascii_digit() => {
                    value.push(self.next_char().unwrap());
                }
                Some('.') if !is_float => {
                    is_float = true;
                    value.push(self.next_char().unwrap());
                }
                // A second decimal point ends the number and stays unconsumed.
                _ => break,
            }
        }

        let end_pos = self.position;

        let token = if is_float {
            Token::Float(value.parse().unwrap_or(0.0))
        } else {
            match value.parse::<i64>() {
                Ok(int) => Token::Int(int),
                // Out-of-range integers degrade to a float literal.
                Err(_) => Token::Float(value.parse().unwrap_or(0.0)),
            }
        };

        (start_pos, token, end_pos)
    }

    fn lex_string(&mut self) -> Spanned {
        let start_pos = self.position;
        let quote = self.next_char().unwrap();

        let mut value = String::new();

        loop {
            match self.ch {
                Some(ch) if ch == quote => {
                    self.next_char();
                    break;
                }
                Some('\\') => {
                    self.next_char();
                    match self.next_char() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some(other) => value.push(other),
                        None => break,
                    }
                }
                Some(_) => value.push(self.next_char().unwrap()),
                // Unterminated literal runs to end of input.
                None => break,
            }
        }

        let end_pos = self.position;

        let raw = value
            .replace('\\', "\\\\")
            .replace('\n', "\\n")
            .replace('\t', "\\t")
            .replace('\r', "\\r");

        (start_pos, Token::Str { value, raw }, end_pos)
    }

    fn lex_operator(&mut self) -> Spanned {
        let start_pos = self.position;
        let first = self.next_char().unwrap();

        let paired = matches!(
            (first, self.ch),
            ('=', Some('='))
                | ('!', Some('='))
                | ('<', Some('='))
                | ('>', Some('='))
                | ('&', Some('&'))
                | ('|', Some('|'))
                | ('+', Some('+'))
                | ('-', Some('-'))
        );

        let token = if paired {
            let second = self.next_char().unwrap();
            match (first, second) {
                ('=', _) => Token::Equal,
                ('!', _) => Token::NotEqual,
                ('<', _) => Token::LessThanOrEqual,
                ('>', _) => Token::GreaterThanOrEqual,
                ('&', _) => Token::And,
                ('|', _) => Token::Or,
                ('+', _) => Token::Increment,
                _ => Token::Decrement,
            }
        } else {
            match first {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Asterisk,
                '/' => Token::Slash,
                '%' => Token::Percent,
                '=' => Token::Assign,
                '<' => Token::LessThan,
                '>' => Token::GreaterThan,
                '!' => Token::Bang,
                '&' => Token::Ampersand,
                _ => Token::Pipe,
            }
        };

        let end_pos = self.position;

        (start_pos, token, end_pos)
    }

    fn lex_line_comment(&mut self) -> Spanned {
        let start_pos = self.position;

        self.next_char();
        self.next_char();

        while !matches!(self.ch, Some('\n') | None) {
            self.next_char();
        }

        (start_pos, Token::Comment, self.position)
    }

    fn lex_block_comment(&mut self) -> Spanned {
        let start_pos = self.position;

        self.next_char();
        self.next_char();

        // Greedy to the first `*/`; an unterminated comment runs to end of
        // input without error.
        loop {
            match self.ch {
                Some('*') if self.next_ch == Some('/') => {
                    self.next_char();
                    self.next_char();
                    break;
                }
                Some(_) => {
                    self.next_char();
                }
                None => break,
            }
        }

        (start_pos, Token::Comment, self.position)
    }
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
    type Item = Spanned;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof_emitted {
            return None;
        }

        let spanned = self.next_token();

        if spanned.1 == Token::Eof {
            self.eof_emitted = true;
        }

        Some(spanned)
    }
}
