use super::prelude::{Lexer, Token};

fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)))
        .map(|(_, token, _)| token)
        .collect()
}

#[test]
fn test_keywords_and_idents() {
    let tokens = lex("set int x = 5 print x");

    assert_eq!(
        tokens,
        vec![
            Token::Set,
            Token::IntType,
            Token::Ident("x".into()),
            Token::Assign,
            Token::Int(5),
            Token::Print,
            Token::Ident("x".into()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_every_keyword_is_reserved() {
    let input = "set print if else for while do \
        int float char string array input \
        sqrt pow abs round floor ceil random max min \
        length substring concat uppercase lowercase trim \
        push pop size get debug assert trace";

    let tokens = lex(input);

    // 35 keywords plus Eof, and none lexed as an identifier.
    assert_eq!(tokens.len(), 36);
    assert!(tokens
        .iter()
        .all(|token| !matches!(token, Token::Ident(_))));
    assert!(tokens[..35].iter().all(|token| token.is_reserved_word()));
}

#[test]
fn test_operators() {
    let tokens = lex("+ * / % = < > ! & | == != <= >= && || ++ --");

    assert_eq!(
        tokens,
        vec![
            Token::Plus,
            Token::Asterisk,
            Token::Slash,
            Token::Percent,
            Token::Assign,
            Token::LessThan,
            Token::GreaterThan,
            Token::Bang,
            Token::Ampersand,
            Token::Pipe,
            Token::Equal,
            Token::NotEqual,
            Token::LessThanOrEqual,
            Token::GreaterThanOrEqual,
            Token::And,
            Token::Or,
            Token::Increment,
            Token::Decrement,
            Token::Eof,
        ]
    );
}

#[test]
fn test_numbers() {
    let tokens = lex("0 42 -7 3.14 -0.5 99999999999999999999");

    assert_eq!(
        tokens,
        vec![
            Token::Int(0),
            Token::Int(42),
            Token::Int(-7),
            Token::Float(3.14),
            Token::Float(-0.5),
            // Out of i64 range, degrades to a float literal.
            Token::Float(1e20),
            Token::Eof,
        ]
    );
}

#[test]
fn test_minus_folds_into_literal() {
    // `-` directly before a digit is part of the literal, so `5-3` is two
    // numbers, not a subtraction.
    assert_eq!(lex("5-3"), vec![Token::Int(5), Token::Int(-3), Token::Eof]);

    assert_eq!(
        lex("5 - 3"),
        vec![Token::Int(5), Token::Minus, Token::Int(3), Token::Eof]
    );

    assert_eq!(
        lex("a - 3"),
        vec![
            Token::Ident("a".into()),
            Token::Minus,
            Token::Int(3),
            Token::Eof
        ]
    );
}

#[test]
fn test_second_decimal_point_ends_number() {
    assert_eq!(
        lex("1.2.3"),
        vec![Token::Float(1.2), Token::Int(3), Token::Eof]
    );
}

#[test]
fn test_strings() {
    assert_eq!(
        lex(r#""hello" 'world'"#),
        vec![
            Token::Str {
                value: "hello".into(),
                raw: "hello".into()
            },
            Token::Str {
                value: "world".into(),
                raw: "world".into()
            },
            Token::Eof,
        ]
    );
}

#[test]
fn test_string_escapes() {
    let tokens = lex(r#""a\nb\tc\rd\qe""#);

    assert_eq!(
        tokens,
        vec![
            Token::Str {
                // Unknown escapes keep the escaped character itself.
                value: "a\nb\tc\rdqe".into(),
                raw: "a\\nb\\tc\\rdqe".into()
            },
            Token::Eof,
        ]
    );
}

#[test]
fn test_unterminated_string_runs_to_eof() {
    assert_eq!(
        lex(r#""never closed"#),
        vec![
            Token::Str {
                value: "never closed".into(),
                raw: "never closed".into()
            },
            Token::Eof,
        ]
    );
}

#[test]
fn test_comments() {
    assert_eq!(
        lex("x // to end of line\ny"),
        vec![
            Token::Ident("x".into()),
            Token::Comment,
            Token::Ident("y".into()),
            Token::Eof,
        ]
    );

    assert_eq!(
        lex("/* block\nspanning lines */x"),
        vec![Token::Comment, Token::Ident("x".into()), Token::Eof]
    );

    // Unterminated block comments run to end of input.
    assert_eq!(lex("/* open"), vec![Token::Comment, Token::Eof]);
}

#[test]
fn test_unrecognized_characters_are_dropped() {
    assert_eq!(
        lex("x @ # $ y"),
        vec![Token::Ident("x".into()), Token::Ident("y".into()), Token::Eof]
    );

    assert_eq!(lex("@#$"), vec![Token::Eof]);
}

#[test]
fn test_spans() {
    let tokens: Vec<_> =
        Lexer::new("set x".char_indices().map(|(i, c)| (i as u32, c))).collect();

    assert_eq!(
        tokens,
        vec![
            (0, Token::Set, 3),
            (4, Token::Ident("x".into()), 5),
            (5, Token::Eof, 5),
        ]
    );
}

#[test]
fn test_eof_emitted_once() {
    let mut lexer = Lexer::new("".char_indices().map(|(i, c)| (i as u32, c)));

    assert!(matches!(lexer.next(), Some((_, Token::Eof, _))));
    assert_eq!(lexer.next(), None);
}
