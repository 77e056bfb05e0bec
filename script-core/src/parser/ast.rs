use std::fmt::Display;

use crate::{
    lexer::prelude::{Spanned, Token},
    parser::prelude::{parse_error, Parse, ParseError, ParseErrorType, Parser},
    utils::prelude::SrcSpan,
};

/// Output of a successful parse: the program tree plus the spans of every
/// comment the parser skipped over.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub program: Program,
    pub comments: Vec<SrcSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Program {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let mut statements = vec![];

        while !parser.at_end() {
            statements.push(Statement::parse(parser)?);
        }

        let location = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => SrcSpan {
                start: first.location().start,
                end: last.location().end,
            },
            _ => SrcSpan { start: 0, end: 0 },
        };

        Ok(Self {
            statements,
            location,
        })
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Assignment(Assignment),
    Print(Print),
    If(If),
    For(For),
    While(While),
    Expression(Expression),
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Statement::Declaration(declaration) => declaration.location,
            Statement::Assignment(assignment) => assignment.location,
            Statement::Print(print) => print.location,
            Statement::If(if_stmt) => if_stmt.location,
            Statement::For(for_stmt) => for_stmt.location,
            Statement::While(while_stmt) => while_stmt.location,
            Statement::Expression(expression) => expression.location(),
        }
    }
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Statement {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let statement = match &parser.current_token {
            Some((_, Token::Set, _)) => Statement::Declaration(Declaration::parse(parser)?),
            Some((_, Token::Print, _)) => Statement::Print(Print::parse(parser)?),
            Some((_, Token::If, _)) => Statement::If(If::parse(parser)?),
            Some((_, Token::For, _)) => Statement::For(For::parse(parser)?),
            Some((_, Token::While, _)) => Statement::While(While::parse(parser)?),
            Some((_, Token::Ident(_), _))
                if matches!(parser.next_token, Some((_, Token::Assign, _))) =>
            {
                Statement::Assignment(Assignment::parse(parser)?)
            }
            _ => {
                let expression = Expression::parse(parser)?;

                // `5 = x` and friends: the left side parsed as a plain
                // expression, so it cannot be assigned to.
                if matches!(parser.current_token, Some((_, Token::Assign, _))) {
                    return parse_error(
                        ParseErrorType::InvalidAssignmentTarget,
                        expression.location(),
                    );
                }

                Statement::Expression(expression)
            }
        };

        // Statement separators are optional.
        while parser.expect_one(Token::Semicolon).is_ok() {}

        Ok(statement)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Declaration(declaration) => write!(f, "{declaration}"),
            Statement::Assignment(assignment) => write!(f, "{assignment}"),
            Statement::Print(print) => write!(f, "{print}"),
            Statement::If(if_stmt) => write!(f, "{if_stmt}"),
            Statement::For(for_stmt) => write!(f, "{for_stmt}"),
            Statement::While(while_stmt) => write!(f, "{while_stmt}"),
            Statement::Expression(expression) => write!(f, "{expression}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Int,
    Float,
    Char,
    Str,
    Array,
}

impl From<&Token> for VarType {
    fn from(token: &Token) -> Self {
        match token {
            Token::IntType => VarType::Int,
            Token::FloatType => VarType::Float,
            Token::CharType => VarType::Char,
            Token::StringType => VarType::Str,
            Token::ArrayType => VarType::Array,
            _ => panic!("Invalid token to variable type conversion"),
        }
    }
}

impl Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarType::Int => write!(f, "int"),
            VarType::Float => write!(f, "float"),
            VarType::Char => write!(f, "char"),
            VarType::Str => write!(f, "string"),
            VarType::Array => write!(f, "array"),
        }
    }
}

/// `set <type> <name> = <value>`. The initializer is mandatory for scalar
/// types; `set array a` alone declares an empty array.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub var_type: VarType,
    pub name: Identifier,
    pub value: Option<Expression>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Declaration {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Set)?;

        let var_type = match &parser.current_token {
            Some((_, tok, _)) if tok.is_variable_type() => {
                let var_type = VarType::from(tok);
                parser.step();
                var_type
            }
            _ => return parse_error(ParseErrorType::ExpectedType, parser.current_span()),
        };

        let name = Identifier::from(parser.expect_ident()?);

        let value = if var_type == VarType::Array {
            if parser.expect_one(Token::Assign).is_ok() {
                Some(parse_value(parser)?)
            } else {
                None
            }
        } else {
            let _ = parser.expect_one(Token::Assign)?;
            Some(parse_value(parser)?)
        };

        let end = match &value {
            Some(value) => value.location().end,
            None => name.location.end,
        };

        Ok(Self {
            var_type,
            name,
            value,
            location: SrcSpan { start, end },
        })
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "set {} {} = {}", self.var_type, self.name, value),
            None => write!(f, "set {} {}", self.var_type, self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: Identifier,
    pub value: Expression,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Assignment {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let name = Identifier::from(parser.expect_ident()?);
        let _ = parser.expect_one(Token::Assign)?;
        let value = Expression::parse(parser)?;

        let location = SrcSpan {
            start: name.location.start,
            end: value.location().end,
        };

        Ok(Self {
            name,
            value,
            location,
        })
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Print {
    pub expression: Expression,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Print {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Print)?;
        let expression = Expression::parse(parser)?;

        let location = SrcSpan {
            start,
            end: expression.location().end,
        };

        Ok(Self {
            expression,
            location,
        })
    }
}

impl Display for Print {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "print {}", self.expression)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Expression,
    pub consequence: Vec<Statement>,
    pub alternative: Option<Vec<Statement>>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for If {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::If)?;

        let _ = parser.expect_one(Token::LParen)?;
        let condition = Expression::parse(parser)?;
        let _ = parser.expect_one(Token::RParen)?;

        let (consequence, mut span) = parse_block(parser)?;

        let alternative = if parser.expect_one(Token::Else).is_ok() {
            let (block, block_span) = parse_block(parser)?;
            span = block_span;
            Some(block)
        } else {
            None
        };

        Ok(Self {
            condition,
            consequence,
            alternative,
            location: SrcSpan {
                start,
                end: span.end,
            },
        })
    }
}

impl Display for If {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "if ({}) {{ {} }}",
            self.condition,
            display_block(&self.consequence)
        )?;

        if let Some(alternative) = &self.alternative {
            write!(f, " else {{ {} }}", display_block(alternative))?;
        }

        Ok(())
    }
}

/// `for (i = 0; i < 10; i = i + 1) { ... }`. Loop variables need no `set`;
/// assigning creates them.
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub init: Assignment,
    pub condition: Expression,
    pub increment: Assignment,
    pub body: Vec<Statement>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for For {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::For)?;

        let _ = parser.expect_one(Token::LParen)?;
        let init = parse_loop_assignment(parser)?;
        let _ = parser.expect_one(Token::Semicolon)?;
        let condition = parse_comparison(parser)?;
        let _ = parser.expect_one(Token::Semicolon)?;
        let increment = parse_loop_assignment(parser)?;
        let _ = parser.expect_one(Token::RParen)?;

        let (body, span) = parse_block(parser)?;

        Ok(Self {
            init,
            condition,
            increment,
            body,
            location: SrcSpan {
                start,
                end: span.end,
            },
        })
    }
}

impl Display for For {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "for ({}; {}; {}) {{ {} }}",
            self.init,
            self.condition,
            self.increment,
            display_block(&self.body)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for While {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::While)?;

        let _ = parser.expect_one(Token::LParen)?;
        let condition = parse_comparison(parser)?;
        let _ = parser.expect_one(Token::RParen)?;

        let (body, span) = parse_block(parser)?;

        Ok(Self {
            condition,
            body,
            location: SrcSpan {
                start,
                end: span.end,
            },
        })
    }
}

impl Display for While {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "while ({}) {{ {} }}",
            self.condition,
            display_block(&self.body)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan,
}

impl From<(u32, String, u32)> for Identifier {
    fn from((start, value, end): (u32, String, u32)) -> Self {
        Self {
            value,
            location: SrcSpan { start, end },
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub value: String,
    pub raw: String,
    pub location: SrcSpan,
}

impl Display for StrLit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan,
}

impl Display for Binary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: Token,
    pub expression: Box<Expression>,
    pub location: SrcSpan,
}

impl Display for Unary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.operator, self.expression)
    }
}

/// `input()` or `input("prompt")`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputCall {
    pub prompt: Option<StrLit>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for InputCall {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Input)?;
        let _ = parser.expect_one(Token::LParen)?;

        let prompt = match parser.current_token.take() {
            Some((s, Token::Str { value, raw }, e)) => {
                parser.step();
                Some(StrLit {
                    value,
                    raw,
                    location: SrcSpan { start: s, end: e },
                })
            }
            t => {
                parser.current_token = t;
                None
            }
        };

        let (_, end) = parser.expect_one(Token::RParen)?;

        Ok(Self {
            prompt,
            location: SrcSpan { start, end },
        })
    }
}

impl Display for InputCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prompt {
            Some(prompt) => write!(f, "input({prompt})"),
            None => write!(f, "input()"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFn {
    Sqrt,
    Pow,
    Abs,
    Round,
    Floor,
    Ceil,
    Random,
    Max,
    Min,
}

impl MathFn {
    /// Allowed argument count as `(min, max)`; `None` means unbounded.
    fn arity(&self) -> (usize, Option<usize>) {
        match self {
            MathFn::Sqrt | MathFn::Abs | MathFn::Round | MathFn::Floor | MathFn::Ceil => {
                (1, Some(1))
            }
            MathFn::Pow => (2, Some(2)),
            MathFn::Random => (0, Some(0)),
            MathFn::Max | MathFn::Min => (1, None),
        }
    }
}

impl From<&Token> for MathFn {
    fn from(token: &Token) -> Self {
        match token {
            Token::Sqrt => MathFn::Sqrt,
            Token::Pow => MathFn::Pow,
            Token::Abs => MathFn::Abs,
            Token::Round => MathFn::Round,
            Token::Floor => MathFn::Floor,
            Token::Ceil => MathFn::Ceil,
            Token::Random => MathFn::Random,
            Token::Max => MathFn::Max,
            Token::Min => MathFn::Min,
            _ => panic!("Invalid token to math function conversion"),
        }
    }
}

impl Display for MathFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MathFn::Sqrt => write!(f, "sqrt"),
            MathFn::Pow => write!(f, "pow"),
            MathFn::Abs => write!(f, "abs"),
            MathFn::Round => write!(f, "round"),
            MathFn::Floor => write!(f, "floor"),
            MathFn::Ceil => write!(f, "ceil"),
            MathFn::Random => write!(f, "random"),
            MathFn::Max => write!(f, "max"),
            MathFn::Min => write!(f, "min"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MathCall {
    pub function: MathFn,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for MathCall {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, token, _) = parser
            .next_token()
            .expect("math call parsed without a current token");
        let function = MathFn::from(&token);

        let (arguments, end) = parse_call_args(parser)?;
        let location = SrcSpan { start, end };

        check_arity(
            &function.to_string(),
            function.arity(),
            arguments.len(),
            location,
        )?;

        Ok(Self {
            function,
            arguments,
            location,
        })
    }
}

impl Display for MathCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.function, display_args(&self.arguments))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFn {
    Length,
    Concat,
    Substring,
    Uppercase,
    Lowercase,
    Trim,
}

impl TextFn {
    fn arity(&self) -> (usize, Option<usize>) {
        match self {
            TextFn::Length | TextFn::Uppercase | TextFn::Lowercase | TextFn::Trim => (1, Some(1)),
            TextFn::Substring => (2, Some(3)),
            TextFn::Concat => (1, None),
        }
    }
}

impl From<&Token> for TextFn {
    fn from(token: &Token) -> Self {
        match token {
            Token::Length => TextFn::Length,
            Token::Concat => TextFn::Concat,
            Token::Substring => TextFn::Substring,
            Token::Uppercase => TextFn::Uppercase,
            Token::Lowercase => TextFn::Lowercase,
            Token::Trim => TextFn::Trim,
            _ => panic!("Invalid token to text function conversion"),
        }
    }
}

impl Display for TextFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextFn::Length => write!(f, "length"),
            TextFn::Concat => write!(f, "concat"),
            TextFn::Substring => write!(f, "substring"),
            TextFn::Uppercase => write!(f, "uppercase"),
            TextFn::Lowercase => write!(f, "lowercase"),
            TextFn::Trim => write!(f, "trim"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextCall {
    pub function: TextFn,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for TextCall {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, token, _) = parser
            .next_token()
            .expect("text call parsed without a current token");
        let function = TextFn::from(&token);

        let (arguments, end) = parse_call_args(parser)?;
        let location = SrcSpan { start, end };

        check_arity(
            &function.to_string(),
            function.arity(),
            arguments.len(),
            location,
        )?;

        Ok(Self {
            function,
            arguments,
            location,
        })
    }
}

impl Display for TextCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.function, display_args(&self.arguments))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugFn {
    Debug,
    Assert,
    Trace,
}

impl DebugFn {
    fn arity(&self) -> (usize, Option<usize>) {
        match self {
            DebugFn::Debug => (1, Some(1)),
            DebugFn::Assert => (1, Some(2)),
            DebugFn::Trace => (0, Some(0)),
        }
    }
}

impl From<&Token> for DebugFn {
    fn from(token: &Token) -> Self {
        match token {
            Token::Debug => DebugFn::Debug,
            Token::Assert => DebugFn::Assert,
            Token::Trace => DebugFn::Trace,
            _ => panic!("Invalid token to debug function conversion"),
        }
    }
}

impl Display for DebugFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebugFn::Debug => write!(f, "debug"),
            DebugFn::Assert => write!(f, "assert"),
            DebugFn::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugCall {
    pub function: DebugFn,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for DebugCall {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, token, _) = parser
            .next_token()
            .expect("debug call parsed without a current token");
        let function = DebugFn::from(&token);

        let (arguments, end) = parse_call_args(parser)?;
        let location = SrcSpan { start, end };

        check_arity(
            &function.to_string(),
            function.arity(),
            arguments.len(),
            location,
        )?;

        Ok(Self {
            function,
            arguments,
            location,
        })
    }
}

impl Display for DebugCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.function, display_args(&self.arguments))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for ArrayLiteral {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LBracket)?;

        let mut elements = vec![];
        if !matches!(parser.current_token, Some((_, Token::RBracket, _))) {
            loop {
                elements.push(Expression::parse(parser)?);
                if parser.expect_one(Token::Comma).is_err() {
                    break;
                }
            }
        }

        let (_, end) = parser.expect_one(Token::RBracket)?;

        Ok(Self {
            elements,
            location: SrcSpan { start, end },
        })
    }
}

impl Display for ArrayLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", display_args(&self.elements))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayFn {
    Push,
    Pop,
    Size,
    Get,
}

impl Display for ArrayFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayFn::Push => write!(f, "push"),
            ArrayFn::Pop => write!(f, "pop"),
            ArrayFn::Size => write!(f, "size"),
            ArrayFn::Get => write!(f, "get"),
        }
    }
}

/// Array operations keep their surface quirks: `push a 5` and `get a 0`
/// take no parentheses, while `pop(a)` and `size(a)` require them. `get`
/// additionally accepts the parenthesised form `get(a, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayOp {
    pub function: ArrayFn,
    pub array: Identifier,
    pub argument: Option<Box<Expression>>,
    pub location: SrcSpan,
}

impl<T: Iterator<Item = Spanned>> Parse<T> for ArrayOp {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, token, _) = parser
            .next_token()
            .expect("array op parsed without a current token");

        let function = match token {
            Token::Push => ArrayFn::Push,
            Token::Pop => ArrayFn::Pop,
            Token::Size => ArrayFn::Size,
            Token::Get => ArrayFn::Get,
            _ => panic!("Invalid token to array function conversion"),
        };

        let (array, argument, end) = match function {
            ArrayFn::Push => {
                let array = Identifier::from(parser.expect_ident()?);
                let argument = parse_value(parser)?;
                let end = argument.location().end;
                (array, Some(Box::new(argument)), end)
            }
            ArrayFn::Get => {
                if parser.expect_one(Token::LParen).is_ok() {
                    let array = Identifier::from(parser.expect_ident()?);
                    let _ = parser.expect_one(Token::Comma)?;
                    let argument = Expression::parse(parser)?;
                    let (_, end) = parser.expect_one(Token::RParen)?;
                    (array, Some(Box::new(argument)), end)
                } else {
                    let array = Identifier::from(parser.expect_ident()?);
                    let argument = parse_value(parser)?;
                    let end = argument.location().end;
                    (array, Some(Box::new(argument)), end)
                }
            }
            ArrayFn::Pop | ArrayFn::Size => {
                let _ = parser.expect_one(Token::LParen)?;
                let array = Identifier::from(parser.expect_ident()?);
                let (_, end) = parser.expect_one(Token::RParen)?;
                (array, None, end)
            }
        };

        Ok(Self {
            function,
            array,
            argument,
            location: SrcSpan { start, end },
        })
    }
}

impl Display for ArrayOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.function, &self.argument) {
            (ArrayFn::Push, Some(argument)) => write!(f, "push {} {}", self.array, argument),
            (ArrayFn::Get, Some(argument)) => write!(f, "get {} {}", self.array, argument),
            _ => write!(f, "{}({})", self.function, self.array),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Int { value: i64, location: SrcSpan },
    Float { value: f64, location: SrcSpan },
    Str(StrLit),
    Binary(Binary),
    Unary(Unary),
    Input(InputCall),
    Math(MathCall),
    Text(TextCall),
    Debug(DebugCall),
    ArrayLit(ArrayLiteral),
    Array(ArrayOp),
}

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Expression::Identifier(identifier) => identifier.location,
            Expression::Int { location, .. } => *location,
            Expression::Float { location, .. } => *location,
            Expression::Str(lit) => lit.location,
            Expression::Binary(binary) => binary.location,
            Expression::Unary(unary) => unary.location,
            Expression::Input(input) => input.location,
            Expression::Math(call) => call.location,
            Expression::Text(call) => call.location,
            Expression::Debug(call) => call.location,
            Expression::ArrayLit(lit) => lit.location,
            Expression::Array(op) => op.location,
        }
    }
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Expression {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        // A leading `-` negates the whole first term, so `- x + 2` reads
        // as `-(x + 2)`.
        let mut left = match &parser.current_token {
            Some((_, Token::Minus, _)) => {
                let (start, _) = parser.expect_one(Token::Minus)?;
                let expression = parse_term(parser)?;
                let end = expression.location().end;
                Expression::Unary(Unary {
                    operator: Token::Minus,
                    expression: Box::new(expression),
                    location: SrcSpan { start, end },
                })
            }
            _ => parse_term(parser)?,
        };

        // A single flat precedence level: comparisons and logical operators
        // chain left to right without ranking among themselves.
        while matches!(&parser.current_token, Some((_, tok, _)) if tok.is_comparison_operator()) {
            let (_, operator, _) = parser
                .next_token()
                .expect("comparison operator disappeared");
            let right = parse_term(parser)?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Identifier(identifier) => write!(f, "{identifier}"),
            Expression::Int { value, .. } => write!(f, "{value}"),
            Expression::Float { value, .. } => write!(f, "{value:?}"),
            Expression::Str(lit) => write!(f, "{lit}"),
            Expression::Binary(binary) => write!(f, "{binary}"),
            Expression::Unary(unary) => write!(f, "{unary}"),
            Expression::Input(input) => write!(f, "{input}"),
            Expression::Math(call) => write!(f, "{call}"),
            Expression::Text(call) => write!(f, "{call}"),
            Expression::Debug(call) => write!(f, "{call}"),
            Expression::ArrayLit(lit) => write!(f, "{lit}"),
            Expression::Array(op) => write!(f, "{op}"),
        }
    }
}

/// Term: factors chained by `+ - * / %`, all at one precedence level,
/// associating left.
pub fn parse_term<T: Iterator<Item = Spanned>>(
    parser: &mut Parser<T>,
) -> Result<Expression, ParseError> {
    let mut left = parse_factor(parser)?;

    while matches!(&parser.current_token, Some((_, tok, _)) if tok.is_term_operator()) {
        let (_, operator, _) = parser.next_token().expect("term operator disappeared");
        let right = parse_factor(parser)?;
        left = binary(left, operator, right);
    }

    Ok(left)
}

fn parse_factor<T: Iterator<Item = Spanned>>(
    parser: &mut Parser<T>,
) -> Result<Expression, ParseError> {
    if matches!(parser.current_token, Some((_, Token::LParen, _))) {
        let _ = parser.expect_one(Token::LParen)?;
        let expression = Expression::parse(parser)?;
        let _ = parser.expect_one(Token::RParen)?;
        return Ok(expression);
    }

    parse_value(parser)
}

/// Loop headers restrict their condition to a single relational comparison
/// between two terms.
pub fn parse_comparison<T: Iterator<Item = Spanned>>(
    parser: &mut Parser<T>,
) -> Result<Expression, ParseError> {
    let left = parse_term(parser)?;

    if matches!(&parser.current_token, Some((_, tok, _)) if tok.is_relational_operator()) {
        let (_, operator, _) = parser
            .next_token()
            .expect("relational operator disappeared");
        let right = parse_term(parser)?;
        return Ok(binary(left, operator, right));
    }

    Ok(left)
}

/// Value: a literal, identifier, builtin call, or unary minus over one.
pub fn parse_value<T: Iterator<Item = Spanned>>(
    parser: &mut Parser<T>,
) -> Result<Expression, ParseError> {
    match &parser.current_token {
        Some((_, Token::Int(_), _)) => {
            let (start, token, end) = parser.next_token().expect("int token disappeared");
            let Token::Int(value) = token else {
                unreachable!()
            };
            Ok(Expression::Int {
                value,
                location: SrcSpan { start, end },
            })
        }
        Some((_, Token::Float(_), _)) => {
            let (start, token, end) = parser.next_token().expect("float token disappeared");
            let Token::Float(value) = token else {
                unreachable!()
            };
            Ok(Expression::Float {
                value,
                location: SrcSpan { start, end },
            })
        }
        Some((_, Token::Str { .. }, _)) => {
            let (start, token, end) = parser.next_token().expect("string token disappeared");
            let Token::Str { value, raw } = token else {
                unreachable!()
            };
            Ok(Expression::Str(StrLit {
                value,
                raw,
                location: SrcSpan { start, end },
            }))
        }
        Some((_, Token::Ident(_), _)) => {
            Ok(Expression::Identifier(Identifier::from(parser.expect_ident()?)))
        }
        Some((_, Token::Input, _)) => Ok(Expression::Input(InputCall::parse(parser)?)),
        Some((_, Token::LBracket, _)) => Ok(Expression::ArrayLit(ArrayLiteral::parse(parser)?)),
        Some((_, tok, _)) if tok.is_math_function() => {
            Ok(Expression::Math(MathCall::parse(parser)?))
        }
        Some((_, tok, _)) if tok.is_text_function() => {
            Ok(Expression::Text(TextCall::parse(parser)?))
        }
        Some((_, tok, _)) if tok.is_debug_function() => {
            Ok(Expression::Debug(DebugCall::parse(parser)?))
        }
        Some((_, tok, _)) if tok.is_array_function() => {
            Ok(Expression::Array(ArrayOp::parse(parser)?))
        }
        Some((_, Token::Eof, _)) | None => {
            parse_error(ParseErrorType::UnexpectedEof, parser.current_span())
        }
        Some((start, tok, end)) => parse_error(
            ParseErrorType::UnexpectedToken {
                token: tok.clone(),
                expected: vec![
                    "a literal".into(),
                    "an identifier".into(),
                    "a builtin call".into(),
                ],
            },
            SrcSpan {
                start: *start,
                end: *end,
            },
        ),
    }
}

fn binary(left: Expression, operator: Token, right: Expression) -> Expression {
    let location = SrcSpan {
        start: left.location().start,
        end: right.location().end,
    };

    Expression::Binary(Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        location,
    })
}

fn parse_block<T: Iterator<Item = Spanned>>(
    parser: &mut Parser<T>,
) -> Result<(Vec<Statement>, SrcSpan), ParseError> {
    let (start, _) = parser.expect_one(Token::LBrace)?;

    let mut statements = vec![];
    loop {
        match &parser.current_token {
            Some((_, Token::RBrace, _)) => break,
            Some((_, Token::Eof, _)) | None => {
                return parse_error(ParseErrorType::UnexpectedEof, parser.current_span())
            }
            _ => statements.push(Statement::parse(parser)?),
        }
    }

    let (_, end) = parser.expect_one(Token::RBrace)?;

    Ok((statements, SrcSpan { start, end }))
}

fn parse_loop_assignment<T: Iterator<Item = Spanned>>(
    parser: &mut Parser<T>,
) -> Result<Assignment, ParseError> {
    let name = Identifier::from(parser.expect_ident()?);
    let _ = parser.expect_one(Token::Assign)?;
    let value = parse_term(parser)?;

    let location = SrcSpan {
        start: name.location.start,
        end: value.location().end,
    };

    Ok(Assignment {
        name,
        value,
        location,
    })
}

fn parse_call_args<T: Iterator<Item = Spanned>>(
    parser: &mut Parser<T>,
) -> Result<(Vec<Expression>, u32), ParseError> {
    let _ = parser.expect_one(Token::LParen)?;

    let mut arguments = vec![];
    if !matches!(parser.current_token, Some((_, Token::RParen, _))) {
        loop {
            arguments.push(Expression::parse(parser)?);
            if parser.expect_one(Token::Comma).is_err() {
                break;
            }
        }
    }

    let (_, end) = parser.expect_one(Token::RParen)?;

    Ok((arguments, end))
}

fn check_arity(
    function: &str,
    (min, max): (usize, Option<usize>),
    got: usize,
    span: SrcSpan,
) -> Result<(), ParseError> {
    let within = got >= min && max.map_or(true, |max| got <= max);
    if within {
        return Ok(());
    }

    let expected = match (min, max) {
        (min, Some(max)) if min == max => format!("exactly {min}"),
        (min, Some(max)) => format!("{min} to {max}"),
        (min, None) => format!("at least {min}"),
    };

    parse_error(
        ParseErrorType::WrongArgumentCount {
            function: function.into(),
            expected,
            got,
        },
        span,
    )
}

fn display_block(statements: &[Statement]) -> String {
    statements
        .iter()
        .map(|statement| statement.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn display_args(arguments: &[Expression]) -> String {
    arguments
        .iter()
        .map(|argument| argument.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
