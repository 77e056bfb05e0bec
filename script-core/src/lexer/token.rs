use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // <letter>{<letter>|<digit>}
    Ident(String),
    Int(i64),
    Float(f64),
    // value holds the unescaped text, raw the re-escaped spelling for
    // re-embedding the literal in rendered output
    Str { value: String, raw: String },
    // // line or /* block */
    Comment,

    // Statement keywords
    Set,   // set
    Print, // print
    If,    // if
    Else,  // else
    For,   // for
    While, // while
    Do,    // do (reserved, unused by the grammar)

    // Type names
    IntType,    // int
    FloatType,  // float
    CharType,   // char
    StringType, // string
    ArrayType,  // array

    Input, // input

    // Math builtins
    Sqrt,
    Pow,
    Abs,
    Round,
    Floor,
    Ceil,
    Random,
    Max,
    Min,

    // String builtins
    Length,
    Substring,
    Concat,
    Uppercase,
    Lowercase,
    Trim,

    // Array builtins
    Push,
    Pop,
    Size,
    Get,

    // Debug builtins
    Debug,
    Assert,
    Trace,

    // Arithmetic operators
    Plus,     // +
    Minus,    // -
    Asterisk, // *
    Slash,    // /
    Percent,  // %

    Assign, // =

    // Comparison operators
    Equal,              // ==
    NotEqual,           // !=
    LessThan,           // <
    LessThanOrEqual,    // <=
    GreaterThan,        // >
    GreaterThanOrEqual, // >=

    // Logical operators
    And, // &&
    Or,  // ||

    Increment, // ++
    Decrement, // --

    // Leftover single-character operators
    Bang,      // !
    Ampersand, // &
    Pipe,      // |

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Semicolon, // ;

    // Brackets, a distinct kind used only for array literals
    LBracket, // [
    RBracket, // ]

    Eof,
}

pub fn str_to_keyword(word: &str) -> Option<Token> {
    Some(match word {
        "set" => Token::Set,
        "print" => Token::Print,
        "if" => Token::If,
        "else" => Token::Else,
        "for" => Token::For,
        "while" => Token::While,
        "do" => Token::Do,

        "int" => Token::IntType,
        "float" => Token::FloatType,
        "char" => Token::CharType,
        "string" => Token::StringType,
        "array" => Token::ArrayType,

        "input" => Token::Input,

        "sqrt" => Token::Sqrt,
        "pow" => Token::Pow,
        "abs" => Token::Abs,
        "round" => Token::Round,
        "floor" => Token::Floor,
        "ceil" => Token::Ceil,
        "random" => Token::Random,
        "max" => Token::Max,
        "min" => Token::Min,

        "length" => Token::Length,
        "substring" => Token::Substring,
        "concat" => Token::Concat,
        "uppercase" => Token::Uppercase,
        "lowercase" => Token::Lowercase,
        "trim" => Token::Trim,

        "push" => Token::Push,
        "pop" => Token::Pop,
        "size" => Token::Size,
        "get" => Token::Get,

        "debug" => Token::Debug,
        "assert" => Token::Assert,
        "trace" => Token::Trace,

        _ => return None,
    })
}

impl Token {
    pub fn is_variable_type(&self) -> bool {
        matches!(
            self,
            Token::IntType
                | Token::FloatType
                | Token::CharType
                | Token::StringType
                | Token::ArrayType
        )
    }

    pub fn is_math_function(&self) -> bool {
        matches!(
            self,
            Token::Sqrt
                | Token::Pow
                | Token::Abs
                | Token::Round
                | Token::Floor
                | Token::Ceil
                | Token::Random
                | Token::Max
                | Token::Min
        )
    }

    pub fn is_text_function(&self) -> bool {
        matches!(
            self,
            Token::Length
                | Token::Substring
                | Token::Concat
                | Token::Uppercase
                | Token::Lowercase
                | Token::Trim
        )
    }

    pub fn is_array_function(&self) -> bool {
        matches!(self, Token::Push | Token::Pop | Token::Size | Token::Get)
    }

    pub fn is_debug_function(&self) -> bool {
        matches!(self, Token::Debug | Token::Assert | Token::Trace)
    }

    /// Relational operators, the only ones allowed in the restricted
    /// `Comparison` rule used by `for` and `while` conditions.
    pub fn is_relational_operator(&self) -> bool {
        matches!(
            self,
            Token::Equal
                | Token::NotEqual
                | Token::LessThan
                | Token::LessThanOrEqual
                | Token::GreaterThan
                | Token::GreaterThanOrEqual
        )
    }

    /// Operators that chain at the top `Expression` level: relational plus
    /// logical, all at one precedence level.
    pub fn is_comparison_operator(&self) -> bool {
        self.is_relational_operator() || matches!(self, Token::And | Token::Or)
    }

    pub fn is_term_operator(&self) -> bool {
        matches!(
            self,
            Token::Plus | Token::Minus | Token::Asterisk | Token::Slash | Token::Percent
        )
    }

    pub fn is_reserved_word(&self) -> bool {
        match self {
            Token::Ident(_) | Token::Int(_) | Token::Float(_) | Token::Str { .. } => false,
            _ => str_to_keyword(&self.as_literal()).is_some(),
        }
    }

    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => value.clone(),
            Token::Int(value) => format!("{}", value),
            Token::Float(value) => format!("{}", value),
            Token::Str { raw, .. } => format!("\"{}\"", raw),
            Token::Comment => "Comment".to_string(),

            Token::Set => "set".to_string(),
            Token::Print => "print".to_string(),
            Token::If => "if".to_string(),
            Token::Else => "else".to_string(),
            Token::For => "for".to_string(),
            Token::While => "while".to_string(),
            Token::Do => "do".to_string(),

            Token::IntType => "int".to_string(),
            Token::FloatType => "float".to_string(),
            Token::CharType => "char".to_string(),
            Token::StringType => "string".to_string(),
            Token::ArrayType => "array".to_string(),

            Token::Input => "input".to_string(),

            Token::Sqrt => "sqrt".to_string(),
            Token::Pow => "pow".to_string(),
            Token::Abs => "abs".to_string(),
            Token::Round => "round".to_string(),
            Token::Floor => "floor".to_string(),
            Token::Ceil => "ceil".to_string(),
            Token::Random => "random".to_string(),
            Token::Max => "max".to_string(),
            Token::Min => "min".to_string(),

            Token::Length => "length".to_string(),
            Token::Substring => "substring".to_string(),
            Token::Concat => "concat".to_string(),
            Token::Uppercase => "uppercase".to_string(),
            Token::Lowercase => "lowercase".to_string(),
            Token::Trim => "trim".to_string(),

            Token::Push => "push".to_string(),
            Token::Pop => "pop".to_string(),
            Token::Size => "size".to_string(),
            Token::Get => "get".to_string(),

            Token::Debug => "debug".to_string(),
            Token::Assert => "assert".to_string(),
            Token::Trace => "trace".to_string(),

            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Asterisk => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Percent => "%".to_string(),
            Token::Assign => "=".to_string(),
            Token::Equal => "==".to_string(),
            Token::NotEqual => "!=".to_string(),
            Token::LessThan => "<".to_string(),
            Token::LessThanOrEqual => "<=".to_string(),
            Token::GreaterThan => ">".to_string(),
            Token::GreaterThanOrEqual => ">=".to_string(),
            Token::And => "&&".to_string(),
            Token::Or => "||".to_string(),
            Token::Increment => "++".to_string(),
            Token::Decrement => "--".to_string(),
            Token::Bang => "!".to_string(),
            Token::Ampersand => "&".to_string(),
            Token::Pipe => "|".to_string(),

            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBrace => "{".to_string(),
            Token::RBrace => "}".to_string(),
            Token::Comma => ",".to_string(),
            Token::Semicolon => ";".to_string(),
            Token::LBracket => "[".to_string(),
            Token::RBracket => "]".to_string(),

            Token::Eof => "\0".to_string(),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_literal())
    }
}
