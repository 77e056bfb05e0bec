use thiserror::Error;

/// Failures raised while an `ExecutableProgram` is running. They propagate
/// unchanged to the caller of `execute`; no output produced before the
/// failure is surfaced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("No input provided")]
    NoInputProvided,

    #[error("Assertion failed: {message}")]
    AssertionFailed { message: String },

    #[error("Cannot pop from an empty array")]
    EmptyArray,

    #[error("Array index {index} out of bounds for length {size}")]
    IndexOutOfBounds { index: i64, size: usize },

    #[error("Unknown operator `{operator}`")]
    UnknownOperator { operator: String },

    #[error("Variable `{name}` is not defined")]
    UndefinedVariable { name: String },
}
