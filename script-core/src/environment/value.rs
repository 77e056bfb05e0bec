use std::fmt::Display;

/// A runtime value. The language is dynamically typed at the value level:
/// declarations coerce their initializer, but assignments may rebind a name
/// to any kind of value afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int { value: i64 },
    Float { value: f64 },
    Char { value: char },
    Str { value: String },
    Array { values: Vec<Value> },
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int { .. } => "int",
            Value::Float { .. } => "float",
            Value::Char { .. } => "char",
            Value::Str { .. } => "string",
            Value::Array { .. } => "array",
        }
    }

    /// Zero numbers and empty strings are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int { value } => *value != 0,
            Value::Float { value } => *value != 0.0,
            Value::Str { value } => !value.is_empty(),
            Value::Char { .. } | Value::Array { .. } => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int { value } => Some(*value as f64),
            Value::Float { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Str { value } => Some(value.clone()),
            Value::Char { value } => Some(value.to_string()),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int { value } => write!(f, "{value}"),
            // Whole floats print without a fractional part, so `4 / 2`
            // renders as `2` rather than `2.0`.
            Value::Float { value } => {
                if value.is_finite() && value.fract() == 0.0 {
                    write!(f, "{value:.0}")
                } else {
                    write!(f, "{value}")
                }
            }
            Value::Char { value } => write!(f, "{value}"),
            Value::Str { value } => write!(f, "{value}"),
            Value::Array { values } => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
        }
    }
}
