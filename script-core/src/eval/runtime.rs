use rand::Rng;

use crate::{
    environment::prelude::{Environment, Value},
    lower::prelude::{ArithOp, CompareOp, ExecutableProgram, Expr, LogicOp, Op},
    parser::prelude::{ArrayFn, DebugFn, MathFn, TextFn, VarType},
};

use super::error::RuntimeError;
use super::input::{InputSource, StdinInput};

/// Everything a finished run produced: the printed output sequence, and
/// the diagnostics channel fed by `debug`/`trace`. The two are kept apart
/// so a harness can route diagnostics to stderr.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Execution {
    pub output: Vec<String>,
    pub diagnostics: Vec<String>,
}

/// Run a lowered program against a fresh environment, reading `input()`
/// lines from stdin. Returns the accumulated output, or the first runtime
/// error; no partial output survives a failure.
pub fn execute(program: &ExecutableProgram) -> Result<Execution, RuntimeError> {
    execute_with_input(program, &mut StdinInput)
}

pub fn execute_with_input(
    program: &ExecutableProgram,
    input: &mut dyn InputSource,
) -> Result<Execution, RuntimeError> {
    let mut evaluator = Evaluator::new(input);
    evaluator.run(&program.ops)?;

    Ok(Execution {
        output: evaluator.output,
        diagnostics: evaluator.diagnostics,
    })
}

struct Evaluator<'a> {
    environment: Environment,
    output: Vec<String>,
    diagnostics: Vec<String>,
    input: &'a mut dyn InputSource,
}

impl<'a> Evaluator<'a> {
    fn new(input: &'a mut dyn InputSource) -> Self {
        Self {
            environment: Environment::new(),
            output: vec![],
            diagnostics: vec![],
            input,
        }
    }

    fn run(&mut self, ops: &[Op]) -> Result<(), RuntimeError> {
        for op in ops {
            self.exec(op)?;
        }
        Ok(())
    }

    fn exec(&mut self, op: &Op) -> Result<(), RuntimeError> {
        match op {
            Op::Declare {
                var_type,
                name,
                value,
            } => {
                let value = match value {
                    Some(value) => {
                        let value = self.eval(value)?;
                        coerce(*var_type, value)?
                    }
                    None => Value::Array { values: vec![] },
                };
                self.environment.set(name, value);
            }

            // Assigning declares the name if it does not exist yet; only
            // reads of unknown names fail.
            Op::Assign { name, value } => {
                let value = self.eval(value)?;
                self.environment.set(name, value);
            }

            Op::Print(expression) => {
                let value = self.eval(expression)?;
                self.output.push(value.to_string());
            }

            Op::If {
                condition,
                consequence,
                alternative,
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.run(consequence)?;
                } else if let Some(alternative) = alternative {
                    self.run(alternative)?;
                }
            }

            Op::For {
                init,
                condition,
                increment,
                body,
            } => {
                let value = self.eval(&init.1)?;
                self.environment.set(&init.0, value);

                while self.eval(condition)?.is_truthy() {
                    self.run(body)?;

                    let value = self.eval(&increment.1)?;
                    self.environment.set(&increment.0, value);
                }
            }

            Op::While { condition, body } => {
                while self.eval(condition)?.is_truthy() {
                    self.run(body)?;
                }
            }

            Op::Expr(expression) => {
                let _ = self.eval(expression)?;
            }
        }

        Ok(())
    }

    fn eval(&mut self, expression: &Expr) -> Result<Value, RuntimeError> {
        match expression {
            Expr::Int(value) => Ok(Value::Int { value: *value }),
            Expr::Float(value) => Ok(Value::Float { value: *value }),
            Expr::Str(value) => Ok(Value::Str {
                value: value.clone(),
            }),

            Expr::Var(name) => match self.environment.get(name) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::UndefinedVariable { name: name.clone() }),
            },

            Expr::Neg(expression) => match self.eval(expression)? {
                Value::Int { value } => Ok(Value::Int { value: -value }),
                Value::Float { value } => Ok(Value::Float { value: -value }),
                found => Err(RuntimeError::TypeMismatch {
                    expected: "a number",
                    found: found.type_name().to_string(),
                }),
            },

            Expr::Arith { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                safe_arithmetic(left, *op, right)
            }

            Expr::Compare { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                compare(left, *op, right)
            }

            // Logic short-circuits: the right operand is only evaluated
            // when the left one does not decide the outcome.
            Expr::Logic { op, left, right } => {
                let left = self.eval(left)?.is_truthy();
                let result = match op {
                    LogicOp::And => left && self.eval(right)?.is_truthy(),
                    LogicOp::Or => left || self.eval(right)?.is_truthy(),
                };
                Ok(bool_value(result))
            }

            Expr::Input { prompt } => {
                let line = self
                    .input
                    .read(prompt.as_deref())
                    .ok_or(RuntimeError::NoInputProvided)?;
                Ok(parse_input(&line))
            }

            Expr::Math {
                function,
                arguments,
            } => self.eval_math(*function, arguments),

            Expr::Text {
                function,
                arguments,
            } => self.eval_text(*function, arguments),

            Expr::Debug {
                function,
                arguments,
            } => self.eval_debug(*function, arguments),

            Expr::ArrayLit(elements) => {
                let values = elements
                    .iter()
                    .map(|element| self.eval(element))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array { values })
            }

            Expr::Array {
                function,
                array,
                argument,
            } => self.eval_array(*function, array, argument.as_deref()),
        }
    }

    fn eval_math(&mut self, function: MathFn, arguments: &[Expr]) -> Result<Value, RuntimeError> {
        let mut numbers = Vec::with_capacity(arguments.len());
        for argument in arguments {
            numbers.push(number(self.eval(argument)?)?);
        }

        let value = match function {
            MathFn::Sqrt => numbers[0].sqrt(),
            MathFn::Pow => numbers[0].powf(numbers[1]),
            MathFn::Abs => numbers[0].abs(),
            // The rounding family lands on a whole number, so it produces
            // an int value, not a whole float.
            MathFn::Round => {
                return Ok(Value::Int {
                    value: numbers[0].round() as i64,
                })
            }
            MathFn::Floor => {
                return Ok(Value::Int {
                    value: numbers[0].floor() as i64,
                })
            }
            MathFn::Ceil => {
                return Ok(Value::Int {
                    value: numbers[0].ceil() as i64,
                })
            }
            MathFn::Random => rand::thread_rng().gen::<f64>(),
            MathFn::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            MathFn::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
        };

        Ok(Value::Float { value })
    }

    fn eval_text(&mut self, function: TextFn, arguments: &[Expr]) -> Result<Value, RuntimeError> {
        match function {
            TextFn::Length => {
                let text = text(self.eval(&arguments[0])?)?;
                Ok(Value::Int {
                    value: text.chars().count() as i64,
                })
            }
            TextFn::Concat => {
                let mut result = String::new();
                for argument in arguments {
                    result.push_str(&self.eval(argument)?.to_string());
                }
                Ok(Value::Str { value: result })
            }
            TextFn::Substring => {
                let chars: Vec<char> = text(self.eval(&arguments[0])?)?.chars().collect();
                let mut start = index_within(number(self.eval(&arguments[1])?)?, chars.len());
                let mut end = match arguments.get(2) {
                    Some(argument) => index_within(number(self.eval(argument)?)?, chars.len()),
                    None => chars.len(),
                };
                if start > end {
                    std::mem::swap(&mut start, &mut end);
                }
                Ok(Value::Str {
                    value: chars[start..end].iter().collect(),
                })
            }
            TextFn::Uppercase => {
                let text = text(self.eval(&arguments[0])?)?;
                Ok(Value::Str {
                    value: text.to_uppercase(),
                })
            }
            TextFn::Lowercase => {
                let text = text(self.eval(&arguments[0])?)?;
                Ok(Value::Str {
                    value: text.to_lowercase(),
                })
            }
            TextFn::Trim => {
                let text = text(self.eval(&arguments[0])?)?;
                Ok(Value::Str {
                    value: text.trim().to_string(),
                })
            }
        }
    }

    fn eval_debug(&mut self, function: DebugFn, arguments: &[Expr]) -> Result<Value, RuntimeError> {
        match function {
            DebugFn::Debug => {
                let value = self.eval(&arguments[0])?;
                self.diagnostics.push(format!("[debug] {value}"));
                Ok(value)
            }
            DebugFn::Assert => {
                let condition = self.eval(&arguments[0])?;
                if condition.is_truthy() {
                    return Ok(bool_value(true));
                }
                let message = match arguments.get(1) {
                    Some(argument) => self.eval(argument)?.to_string(),
                    None => "assertion is false".to_string(),
                };
                Err(RuntimeError::AssertionFailed { message })
            }
            DebugFn::Trace => {
                self.diagnostics.push("[trace]".to_string());
                Ok(bool_value(false))
            }
        }
    }

    fn eval_array(
        &mut self,
        function: ArrayFn,
        array: &str,
        argument: Option<&Expr>,
    ) -> Result<Value, RuntimeError> {
        match function {
            ArrayFn::Push => {
                let value = self.eval(argument.expect("push lowered without an argument"))?;
                let values = self.array_mut(array)?;
                values.push(value);
                Ok(Value::Int {
                    value: values.len() as i64,
                })
            }
            ArrayFn::Pop => {
                let values = self.array_mut(array)?;
                values.pop().ok_or(RuntimeError::EmptyArray)
            }
            ArrayFn::Size => {
                let values = self.array_mut(array)?;
                Ok(Value::Int {
                    value: values.len() as i64,
                })
            }
            ArrayFn::Get => {
                let index = number(self.eval(argument.expect("get lowered without an argument"))?)?
                    .trunc() as i64;
                let values = self.array_mut(array)?;
                if index < 0 || index as usize >= values.len() {
                    return Err(RuntimeError::IndexOutOfBounds {
                        index,
                        size: values.len(),
                    });
                }
                Ok(values[index as usize].clone())
            }
        }
    }

    fn array_mut(&mut self, name: &str) -> Result<&mut Vec<Value>, RuntimeError> {
        match self.environment.get_mut(name) {
            Some(Value::Array { values }) => Ok(values),
            Some(found) => Err(RuntimeError::TypeMismatch {
                expected: "array",
                found: found.type_name().to_string(),
            }),
            None => Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }
}

/// Checked arithmetic: both operands must be numeric, and `/` and `%` fail
/// on a zero divisor. Integer `+ - * %` stay integral (widening to float on
/// overflow); `/` always produces a float.
pub fn safe_arithmetic(left: Value, op: ArithOp, right: Value) -> Result<Value, RuntimeError> {
    let (Some(l), Some(r)) = (left.as_number(), right.as_number()) else {
        let found = if left.as_number().is_none() {
            left.type_name()
        } else {
            right.type_name()
        };
        return Err(RuntimeError::TypeMismatch {
            expected: "a number",
            found: found.to_string(),
        });
    };

    if matches!(op, ArithOp::Div | ArithOp::Mod) && r == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }

    if let (Value::Int { value: l }, Value::Int { value: r }) = (&left, &right) {
        let int_result = match op {
            ArithOp::Add => l.checked_add(*r),
            ArithOp::Sub => l.checked_sub(*r),
            ArithOp::Mul => l.checked_mul(*r),
            // i64::MIN % -1 overflows like the other operators.
            ArithOp::Mod => l.checked_rem(*r),
            ArithOp::Div => None,
        };
        if let Some(value) = int_result {
            return Ok(Value::Int { value });
        }
    }

    let value = match op {
        ArithOp::Add => l + r,
        ArithOp::Sub => l - r,
        ArithOp::Mul => l * r,
        ArithOp::Div => l / r,
        ArithOp::Mod => l % r,
    };

    Ok(Value::Float { value })
}

fn compare(left: Value, op: CompareOp, right: Value) -> Result<Value, RuntimeError> {
    let result = match op {
        CompareOp::Equal => values_equal(&left, &right),
        CompareOp::NotEqual => !values_equal(&left, &right),
        // Numbers order numerically, strings and chars lexicographically.
        // Any other pairing has no defined order.
        CompareOp::LessThan
        | CompareOp::LessThanOrEqual
        | CompareOp::GreaterThan
        | CompareOp::GreaterThanOrEqual => {
            if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
                match op {
                    CompareOp::LessThan => l < r,
                    CompareOp::LessThanOrEqual => l <= r,
                    CompareOp::GreaterThan => l > r,
                    CompareOp::GreaterThanOrEqual => l >= r,
                    _ => unreachable!(),
                }
            } else if let (Some(l), Some(r)) = (left.as_text(), right.as_text()) {
                match op {
                    CompareOp::LessThan => l < r,
                    CompareOp::LessThanOrEqual => l <= r,
                    CompareOp::GreaterThan => l > r,
                    CompareOp::GreaterThanOrEqual => l >= r,
                    _ => unreachable!(),
                }
            } else {
                return Err(RuntimeError::UnknownOperator {
                    operator: op.to_string(),
                });
            }
        }
    };

    Ok(bool_value(result))
}

/// Numbers compare numerically across int/float; other kinds compare only
/// within their own kind.
fn values_equal(left: &Value, right: &Value) -> bool {
    if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
        return l == r;
    }

    match (left, right) {
        (Value::Str { value: l }, Value::Str { value: r }) => l == r,
        (Value::Char { value: l }, Value::Char { value: r }) => l == r,
        (Value::Array { values: l }, Value::Array { values: r }) => {
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| values_equal(l, r))
        }
        _ => false,
    }
}

/// The language has no boolean type: comparisons and logic produce 1 or 0.
fn bool_value(value: bool) -> Value {
    Value::Int {
        value: value as i64,
    }
}

/// Input text becomes the narrowest value it parses as: int, then float,
/// then the raw string.
fn parse_input(line: &str) -> Value {
    let trimmed = line.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Value::Int { value };
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        return Value::Float { value };
    }
    Value::Str {
        value: line.to_string(),
    }
}

fn coerce(var_type: VarType, value: Value) -> Result<Value, RuntimeError> {
    match var_type {
        VarType::Int => match value {
            Value::Int { .. } => Ok(value),
            Value::Float { value } => Ok(Value::Int {
                value: value.trunc() as i64,
            }),
            Value::Str { ref value } => match value.trim().parse::<f64>() {
                Ok(parsed) => Ok(Value::Int {
                    value: parsed.trunc() as i64,
                }),
                Err(_) => Err(RuntimeError::TypeMismatch {
                    expected: "int",
                    found: "string".to_string(),
                }),
            },
            found => Err(mismatch("int", &found)),
        },
        VarType::Float => match value {
            Value::Float { .. } => Ok(value),
            Value::Int { value } => Ok(Value::Float {
                value: value as f64,
            }),
            Value::Str { ref value } => match value.trim().parse::<f64>() {
                Ok(value) => Ok(Value::Float { value }),
                Err(_) => Err(RuntimeError::TypeMismatch {
                    expected: "float",
                    found: "string".to_string(),
                }),
            },
            found => Err(mismatch("float", &found)),
        },
        VarType::Char => match value.to_string().chars().next() {
            Some(value) => Ok(Value::Char { value }),
            None => Err(mismatch("char", &value)),
        },
        VarType::Str => Ok(Value::Str {
            value: value.to_string(),
        }),
        VarType::Array => match value {
            Value::Array { .. } => Ok(value),
            found => Err(mismatch("array", &found)),
        },
    }
}

fn mismatch(expected: &'static str, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected,
        found: found.type_name().to_string(),
    }
}

fn number(value: Value) -> Result<f64, RuntimeError> {
    value.as_number().ok_or_else(|| mismatch("a number", &value))
}

fn text(value: Value) -> Result<String, RuntimeError> {
    match value {
        Value::Str { value } => Ok(value),
        Value::Char { value } => Ok(value.to_string()),
        found => Err(mismatch("a string", &found)),
    }
}

/// Clamp a (possibly fractional or negative) numeric index into `0..=len`.
fn index_within(value: f64, len: usize) -> usize {
    let index = value.trunc();
    if index <= 0.0 {
        0
    } else if index as usize >= len {
        len
    } else {
        index as usize
    }
}
