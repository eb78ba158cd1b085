use std::collections::HashMap;

use thiserror::Error;

use super::OutputSink;
use super::parser::{BinOp, Expr, Stmt};
use super::value::Value;

/// Longest string a repetition may produce, in bytes.
const MAX_REPEAT_LEN: usize = 1 << 20;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum RuntimeError {
    #[error("name '{0}' is not defined")]
    UndefinedName(String),

    #[error("'{0}' object is not callable")]
    NotCallable(&'static str),

    #[error("unsupported operand type(s) for {op}: '{lhs}' and '{rhs}'")]
    UnsupportedOperands {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("bad operand type for unary -: '{0}'")]
    BadUnaryOperand(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    #[error("can't multiply sequence by non-int of type '{0}'")]
    SequenceRepeat(&'static str),

    #[error("repeated string is too long")]
    RepeatTooLong,

    #[error("integer overflow")]
    IntegerOverflow,

    #[error("execution exceeded the step limit of {0}")]
    StepLimitExceeded(u64),
}

/// Tree-walking evaluator for the print dialect.
///
/// All output flows through the sink handed in at construction; the
/// evaluator has no other observable effect. Every expression evaluation
/// charges one step against the budget so runaway code terminates with a
/// `StepLimitExceeded` error instead of hanging the session.
pub struct Evaluator<'a> {
    sink: &'a mut dyn OutputSink,
    vars: HashMap<String, Value>,
    step_limit: u64,
    steps: u64,
}

impl<'a> Evaluator<'a> {
    #[must_use]
    pub fn new(sink: &'a mut dyn OutputSink, step_limit: u64) -> Self {
        Self {
            sink,
            vars: HashMap::new(),
            step_limit,
            steps: 0,
        }
    }

    /// Run statements in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first `RuntimeError`; output emitted before the failure
    /// is kept in the sink.
    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            match stmt {
                Stmt::Assign { name, value } => {
                    let value = self.eval(value)?;
                    self.vars.insert(name.clone(), value);
                }
                Stmt::Expr(expr) => {
                    self.eval(expr)?;
                }
            }
        }
        Ok(())
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(RuntimeError::StepLimitExceeded(self.step_limit));
        }

        match expr {
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Name(name) => self
                .vars
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedName(name.clone())),
            Expr::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                self.call(name, values)
            }
            Expr::Neg(operand) => neg(self.eval(operand)?),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                match op {
                    BinOp::Add => add(lhs, rhs),
                    BinOp::Sub => sub(lhs, rhs),
                    BinOp::Mul => mul(lhs, rhs),
                    BinOp::Div => div(lhs, rhs),
                }
            }
        }
    }

    fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if name == "print" {
            let line = args
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            self.sink.emit(line);
            return Ok(Value::None);
        }
        match self.vars.get(name) {
            Some(value) => Err(RuntimeError::NotCallable(value.type_name())),
            None => Err(RuntimeError::UndefinedName(name.to_owned())),
        }
    }
}

/// Numeric view used by the arithmetic operators. Bools participate as ints,
/// matching Python.
enum Num {
    Int(i64),
    Float(f64),
}

fn as_num(value: &Value) -> Option<Num> {
    match value {
        Value::Int(i) => Some(Num::Int(*i)),
        Value::Bool(b) => Some(Num::Int(i64::from(*b))),
        Value::Float(f) => Some(Num::Float(*f)),
        _ => None,
    }
}

fn unsupported(op: &'static str, lhs: &Value, rhs: &Value) -> RuntimeError {
    RuntimeError::UnsupportedOperands {
        op,
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    }
}

fn add(lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    if let (Value::Str(a), Value::Str(b)) = (&lhs, &rhs) {
        return Ok(Value::Str(format!("{a}{b}")));
    }
    match (as_num(&lhs), as_num(&rhs)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => a
            .checked_add(b)
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow),
        (Some(a), Some(b)) => Ok(Value::Float(to_f64(a) + to_f64(b))),
        _ => Err(unsupported("+", &lhs, &rhs)),
    }
}

fn sub(lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    match (as_num(&lhs), as_num(&rhs)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => a
            .checked_sub(b)
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow),
        (Some(a), Some(b)) => Ok(Value::Float(to_f64(a) - to_f64(b))),
        _ => Err(unsupported("-", &lhs, &rhs)),
    }
}

fn mul(lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    match (&lhs, &rhs) {
        (Value::Str(s), other) | (other, Value::Str(s)) => match as_num(other) {
            Some(Num::Int(n)) => repeat(s, n),
            Some(Num::Float(_)) => Err(RuntimeError::SequenceRepeat(other.type_name())),
            None => Err(unsupported("*", &lhs, &rhs)),
        },
        _ => match (as_num(&lhs), as_num(&rhs)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => a
                .checked_mul(b)
                .map(Value::Int)
                .ok_or(RuntimeError::IntegerOverflow),
            (Some(a), Some(b)) => Ok(Value::Float(to_f64(a) * to_f64(b))),
            _ => Err(unsupported("*", &lhs, &rhs)),
        },
    }
}

fn div(lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    match (as_num(&lhs), as_num(&rhs)) {
        (Some(a), Some(b)) => {
            let divisor = to_f64(b);
            if divisor == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            // True division always yields a float, as in Python 3.
            Ok(Value::Float(to_f64(a) / divisor))
        }
        _ => Err(unsupported("/", &lhs, &rhs)),
    }
}

fn neg(value: Value) -> Result<Value, RuntimeError> {
    match as_num(&value) {
        Some(Num::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow),
        Some(Num::Float(f)) => Ok(Value::Float(-f)),
        None => Err(RuntimeError::BadUnaryOperand(value.type_name())),
    }
}

fn repeat(s: &str, count: i64) -> Result<Value, RuntimeError> {
    if count <= 0 {
        return Ok(Value::Str(String::new()));
    }
    let count = usize::try_from(count).map_err(|_| RuntimeError::RepeatTooLong)?;
    if s.len().saturating_mul(count) > MAX_REPEAT_LEN {
        return Err(RuntimeError::RepeatTooLong);
    }
    Ok(Value::Str(s.repeat(count)))
}

fn to_f64(num: Num) -> f64 {
    match num {
        Num::Int(i) => i as f64,
        Num::Float(f) => f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::LineBuffer;
    use crate::sandbox::parser::parse;

    fn run(source: &str) -> (Vec<String>, Result<(), RuntimeError>) {
        let mut buffer = LineBuffer::new();
        let stmts = parse(source).unwrap();
        let result = Evaluator::new(&mut buffer, 10_000).run(&stmts);
        (buffer.into_lines(), result)
    }

    #[test]
    fn print_joins_arguments_with_spaces() {
        let (lines, result) = run("print('2 + 2 =', 2 + 2)");
        result.unwrap();
        assert_eq!(lines, vec!["2 + 2 = 4"]);
    }

    #[test]
    fn print_without_arguments_emits_empty_line() {
        let (lines, result) = run("print('Start')\nprint()\nprint('End')");
        result.unwrap();
        assert_eq!(lines, vec!["Start", "", "End"]);
    }

    #[test]
    fn division_yields_float() {
        let (lines, result) = run("print(84 / 2)");
        result.unwrap();
        assert_eq!(lines, vec!["42.0"]);
    }

    #[test]
    fn string_repetition_works_in_both_orders() {
        let (lines, result) = run("print('Ha' * 3)\nprint(2 * 'ho')");
        result.unwrap();
        assert_eq!(lines, vec!["HaHaHa", "hoho"]);
    }

    #[test]
    fn string_concatenation() {
        let (lines, result) = run("print('Hello' + 'World')");
        result.unwrap();
        assert_eq!(lines, vec!["HelloWorld"]);
    }

    #[test]
    fn assignment_and_lookup() {
        let (lines, result) = run("x = 6 * 7\nprint(x)");
        result.unwrap();
        assert_eq!(lines, vec!["42"]);
    }

    #[test]
    fn bools_print_and_count_as_ints() {
        let (lines, result) = run("print('Python', 2025, True)\nprint(True + True)");
        result.unwrap();
        assert_eq!(lines, vec!["Python 2025 True", "2"]);
    }

    #[test]
    fn undefined_name_fails_but_keeps_prior_output() {
        let (lines, result) = run("print('before')\nprint(missing)");
        assert_eq!(result, Err(RuntimeError::UndefinedName("missing".into())));
        assert_eq!(lines, vec!["before"]);
    }

    #[test]
    fn calling_a_variable_is_not_callable() {
        let (_, result) = run("x = 1\nx()");
        assert_eq!(result, Err(RuntimeError::NotCallable("int")));
    }

    #[test]
    fn division_by_zero() {
        let (_, result) = run("print(1 / 0)");
        assert_eq!(result, Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn adding_str_and_int_is_unsupported() {
        let (_, result) = run("print('n' + 1)");
        assert_eq!(
            result,
            Err(RuntimeError::UnsupportedOperands {
                op: "+",
                lhs: "str",
                rhs: "int",
            })
        );
    }

    #[test]
    fn repeating_by_float_is_rejected() {
        let (_, result) = run("print('Ha' * 2.0)");
        assert_eq!(result, Err(RuntimeError::SequenceRepeat("float")));
    }

    #[test]
    fn huge_repetition_is_bounded() {
        let (_, result) = run("print('Ha' * 999999999)");
        assert_eq!(result, Err(RuntimeError::RepeatTooLong));
    }

    #[test]
    fn step_limit_stops_evaluation() {
        let mut buffer = LineBuffer::new();
        let stmts = parse("print(1 + 1 + 1 + 1 + 1 + 1)").unwrap();
        let result = Evaluator::new(&mut buffer, 3).run(&stmts);
        assert_eq!(result, Err(RuntimeError::StepLimitExceeded(3)));
    }
}
