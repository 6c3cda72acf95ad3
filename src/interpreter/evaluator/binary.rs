use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Node},
    interpreter::{
        context::Context,
        evaluator::core::{EvalResult, InContext, Interpreter},
        position::Span,
        value::{core::Value, ops::OpResult},
    },
};

impl Interpreter {
    /// Applies a binary operator to two values.
    ///
    /// Both operands are always evaluated before this is called, including for
    /// `and` and `or`. The operand kinds decide everything else; see the
    /// methods in [`crate::interpreter::value::ops`].
    ///
    /// # Example
    /// ```
    /// use peridot::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let sum = Interpreter::apply_binary(BinaryOperator::Add, &Value::int(3), &Value::int(4));
    /// assert_eq!(sum.unwrap(), Value::int(7));
    ///
    /// let mixed = Interpreter::apply_binary(BinaryOperator::Add, &Value::int(1), &Value::float(2.0));
    /// assert_eq!(mixed.unwrap_err().kind.name(), "OperationError");
    /// ```
    pub fn apply_binary(op: BinaryOperator, left: &Value, right: &Value) -> OpResult {
        match op {
            BinaryOperator::Add => left.add(right),
            BinaryOperator::Subtract => left.subtract(right),
            BinaryOperator::Multiply => left.multiply(right),
            BinaryOperator::Divide => left.divide(right),
            BinaryOperator::Power => left.raised(right),
            BinaryOperator::Equal => left.equals(right),
            BinaryOperator::NotEqual => left.not_equals(right),
            BinaryOperator::Less => left.less_than(right),
            BinaryOperator::LessEqual => left.less_equal(right),
            BinaryOperator::Greater => left.greater_than(right),
            BinaryOperator::GreaterEqual => left.greater_equal(right),
            BinaryOperator::And => left.logical_and(right),
            BinaryOperator::Or => left.logical_or(right),
        }
    }

    /// Evaluates both operands left to right, then applies the operator.
    pub(crate) fn eval_binary(&mut self,
                              left: &Node,
                              op: BinaryOperator,
                              right: &Node,
                              span: &Span,
                              context: &Rc<Context>,
                              inside_loop: bool)
                              -> EvalResult {
        let left = self.evaluate(left, context, inside_loop)?;
        let right = self.evaluate(right, context, inside_loop)?;

        let result = Self::apply_binary(op, &left, &right).in_context(context, span)?;
        Ok(result.at(span, &context.display))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        error::ErrorKind,
        interpreter::{config::Config, evaluator::core::Interpreter, value::core::Value},
    };

    fn eval(text: &str) -> Result<Value, Error> {
        Interpreter::new(Config::default()).run("t.peri", text)
                                           .map(|mut values| values.remove(0))
    }

    fn error_kind(text: &str) -> ErrorKind {
        match eval(text) {
            Err(Error::Runtime(error)) => error.kind,
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }

    #[test]
    fn arithmetic_on_matching_kinds() {
        assert_eq!(eval("1 + 2").unwrap(), Value::int(3));
        assert_eq!(eval("10 / 3").unwrap(), Value::int(3));
        assert_eq!(eval("-7 / 2").unwrap(), Value::int(-3));
        assert_eq!(eval("2 ^ 3 ^ 2").unwrap(), Value::int(512));
        assert_eq!(eval("1.5 * 2.0").unwrap(), Value::float(3.0));
        assert_eq!(eval("\"ab\" + \"cd\"").unwrap(), Value::string("abcd"));
    }

    #[test]
    fn mixed_kinds_are_rejected() {
        assert_eq!(error_kind("1 + 2.0"), ErrorKind::Operation);
        assert_eq!(error_kind("\"a\" * 2"), ErrorKind::Operation);
    }

    #[test]
    fn domain_errors() {
        assert_eq!(error_kind("10 / 0"), ErrorKind::Value);
        assert_eq!(error_kind("1.0 / 0.0"), ErrorKind::Value);
        assert_eq!(error_kind("9223372036854775807 + 1"), ErrorKind::Value);
        assert_eq!(error_kind("2 ^ -1"), ErrorKind::Value);
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(eval("1 < 2 and 2 <= 2").unwrap(), Value::bool(true));
        assert_eq!(eval("1 == 1.0").unwrap(), Value::bool(false));
        assert_eq!(eval("not (1 == 2) or False").unwrap(), Value::bool(true));
        assert_eq!(error_kind("1 and True"), ErrorKind::Operation);
    }

    #[test]
    fn both_operands_of_logic_are_evaluated() {
        assert_eq!(error_kind("False and undefined_name"), ErrorKind::Identifier);
    }
}
