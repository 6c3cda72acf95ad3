use std::rc::Rc;

use crate::{
    ast::{Node, UnaryOperator},
    interpreter::{
        context::Context,
        evaluator::core::{EvalResult, InContext, Interpreter},
        position::Span,
        value::{core::Value, ops::OpResult},
    },
};

impl Interpreter {
    /// Applies a prefix operator to a value.
    ///
    /// Supported operators:
    /// - `Plus`: identity on `Int` and `Float`.
    /// - `Negate`: numeric negation; negating the smallest `Int` overflows.
    /// - `Not`: boolean negation, `Bool` only.
    ///
    /// # Example
    /// ```
    /// use peridot::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Interpreter, value::core::Value},
    /// };
    ///
    /// let v = Interpreter::apply_unary(UnaryOperator::Negate, &Value::int(5)).unwrap();
    /// assert_eq!(v, Value::int(-5));
    ///
    /// let v = Interpreter::apply_unary(UnaryOperator::Not, &Value::bool(false)).unwrap();
    /// assert_eq!(v, Value::bool(true));
    /// ```
    pub fn apply_unary(op: UnaryOperator, value: &Value) -> OpResult {
        match op {
            UnaryOperator::Plus => value.identity(),
            UnaryOperator::Negate => value.negate(),
            UnaryOperator::Not => value.logical_not(),
        }
    }

    pub(crate) fn eval_unary(&mut self,
                             op: UnaryOperator,
                             operand: &Node,
                             span: &Span,
                             context: &Rc<Context>,
                             inside_loop: bool)
                             -> EvalResult {
        let value = self.evaluate(operand, context, inside_loop)?;
        let result = Self::apply_unary(op, &value).in_context(context, span)?;

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

    #[test]
    fn signs() {
        assert_eq!(eval("-5").unwrap(), Value::int(-5));
        assert_eq!(eval("--5").unwrap(), Value::int(5));
        assert_eq!(eval("+2.5").unwrap(), Value::float(2.5));
        assert_eq!(eval("-2 ^ 2").unwrap(), Value::int(4));
    }

    #[test]
    fn not_requires_a_bool() {
        assert_eq!(eval("not True").unwrap(), Value::bool(false));
        let Err(Error::Runtime(error)) = eval("not 1") else {
            panic!("expected an error");
        };
        assert_eq!(error.kind, ErrorKind::Operation);
    }

    #[test]
    fn negating_a_string_fails() {
        let Err(Error::Runtime(error)) = eval("-\"a\"") else {
            panic!("expected an error");
        };
        assert_eq!(error.kind, ErrorKind::Operation);
        assert_eq!(error.span.unwrap().start.column, 1);
    }
}
