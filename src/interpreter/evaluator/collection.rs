use std::rc::Rc;

use crate::{
    ast::Node,
    interpreter::{
        context::Context,
        evaluator::core::{EvalResult, InContext, Interpreter},
        position::Span,
        value::core::Value,
    },
};

impl Interpreter {
    /// `[a, b, c]`
    pub(crate) fn eval_array(&mut self,
                             items: &[Node],
                             span: &Span,
                             context: &Rc<Context>,
                             inside_loop: bool)
                             -> EvalResult {
        let items = self.eval_items(items, context, inside_loop)?;
        let array = Value::array(items).in_context(context, span)?;

        Ok(array.at(span, &context.display))
    }

    /// `(a, b, c)`
    pub(crate) fn eval_tuple(&mut self,
                             items: &[Node],
                             span: &Span,
                             context: &Rc<Context>,
                             inside_loop: bool)
                             -> EvalResult {
        let items = self.eval_items(items, context, inside_loop)?;
        let tuple = Value::tuple(items).in_context(context, span)?;

        Ok(tuple.at(span, &context.display))
    }

    /// `{key: value, ...}`
    ///
    /// Entries are evaluated key first, in source order. A repeated key keeps
    /// its first position and its last value.
    pub(crate) fn eval_dict(&mut self,
                            entries: &[(Node, Node)],
                            span: &Span,
                            context: &Rc<Context>,
                            inside_loop: bool)
                            -> EvalResult {
        let mut pairs = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self.evaluate(key, context, inside_loop)?;
            let value = self.evaluate(value, context, inside_loop)?;
            pairs.push((key, value));
        }
        let dict = Value::dict(pairs).in_context(context, span)?;

        Ok(dict.at(span, &context.display))
    }

    fn eval_items(&mut self,
                  items: &[Node],
                  context: &Rc<Context>,
                  inside_loop: bool)
                  -> EvalResult<Vec<Value>> {
        items.iter()
             .map(|item| self.evaluate(item, context, inside_loop))
             .collect()
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
                                           .map(|mut values| values.pop().unwrap())
    }

    fn error_kind(text: &str) -> ErrorKind {
        match eval(text) {
            Err(Error::Runtime(error)) => error.kind,
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }

    #[test]
    fn literals_and_access() {
        assert_eq!(eval("[1, 2, 3][-1]").unwrap(), Value::int(3));
        assert_eq!(eval("(\"a\", \"b\")[0]").unwrap(), Value::string("a"));
        assert_eq!(eval("{\"a\": 1, \"b\": 2}[\"b\"]").unwrap(), Value::int(2));
        assert_eq!(eval("[1, 2, 3].length").unwrap(), Value::int(3));
    }

    #[test]
    fn collections_are_homogeneous() {
        assert_eq!(error_kind("[1, \"a\"]"), ErrorKind::Value);
        assert_eq!(error_kind("(1, 2.0)"), ErrorKind::Value);
        assert_eq!(error_kind("{1: \"a\", \"b\": \"c\"}"), ErrorKind::Value);
    }

    #[test]
    fn lookups_that_fail() {
        assert_eq!(error_kind("[1][1]"), ErrorKind::Index);
        assert_eq!(error_kind("{\"a\": 1}[\"z\"]"), ErrorKind::Index);
        assert_eq!(error_kind("var n = 1\nn.length"), ErrorKind::Attribute);
        assert_eq!(error_kind("5[0]"), ErrorKind::Operation);
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        assert_eq!(eval("{\"a\": 1, \"a\": 2}[\"a\"]").unwrap(), Value::int(2));
        assert_eq!(eval("{\"a\": 1, \"a\": 2}.length").unwrap(), Value::int(1));
    }
}
