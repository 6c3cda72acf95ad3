use std::rc::Rc;

use crate::{
    ast::Node,
    error::{ErrorKind, RuntimeError},
    interpreter::{
        context::Context,
        evaluator::core::{EvalResult, InContext, Interpreter, Signal},
        position::Span,
        value::core::Value,
    },
};

/// What a loop does after one pass over its body.
enum Flow {
    Next,
    Stop,
}

impl Interpreter {
    /// Evaluates a `for` loop.
    ///
    /// The iterable is evaluated once. Arrays and tuples yield their
    /// elements, strings their characters and dictionaries their keys. Each
    /// element is bound to `name` before the body runs: with `var` the name is
    /// created in the current scope, without it an existing binding is
    /// reassigned and must accept the element's kind.
    ///
    /// `break()` ends the loop, `continue()` skips to the next element. The
    /// loop itself evaluates to `Null`.
    pub(crate) fn eval_for(&mut self,
                           name: &str,
                           overwrite: bool,
                           iterable: &Node,
                           body: &[Node],
                           span: &Span,
                           context: &Rc<Context>)
                           -> EvalResult {
        let collection = self.evaluate(iterable, context, false)?;
        let elements = collection.elements().ok_or_else(|| {
                                                RuntimeError::at(ErrorKind::Iteration,
                                                                 format!("{} is not iterable",
                                                                         collection.kind()),
                                                                 &iterable.span)
                                                .with_origin(&collection.provenance())
                                            })?;

        for element in elements {
            let element = element.relocate(&iterable.span, &context.display);
            if overwrite {
                Self::create(name, element, &iterable.span, context)?;
            } else {
                Self::assign(name, element, &iterable.span, context)?;
            }

            if let Flow::Stop = self.run_loop_body(body, context)? {
                break;
            }
        }

        Ok(Value::null().at(span, &context.display))
    }

    /// Evaluates a `while` loop.
    ///
    /// The condition is evaluated before every pass and must be a `Bool`.
    pub(crate) fn eval_while(&mut self,
                             condition: &Node,
                             body: &[Node],
                             span: &Span,
                             context: &Rc<Context>)
                             -> EvalResult {
        loop {
            let value = self.evaluate(condition, context, false)?;
            if !value.is_truthy().in_context(context, &condition.span)? {
                break;
            }
            if let Flow::Stop = self.run_loop_body(body, context)? {
                break;
            }
        }

        Ok(Value::null().at(span, &context.display))
    }

    /// Runs one pass of a loop body, absorbing `break()` and `continue()`.
    fn run_loop_body(&mut self, body: &[Node], context: &Rc<Context>) -> EvalResult<Flow> {
        match self.eval_block(body, context, true) {
            Ok(()) | Err(Signal::Continue(_)) => Ok(Flow::Next),
            Err(Signal::Break(_)) => Ok(Flow::Stop),
            Err(signal) => Err(signal),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        error::ErrorKind,
        interpreter::{config::Config, evaluator::core::Interpreter, value::core::Value},
    };

    fn last(text: &str) -> Result<Value, Error> {
        Interpreter::new(Config::default()).run("t.peri", text)
                                           .map(|mut values| values.pop().unwrap())
    }

    #[test]
    fn break_stops_at_the_current_element() {
        let text = "var seen = 0\nfor (var i in [1, 2, 3]) {\nseen = i\nif (i == 2) {\nbreak()\n}\n}\nseen";
        assert_eq!(last(text).unwrap(), Value::int(2));
    }

    #[test]
    fn continue_skips_the_rest_of_the_body() {
        let text = "var total = 0\nfor (var i in [1, 2, 3, 4]) {\nif (i == 2) {\ncontinue()\n}\ntotal = total + i\n}\ntotal";
        assert_eq!(last(text).unwrap(), Value::int(8));
    }

    #[test]
    fn without_var_the_loop_reuses_a_binding() {
        let text = "var c = \"\"\nfor (c in \"abc\") {}\nc";
        assert_eq!(last(text).unwrap(), Value::string("c"));
        assert!(matches!(last("for (i in [1]) {}"),
                         Err(Error::Runtime(ref e)) if e.kind == ErrorKind::Identifier));
    }

    #[test]
    fn dictionaries_iterate_over_keys_in_order() {
        let text = "var keys = \"\"\nfor (var k in {\"b\": 1, \"a\": 2}) {\nkeys = keys + k\n}\nkeys";
        assert_eq!(last(text).unwrap(), Value::string("ba"));
    }

    #[test]
    fn scalars_are_not_iterable() {
        assert!(matches!(last("for (var i in 5) {}"),
                         Err(Error::Runtime(ref e)) if e.kind == ErrorKind::Iteration));
    }

    #[test]
    fn while_loops() {
        let text = "var n = 0\nwhile (n < 5) {\nn = n + 1\n}\nn";
        assert_eq!(last(text).unwrap(), Value::int(5));
        let text = "var n = 0\nwhile (True) {\nn = n + 1\nif (n == 3) {\nbreak()\n}\n}\nn";
        assert_eq!(last(text).unwrap(), Value::int(3));
    }

    #[test]
    fn break_inside_a_function_in_a_loop_is_an_error() {
        let text = "var f = func() {\nbreak()\n}\nfor (var i in [1]) {\nf()\n}";
        assert!(matches!(last(text), Err(Error::Runtime(ref e)) if e.kind == ErrorKind::Break));
    }
}
