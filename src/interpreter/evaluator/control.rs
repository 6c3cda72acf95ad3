use std::rc::Rc;

use crate::{
    ast::{Branch, Node},
    interpreter::{
        context::Context,
        evaluator::core::{EvalResult, InContext, Interpreter, Signal},
        position::Span,
        value::core::{Data, Value},
    },
};

impl Interpreter {
    /// `return(value)`: raises a [`Signal::Return`] for the enclosing call.
    pub(crate) fn eval_return(&mut self,
                              value: Option<&Node>,
                              span: &Span,
                              context: &Rc<Context>,
                              inside_loop: bool)
                              -> EvalResult {
        if !context.in_function() {
            return Err(Signal::Return(Value::null(), span.clone()).into_error().into());
        }

        let value = match value {
            Some(node) => self.evaluate(node, context, inside_loop)?,
            None => Value::null().at(span, &context.display),
        };
        Err(Signal::Return(value, span.clone()))
    }

    pub(crate) fn eval_break(span: &Span, inside_loop: bool) -> EvalResult {
        let signal = Signal::Break(span.clone());
        Err(if inside_loop { signal } else { signal.into_error().into() })
    }

    pub(crate) fn eval_continue(span: &Span, inside_loop: bool) -> EvalResult {
        let signal = Signal::Continue(span.clone());
        Err(if inside_loop { signal } else { signal.into_error().into() })
    }

    /// Runs the block of the first branch whose condition is `True`.
    ///
    /// Conditions must be `Bool`. An `if` statement always evaluates to
    /// `Null`.
    pub(crate) fn eval_if(&mut self,
                          branches: &[Branch],
                          otherwise: Option<&[Node]>,
                          span: &Span,
                          context: &Rc<Context>,
                          inside_loop: bool)
                          -> EvalResult {
        self.eval_branches(branches, otherwise, context, inside_loop)?;
        Ok(Value::null().at(span, &context.display))
    }

    /// Binds the subject to `name`, then behaves like an `if` chain over the
    /// `when` cases.
    ///
    /// With `var` the name is created in the current scope; without it an
    /// existing binding is reassigned under the usual kind rules.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn eval_switch(&mut self,
                              name: &str,
                              overwrite: bool,
                              subject: &Node,
                              cases: &[Branch],
                              otherwise: Option<&[Node]>,
                              span: &Span,
                              context: &Rc<Context>,
                              inside_loop: bool)
                              -> EvalResult {
        let value = self.evaluate(subject, context, inside_loop)?;
        if overwrite {
            Self::create(name, value, &subject.span, context)?;
        } else {
            Self::assign(name, value, &subject.span, context)?;
        }

        self.eval_branches(cases, otherwise, context, inside_loop)?;
        Ok(Value::null().at(span, &context.display))
    }

    fn eval_branches(&mut self,
                     branches: &[Branch],
                     otherwise: Option<&[Node]>,
                     context: &Rc<Context>,
                     inside_loop: bool)
                     -> EvalResult<()> {
        for branch in branches {
            let condition = self.evaluate(&branch.condition, context, inside_loop)?;
            if condition.is_truthy().in_context(context, &branch.condition.span)? {
                return self.eval_block(&branch.body, context, inside_loop);
            }
        }

        match otherwise {
            Some(body) => self.eval_block(body, context, inside_loop),
            None => Ok(()),
        }
    }

    /// `handler { ... }`
    ///
    /// Evaluates to `Null` when the body completes, or to an `Exception`
    /// value holding the first error it raised. Panics, as well as `return`,
    /// `break` and `continue`, pass through unchanged.
    pub(crate) fn eval_handler(&mut self,
                               body: &[Node],
                               span: &Span,
                               context: &Rc<Context>,
                               inside_loop: bool)
                               -> EvalResult {
        match self.eval_block(body, context, inside_loop) {
            Ok(()) => Ok(Value::null().at(span, &context.display)),
            Err(Signal::Error(error)) if !error.is_fatal() => {
                tracing::debug!(kind = error.kind.name(), "handler caught error");
                Ok(Value::new(Data::Exception(Rc::new(error))).at(span, &context.display))
            },
            Err(signal) => Err(signal),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, io::Write, rc::Rc};

    use crate::{
        Error,
        error::ErrorKind,
        interpreter::{config::Config, evaluator::core::Interpreter, value::core::Value},
    };

    #[derive(Clone, Default)]
    struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn run_capturing(text: &str) -> (Result<Vec<Value>, Error>, String) {
        let capture = Capture::default();
        let result = Interpreter::new(Config::default()).with_output(capture.clone())
                                                        .run("t.peri", text);
        let output = String::from_utf8(capture.0.borrow().clone()).unwrap();
        (result, output)
    }

    #[test]
    fn first_true_branch_wins() {
        let text = "var x = 2\nif (x == 1) {\nprint(\"one\")\n} elif (x == 2) {\nprint(\"two\")\n} elif (x > 0) {\nprint(\"positive\")\n} else {\nprint(\"other\")\n}";
        let (result, output) = run_capturing(text);
        assert!(result.is_ok());
        assert_eq!(output, "two\n");
    }

    #[test]
    fn conditions_must_be_bools() {
        let (result, _) = run_capturing("if (1) {}");
        let Err(Error::Runtime(error)) = result else {
            panic!("expected an error");
        };
        assert_eq!(error.kind, ErrorKind::Type);
    }

    #[test]
    fn switch_binds_its_subject() {
        let text = "switch (var n as 3) {\nwhen (n == 1) { print(\"one\") }\nwhen (n == 3) { print(\"three\") }\nelse { print(\"other\") }\n}\nn";
        let (result, output) = run_capturing(text);
        assert_eq!(output, "three\n");
        assert_eq!(result.unwrap()[1], Value::int(3));
    }

    #[test]
    fn handler_turns_errors_into_values() {
        let text = "var e = handler {\nprint(\"before\")\n1 / 0\nprint(\"after\")\n}\nprint(e.kind)\nprint(e.message)";
        let (result, output) = run_capturing(text);
        assert!(result.is_ok(), "{result:?}");
        assert_eq!(output, "before\nValueError\nDivision by zero\n");
    }

    #[test]
    fn handler_without_error_is_null() {
        let (result, _) = run_capturing("handler { 1 }");
        assert_eq!(result.unwrap()[0], Value::null());
    }

    #[test]
    fn panics_escape_handlers() {
        let (result, output) = run_capturing("handler { panic(\"stop\") }\nprint(\"unreachable\")");
        let Err(Error::Runtime(error)) = result else {
            panic!("expected a panic");
        };
        assert_eq!(error.kind, ErrorKind::Panic);
        assert!(output.is_empty());
    }
}
