use std::rc::Rc;

use crate::{
    error::{ErrorKind, RuntimeError},
    interpreter::{
        context::{Context, Scope, SymbolTable},
        evaluator::core::{EvalResult, Interpreter},
        position::Span,
        value::core::Value,
    },
};

impl Interpreter {
    /// Reads the nearest binding of `name`.
    ///
    /// The result is a copy placed at `span`; the binding's previous location
    /// becomes part of the copy's origin chain.
    pub(crate) fn eval_access(name: &str, span: &Span, context: &Rc<Context>) -> EvalResult {
        let value = context.symbols.borrow().get(name);
        match value {
            Some(value) => Ok(value.relocate(span, &context.display)),
            None => Err(undefined(name, span).into()),
        }
    }

    /// Rebinds an existing name in the scope that owns it.
    ///
    /// A binding keeps its kind for life, except that a `Null` binding accepts
    /// any kind once.
    pub(crate) fn assign(name: &str, value: Value, span: &Span, context: &Rc<Context>) -> EvalResult {
        let owner = SymbolTable::owner(&context.symbols, name).ok_or_else(|| undefined(name, span))?;
        let current = owner.borrow().get_local(name).cloned().ok_or_else(|| undefined(name, span))?;

        if current.reserved {
            return Err(reserved(name, span).into());
        }
        if !current.is_null() && current.kind() != value.kind() {
            return Err(RuntimeError::at(ErrorKind::Type,
                                        format!("{name} must be of type {}, {} given",
                                                current.kind(),
                                                value.kind()),
                                        span).with_origin(&value.provenance())
                                             .into());
        }

        bind(&owner, name, &value);
        Ok(value)
    }

    /// Creates or overwrites a binding in the current scope.
    pub(crate) fn create(name: &str, value: Value, span: &Span, context: &Rc<Context>) -> EvalResult {
        let existing = context.symbols.borrow().get(name);
        if existing.is_some_and(|existing| existing.reserved) {
            return Err(reserved(name, span).into());
        }

        bind(&context.symbols, name, &value);
        Ok(value)
    }
}

fn bind(scope: &Scope, name: &str, value: &Value) {
    scope.borrow_mut().define(name, value.clone().named(name));
}

fn undefined(name: &str, span: &Span) -> RuntimeError {
    RuntimeError::at(ErrorKind::Identifier, format!("{name} is not defined"), span)
}

fn reserved(name: &str, span: &Span) -> RuntimeError {
    RuntimeError::at(ErrorKind::Reserved, format!("{name} is a reserved name"), span)
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        error::ErrorKind,
        interpreter::{config::Config, evaluator::core::Interpreter, value::core::Value},
    };

    fn run(text: &str) -> Result<Vec<Value>, Error> {
        Interpreter::new(Config::default()).run("t.peri", text)
    }

    fn kind_of(text: &str) -> ErrorKind {
        match run(text) {
            Err(Error::Runtime(error)) => error.kind,
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }

    #[test]
    fn bindings_keep_their_kind() {
        assert_eq!(kind_of("var x = 1\nx = \"a\""), ErrorKind::Type);
        assert_eq!(run("var x = 1\nx = 2\nx").unwrap()[2], Value::int(2));
    }

    #[test]
    fn null_bindings_accept_any_kind_once() {
        let values = run("var x\nx = \"a\"\nx").unwrap();
        assert_eq!(values[2], Value::string("a"));
        assert_eq!(kind_of("var x\nx = \"a\"\nx = 1"), ErrorKind::Type);
    }

    #[test]
    fn declarations_may_change_the_kind() {
        assert_eq!(run("var x = 1\nvar x = \"a\"\nx").unwrap()[2], Value::string("a"));
    }

    #[test]
    fn unknown_names() {
        assert_eq!(kind_of("y"), ErrorKind::Identifier);
        assert_eq!(kind_of("y = 1"), ErrorKind::Identifier);
    }

    #[test]
    fn reserved_names_can_not_be_rebound() {
        assert_eq!(kind_of("True = False"), ErrorKind::Reserved);
        assert_eq!(kind_of("var print = 1"), ErrorKind::Reserved);
    }

    #[test]
    fn assignment_writes_to_the_owning_scope() {
        let values = run("var n = 0\nvar bump = func() {\nn = n + 1\n}\nbump()\nbump()\nn").unwrap();
        assert_eq!(values[4], Value::int(2));
    }

    #[test]
    fn reading_a_reserved_binding_yields_a_normal_value() {
        assert_eq!(run("var t = True\nt = False\nt").unwrap()[2], Value::bool(false));
    }
}
