use crate::{
    error::{ErrorKind, RuntimeError},
    interpreter::{
        evaluator::core::Interpreter,
        position::Span,
        value::core::{Data, Kind, Value},
    },
};

/// Writes the display form of its argument, or an empty line, to the
/// interpreter's output.
///
/// Strings are written without quotes.
pub fn print(interpreter: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    let text = args.first().map(ToString::to_string).unwrap_or_default();
    interpreter.write_line(&text).map_err(|error| {
                                     RuntimeError::at(ErrorKind::Panic,
                                                      format!("Could not write output: {error}"),
                                                      span)
                                 })?;
    Ok(Value::null())
}

/// Largest number of items `range` will produce.
pub const MAX_RANGE_LENGTH: i128 = 10_000_000;

/// `range(stop)`, `range(start, stop)` or `range(start, stop, step)`.
///
/// Produces an array of the integers from `start` (default 0) up to but not
/// including `stop`, `step` apart (default 1). A negative step counts down.
///
/// # Errors
/// A `TypeError` for non-integer arguments, and a `ValueError` for a zero
/// step or more than [`MAX_RANGE_LENGTH`] items.
pub fn range(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    let ints = args.iter()
                   .map(|arg| expect_int(arg, "range", span))
                   .collect::<Result<Vec<_>, _>>()?;

    let (start, stop, step) = match ints.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(RuntimeError::at(ErrorKind::Argument, "range takes 1, 2 or 3 argument(s)", span)),
    };
    if step == 0 {
        return Err(RuntimeError::at(ErrorKind::Value, "Range step can not be zero", span));
    }

    let (start, stop, step) = (i128::from(start), i128::from(stop), i128::from(step));
    let distance = if step > 0 { stop - start } else { start - stop };
    let stride = step.abs();
    let length = if distance <= 0 { 0 } else { (distance + stride - 1) / stride };
    if length > MAX_RANGE_LENGTH {
        return Err(RuntimeError::at(ErrorKind::Value,
                                    format!("Range of {length} items exceeds the limit of {MAX_RANGE_LENGTH}"),
                                    span));
    }

    let items = (0..length).filter_map(|i| i64::try_from(start + i * step).ok())
                           .map(Value::int)
                           .collect();

    Value::array(items)
}

/// The name of the argument's kind, as a string.
pub fn type_of(_: &mut Interpreter, args: &[Value], _: &Span) -> Result<Value, RuntimeError> {
    Ok(Value::string(args[0].kind().name()))
}

/// Raises a `PanicError`, which no handler can catch.
pub fn panic(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    Err(RuntimeError::at(ErrorKind::Panic, args[0].to_string(), span))
}

/// Raises a catchable `ThrownError`.
pub fn throw(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    Err(RuntimeError::at(ErrorKind::Thrown, args[0].to_string(), span))
}

/// `assert(condition)` or `assert(condition, message)`.
///
/// # Errors
/// An `AssertionError` when the condition is `False`, a `TypeError` when it
/// is not a `Bool`.
pub fn assert(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    match args[0].data {
        Data::Bool(true) => Ok(Value::null()),
        Data::Bool(false) => {
            let message = args.get(1)
                              .map_or_else(|| "Assertion failed".to_owned(), ToString::to_string);
            Err(RuntimeError::at(ErrorKind::Assertion, message, span))
        },
        _ => Err(RuntimeError::at(ErrorKind::Type,
                                  format!("Assertion condition must be of type Bool, {} given",
                                          args[0].kind()),
                                  span).with_origin(&args[0].provenance())),
    }
}

pub(super) fn expect_int(value: &Value, function: &str, span: &Span) -> Result<i64, RuntimeError> {
    match value.data {
        Data::Int(i) => Ok(i),
        _ => Err(RuntimeError::at(ErrorKind::Type,
                                  format!("{function} expects arguments of type {}, {} given",
                                          Kind::Int,
                                          value.kind()),
                                  span).with_origin(&value.provenance())),
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

    fn ints(values: &[i64]) -> Value {
        Value::array(values.iter().copied().map(Value::int).collect()).unwrap()
    }

    fn error_kind(text: &str) -> ErrorKind {
        match last(text) {
            Err(Error::Runtime(error)) => error.kind,
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }

    #[test]
    fn ranges() {
        assert_eq!(last("range(4)").unwrap(), ints(&[0, 1, 2, 3]));
        assert_eq!(last("range(2, 5)").unwrap(), ints(&[2, 3, 4]));
        assert_eq!(last("range(5, 0, -2)").unwrap(), ints(&[5, 3, 1]));
        assert_eq!(last("range(3, 1)").unwrap(), ints(&[]));
        assert_eq!(error_kind("range(1, 5, 0)"), ErrorKind::Value);
        assert_eq!(error_kind("range(1.5)"), ErrorKind::Type);
        assert_eq!(last("range(9223372036854775806, 9223372036854775807)").unwrap(),
                   ints(&[i64::MAX - 1]));
    }

    #[test]
    fn oversized_ranges_are_rejected() {
        assert_eq!(error_kind("range(0, 9223372036854775807)"), ErrorKind::Value);
        assert_eq!(error_kind("range(0, -9223372036854775807, -1)"), ErrorKind::Value);
        assert_eq!(last("range(0, 9223372036854775807, 1000000000000000000)").unwrap(),
                   ints(&(0..10).map(|i| i * 1_000_000_000_000_000_000).collect::<Vec<_>>()));
    }

    #[test]
    fn type_names() {
        assert_eq!(last("type(1)").unwrap(), Value::string("Int"));
        assert_eq!(last("type(\"a\")").unwrap(), Value::string("Str"));
        assert_eq!(last("type(print)").unwrap(), Value::string("BuiltInFunc"));
        assert_eq!(last("type(lambda() { 1 })").unwrap(), Value::string("Func"));
    }

    #[test]
    fn raising_builtins() {
        assert_eq!(error_kind("throw(\"no\")"), ErrorKind::Thrown);
        assert_eq!(error_kind("panic(\"no\")"), ErrorKind::Panic);
        assert_eq!(error_kind("assert(1 == 2)"), ErrorKind::Assertion);
        assert_eq!(error_kind("assert(1)"), ErrorKind::Type);
        assert_eq!(last("assert(1 == 1, \"fine\")").unwrap(), Value::null());
    }

    #[test]
    fn thrown_errors_keep_their_message() {
        let text = "var e = handler {\nthrow(\"custom\")\n}\ne.message";
        assert_eq!(last(text).unwrap(), Value::string("custom"));
    }

    #[test]
    fn builtins_are_reserved() {
        assert_eq!(error_kind("print = 1"), ErrorKind::Reserved);
        assert_eq!(error_kind("var True = 1"), ErrorKind::Reserved);
    }
}
