use crate::{
    error::{ErrorKind, RuntimeError},
    interpreter::{
        evaluator::core::Interpreter,
        position::Span,
        value::core::{Data, Kind, Value},
    },
    util::num::{f64_to_i64_truncated, i64_to_f64_checked},
};

/// The display form of any value, e.g. `str([1, 2])` is `"[1, 2]"`.
pub fn to_str(_: &mut Interpreter, args: &[Value], _: &Span) -> Result<Value, RuntimeError> {
    Ok(Value::string(args[0].to_string()))
}

/// Converts to `Int`.
///
/// Floats are truncated toward zero, `True` and `False` become 1 and 0 and
/// strings are parsed as decimal integers.
///
/// # Errors
/// A `ValueError` when the value has no integer equivalent, a `TypeError` for
/// kinds that can not be converted at all.
pub fn to_int(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    let value = &args[0];
    let result = match &value.data {
        Data::Int(i) => Some(*i),
        Data::Bool(b) => Some(i64::from(*b)),
        Data::Float(x) => f64_to_i64_truncated(*x),
        Data::Str(s) => s.trim().replace('_', "").parse().ok(),
        _ => return Err(not_convertible(value, Kind::Int, span)),
    };

    result.map(Value::int)
          .ok_or_else(|| invalid_literal(value, Kind::Int, span))
}

/// Converts to `Float`.
///
/// # Errors
/// A `ValueError` for unparsable strings and integers too large to be exact,
/// a `TypeError` for kinds that can not be converted at all.
pub fn to_float(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    let value = &args[0];
    let result = match &value.data {
        Data::Float(x) => Some(*x),
        Data::Int(i) => i64_to_f64_checked(*i, ()).ok(),
        Data::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Data::Str(s) => s.trim().replace('_', "").parse().ok(),
        _ => return Err(not_convertible(value, Kind::Float, span)),
    };

    result.map(Value::float)
          .ok_or_else(|| invalid_literal(value, Kind::Float, span))
}

/// Converts to `Bool`.
///
/// `Null`, zero, and empty strings and collections are `False`; every other
/// value is `True`.
pub fn to_bool(_: &mut Interpreter, args: &[Value], _: &Span) -> Result<Value, RuntimeError> {
    let truth = match &args[0].data {
        Data::Null => false,
        Data::Bool(b) => *b,
        Data::Int(i) => *i != 0,
        Data::Float(x) => *x != 0.0,
        Data::Str(s) => !s.is_empty(),
        Data::Array(items) | Data::Tuple(items) => !items.is_empty(),
        Data::Dict(dict) => !dict.is_empty(),
        Data::Func(_) | Data::BuiltIn(_) | Data::Exception(_) | Data::Namespace(_) => true,
    };
    Ok(Value::bool(truth))
}

/// Collects the elements of any iterable into an `Array`.
///
/// # Errors
/// A `TypeError` for non-iterable values.
pub fn to_array(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    let elements = args[0].elements()
                          .ok_or_else(|| not_convertible(&args[0], Kind::Array, span))?;
    Value::array(elements)
}

/// Collects the elements of any iterable into a `Tuple`.
///
/// # Errors
/// A `TypeError` for non-iterable values.
pub fn to_tuple(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    let elements = args[0].elements()
                          .ok_or_else(|| not_convertible(&args[0], Kind::Tuple, span))?;
    Value::tuple(elements)
}

fn not_convertible(value: &Value, target: Kind, span: &Span) -> RuntimeError {
    RuntimeError::at(ErrorKind::Type,
                     format!("{} can not be converted to {target}", value.kind()),
                     span).with_origin(&value.provenance())
}

fn invalid_literal(value: &Value, target: Kind, span: &Span) -> RuntimeError {
    RuntimeError::at(ErrorKind::Value,
                     format!("Could not convert {} to {target}", value.repr()),
                     span).with_origin(&value.provenance())
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

    fn error_kind(text: &str) -> ErrorKind {
        match last(text) {
            Err(Error::Runtime(error)) => error.kind,
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }

    #[test]
    fn numbers() {
        assert_eq!(last("int(3.9)").unwrap(), Value::int(3));
        assert_eq!(last("int(-3.9)").unwrap(), Value::int(-3));
        assert_eq!(last("int(\" 42 \")").unwrap(), Value::int(42));
        assert_eq!(last("int(True)").unwrap(), Value::int(1));
        assert_eq!(last("float(2)").unwrap(), Value::float(2.0));
        assert_eq!(last("float(\"0.5\")").unwrap(), Value::float(0.5));
        assert_eq!(error_kind("int(\"abc\")"), ErrorKind::Value);
        assert_eq!(error_kind("int([1])"), ErrorKind::Type);
    }

    #[test]
    fn strings_and_bools() {
        assert_eq!(last("str(12)").unwrap(), Value::string("12"));
        assert_eq!(last("str([\"a\"])").unwrap(), Value::string("[\"a\"]"));
        assert_eq!(last("bool(0)").unwrap(), Value::bool(false));
        assert_eq!(last("bool(\"x\")").unwrap(), Value::bool(true));
        assert_eq!(last("bool(Null)").unwrap(), Value::bool(false));
    }

    #[test]
    fn collections() {
        let chars = Value::array(vec![Value::string("h"), Value::string("i")]).unwrap();
        assert_eq!(last("array(\"hi\")").unwrap(), chars);
        let keys = Value::tuple(vec![Value::string("a")]).unwrap();
        assert_eq!(last("tuple({\"a\": 1})").unwrap(), keys);
        assert_eq!(error_kind("array(1)"), ErrorKind::Type);
    }
}
