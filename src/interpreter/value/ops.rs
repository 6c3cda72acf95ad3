use crate::{
    error::{ErrorKind, RuntimeError},
    interpreter::{
        position::Span,
        value::core::{Data, Kind, Value},
    },
    util::num::checked_int_pow,
};

/// Result of applying an operator to values.
pub type OpResult = Result<Value, RuntimeError>;

impl Value {
    /// `self + other`: same-kind numeric addition or string concatenation.
    pub fn add(&self, other: &Self) -> OpResult {
        match (&self.data, &other.data) {
            (Data::Int(a), Data::Int(b)) => self.checked(a.checked_add(*b), other),
            (Data::Float(a), Data::Float(b)) => Ok(Self::float(a + b)),
            (Data::Str(a), Data::Str(b)) => Ok(Self::string(format!("{a}{b}"))),
            _ => Err(self.unsupported("+", other)),
        }
    }

    /// `self - other`
    pub fn subtract(&self, other: &Self) -> OpResult {
        match (&self.data, &other.data) {
            (Data::Int(a), Data::Int(b)) => self.checked(a.checked_sub(*b), other),
            (Data::Float(a), Data::Float(b)) => Ok(Self::float(a - b)),
            _ => Err(self.unsupported("-", other)),
        }
    }

    /// `self * other`
    pub fn multiply(&self, other: &Self) -> OpResult {
        match (&self.data, &other.data) {
            (Data::Int(a), Data::Int(b)) => self.checked(a.checked_mul(*b), other),
            (Data::Float(a), Data::Float(b)) => Ok(Self::float(a * b)),
            _ => Err(self.unsupported("*", other)),
        }
    }

    /// `self / other`
    ///
    /// Integer division truncates toward zero. Dividing by zero is a
    /// `ValueError` for both numeric kinds.
    pub fn divide(&self, other: &Self) -> OpResult {
        match (&self.data, &other.data) {
            (Data::Int(_), Data::Int(0)) => Err(self.division_by_zero(other)),
            (Data::Float(_), Data::Float(b)) if *b == 0.0 => Err(self.division_by_zero(other)),
            (Data::Int(a), Data::Int(b)) => self.checked(a.checked_div(*b), other),
            (Data::Float(a), Data::Float(b)) => Ok(Self::float(a / b)),
            _ => Err(self.unsupported("/", other)),
        }
    }

    /// `self ^ other`
    ///
    /// Integer powers require a non-negative exponent; float powers follow
    /// IEEE `powf`.
    pub fn raised(&self, other: &Self) -> OpResult {
        match (&self.data, &other.data) {
            (Data::Int(_), Data::Int(b)) if *b < 0 => {
                Err(RuntimeError::new(ErrorKind::Value,
                                      format!("Int can not be raised to the negative power {b}"),
                                      self.joined(other)).with_origin(&other.origin))
            },
            (Data::Int(a), Data::Int(b)) => self.checked(checked_int_pow(*a, *b), other),
            (Data::Float(a), Data::Float(b)) => Ok(Self::float(a.powf(*b))),
            _ => Err(self.unsupported("^", other)),
        }
    }

    /// `self == other`; values of different kinds are never equal.
    pub fn equals(&self, other: &Self) -> OpResult {
        Ok(Self::bool(self.payload_eq(other)))
    }

    /// `self != other`
    pub fn not_equals(&self, other: &Self) -> OpResult {
        Ok(Self::bool(!self.payload_eq(other)))
    }

    /// `self < other`
    pub fn less_than(&self, other: &Self) -> OpResult {
        self.ordering("<", other, |ord| ord.is_lt())
    }

    /// `self <= other`
    pub fn less_equal(&self, other: &Self) -> OpResult {
        self.ordering("<=", other, |ord| ord.is_le())
    }

    /// `self > other`
    pub fn greater_than(&self, other: &Self) -> OpResult {
        self.ordering(">", other, |ord| ord.is_gt())
    }

    /// `self >= other`
    pub fn greater_equal(&self, other: &Self) -> OpResult {
        self.ordering(">=", other, |ord| ord.is_ge())
    }

    /// `self and other`
    pub fn logical_and(&self, other: &Self) -> OpResult {
        match (&self.data, &other.data) {
            (Data::Bool(a), Data::Bool(b)) => Ok(Self::bool(*a && *b)),
            _ => Err(self.unsupported("and", other)),
        }
    }

    /// `self or other`
    pub fn logical_or(&self, other: &Self) -> OpResult {
        match (&self.data, &other.data) {
            (Data::Bool(a), Data::Bool(b)) => Ok(Self::bool(*a || *b)),
            _ => Err(self.unsupported("or", other)),
        }
    }

    /// `not self`
    pub fn logical_not(&self) -> OpResult {
        match &self.data {
            Data::Bool(b) => Ok(Self::bool(!b)),
            _ => Err(self.unsupported_unary("not")),
        }
    }

    /// `-self`
    pub fn negate(&self) -> OpResult {
        match &self.data {
            Data::Int(i) => i.checked_neg().map(Self::int).ok_or_else(|| {
                                                                RuntimeError::new(ErrorKind::Value,
                                                                                  "Integer overflow",
                                                                                  self.span.clone())
                                                            }),
            Data::Float(f) => Ok(Self::float(-f)),
            _ => Err(self.unsupported_unary("-")),
        }
    }

    /// `+self`
    pub fn identity(&self) -> OpResult {
        match &self.data {
            Data::Int(_) | Data::Float(_) => Ok(self.clone()),
            _ => Err(self.unsupported_unary("+")),
        }
    }

    /// Interprets the value as a condition.
    ///
    /// # Errors
    /// A `TypeError` for every kind except `Bool`.
    pub fn is_truthy(&self) -> Result<bool, RuntimeError> {
        match &self.data {
            Data::Bool(b) => Ok(*b),
            _ => Err(RuntimeError::new(ErrorKind::Type,
                                       format!("Condition must be of type Bool, {} given",
                                               self.kind()),
                                       self.span.clone()).with_origin(&self.origin)),
        }
    }

    /// Compares kinds and payloads, ignoring positions and history.
    #[must_use]
    pub fn payload_eq(&self, other: &Self) -> bool {
        match (&self.data, &other.data) {
            (Data::Null, Data::Null) => true,
            (Data::Int(a), Data::Int(b)) => a == b,
            (Data::Float(a), Data::Float(b)) => a == b,
            (Data::Str(a), Data::Str(b)) => a == b,
            (Data::Bool(a), Data::Bool(b)) => a == b,
            (Data::Array(a), Data::Array(b)) | (Data::Tuple(a), Data::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.payload_eq(y))
            },
            (Data::Dict(a), Data::Dict(b)) => {
                a.len() == b.len()
                && a.iter().all(|(key, value)| {
                               matches!(b.get(key), Ok(Some(other)) if other.payload_eq(value))
                           })
            },
            (Data::Func(a), Data::Func(b)) => std::rc::Rc::ptr_eq(a, b),
            (Data::BuiltIn(a), Data::BuiltIn(b)) => std::ptr::eq(*a, *b),
            (Data::Exception(a), Data::Exception(b)) => std::rc::Rc::ptr_eq(a, b),
            (Data::Namespace(a), Data::Namespace(b)) => std::rc::Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn ordering(&self,
                symbol: &str,
                other: &Self,
                test: impl Fn(std::cmp::Ordering) -> bool)
                -> OpResult {
        let ordering = match (&self.data, &other.data) {
            (Data::Int(a), Data::Int(b)) => Some(a.cmp(b)),
            (Data::Float(a), Data::Float(b)) => a.partial_cmp(b),
            _ => return Err(self.unsupported(symbol, other)),
        };
        // NaN is unordered: every ordering comparison against it is false
        Ok(Self::bool(ordering.is_some_and(test)))
    }

    fn checked(&self, result: Option<i64>, other: &Self) -> OpResult {
        result.map(Self::int).ok_or_else(|| {
                                  RuntimeError::new(ErrorKind::Value,
                                                    "Integer overflow",
                                                    self.joined(other))
                              })
    }

    fn division_by_zero(&self, other: &Self) -> RuntimeError {
        RuntimeError::new(ErrorKind::Value, "Division by zero", self.joined(other)).with_origin(&other.origin)
    }

    /// The error produced when `symbol` is not defined between the two kinds.
    ///
    /// The origin is taken from the operand whose kind rules the operator
    /// out: the left one if `symbol` never applies to its kind, otherwise the
    /// right one.
    pub(crate) fn unsupported(&self, symbol: &str, other: &Self) -> RuntimeError {
        let culprit = if operand_kinds(symbol).contains(&self.kind()) { other } else { self };
        RuntimeError::new(ErrorKind::Operation,
                          format!("Operation '{symbol}' is not supported between {} and {}",
                                  self.kind(),
                                  other.kind()),
                          self.joined(other)).with_origin(&culprit.origin)
    }

    fn unsupported_unary(&self, symbol: &str) -> RuntimeError {
        RuntimeError::new(ErrorKind::Operation,
                          format!("Operation '{symbol}' is not supported for {}", self.kind()),
                          self.span.clone()).with_origin(&self.origin)
    }

    /// The span from the start of `self` to the end of `other`.
    fn joined(&self, other: &Self) -> Option<Span> {
        match (&self.span, &other.span) {
            (Some(left), Some(right)) => Some(left.to(right)),
            (left, right) => left.clone().or_else(|| right.clone()),
        }
    }
}

/// Kinds a binary operator is defined for on at least one side.
fn operand_kinds(symbol: &str) -> &'static [Kind] {
    match symbol {
        "+" => &[Kind::Int, Kind::Float, Kind::Str],
        "-" | "*" | "/" | "^" | "<" | "<=" | ">" | ">=" => &[Kind::Int, Kind::Float],
        "and" | "or" => &[Kind::Bool],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::position::SourceFile;

    fn moved(value: Value, from: usize, to: usize) -> Value {
        let source = SourceFile::new("t.peri", "0123456789abcdef");
        let owner: std::rc::Rc<str> = std::rc::Rc::from("<program>");
        value.at(&source.span(from, from + 1), &owner)
             .relocate(&source.span(to, to + 1), &owner)
    }

    #[test]
    fn arithmetic_requires_matching_kinds() {
        assert_eq!(Value::int(1).add(&Value::int(2)).unwrap(), Value::int(3));
        assert_eq!(Value::float(1.5).add(&Value::float(2.0)).unwrap(), Value::float(3.5));
        assert_eq!(Value::string("a").add(&Value::string("b")).unwrap(), Value::string("ab"));

        let err = Value::int(1).add(&Value::float(2.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Operation);
        assert!(err.message.contains("Int") && err.message.contains("Float"));

        assert_eq!(Value::string("a").multiply(&Value::int(2)).unwrap_err().kind,
                   ErrorKind::Operation);
        assert_eq!(Value::bool(true).add(&Value::bool(true)).unwrap_err().kind,
                   ErrorKind::Operation);
    }

    #[test]
    fn integer_division_truncates_toward_zero() {
        assert_eq!(Value::int(10).divide(&Value::int(3)).unwrap(), Value::int(3));
        assert_eq!(Value::int(-7).divide(&Value::int(2)).unwrap(), Value::int(-3));
        assert_eq!(Value::int(7).divide(&Value::int(-2)).unwrap(), Value::int(-3));
        assert_eq!(Value::int(i64::MIN).divide(&Value::int(-1)).unwrap_err().kind,
                   ErrorKind::Value);
    }

    #[test]
    fn division_by_zero_is_a_value_error() {
        let err = Value::int(10).divide(&Value::int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Value);
        assert_eq!(err.message, "Division by zero");

        assert_eq!(Value::float(1.0).divide(&Value::float(0.0)).unwrap_err().kind,
                   ErrorKind::Value);
    }

    #[test]
    fn powers() {
        assert_eq!(Value::int(2).raised(&Value::int(10)).unwrap(), Value::int(1024));
        assert_eq!(Value::int(2).raised(&Value::int(-1)).unwrap_err().kind, ErrorKind::Value);
        assert_eq!(Value::int(10).raised(&Value::int(30)).unwrap_err().kind, ErrorKind::Value);
        assert_eq!(Value::float(2.0).raised(&Value::float(3.0)).unwrap(), Value::float(8.0));
        assert_eq!(Value::float(2.0).raised(&Value::float(-1.0)).unwrap(), Value::float(0.5));
    }

    #[test]
    fn equality_is_false_across_kinds() {
        assert_eq!(Value::int(1).equals(&Value::float(1.0)).unwrap(), Value::bool(false));
        assert_eq!(Value::int(1).not_equals(&Value::string("1")).unwrap(), Value::bool(true));
        assert_eq!(Value::null().equals(&Value::null()).unwrap(), Value::bool(true));

        let a = Value::array(vec![Value::int(1), Value::int(2)]).unwrap();
        let b = Value::array(vec![Value::int(1), Value::int(2)]).unwrap();
        assert_eq!(a.equals(&b).unwrap(), Value::bool(true));
    }

    #[test]
    fn ordering_is_numeric_only() {
        assert_eq!(Value::int(1).less_than(&Value::int(2)).unwrap(), Value::bool(true));
        assert_eq!(Value::float(2.0).greater_equal(&Value::float(2.0)).unwrap(),
                   Value::bool(true));
        assert_eq!(Value::float(f64::NAN).less_than(&Value::float(1.0)).unwrap(),
                   Value::bool(false));
        assert_eq!(Value::string("a").less_than(&Value::string("b")).unwrap_err().kind,
                   ErrorKind::Operation);
    }

    #[test]
    fn logic_is_boolean_only() {
        assert_eq!(Value::bool(true).logical_and(&Value::bool(false)).unwrap(), Value::bool(false));
        assert_eq!(Value::bool(true).logical_or(&Value::bool(false)).unwrap(), Value::bool(true));
        assert_eq!(Value::bool(true).logical_not().unwrap(), Value::bool(false));
        assert_eq!(Value::int(1).logical_not().unwrap_err().kind, ErrorKind::Operation);
        assert_eq!(Value::int(1).is_truthy().unwrap_err().kind, ErrorKind::Type);
    }

    #[test]
    fn negation() {
        assert_eq!(Value::int(5).negate().unwrap(), Value::int(-5));
        assert_eq!(Value::float(0.5).negate().unwrap(), Value::float(-0.5));
        assert_eq!(Value::int(i64::MIN).negate().unwrap_err().kind, ErrorKind::Value);
        assert_eq!(Value::string("x").negate().unwrap_err().kind, ErrorKind::Operation);
    }

    #[test]
    fn unsupported_operations_blame_the_offending_operand() {
        let int = moved(Value::int(1), 0, 4);
        let text = moved(Value::string("a"), 8, 12);

        let err = int.add(&text).unwrap_err();
        assert_eq!(err.origin.len(), 1);
        assert_eq!(err.origin[0].span.start.index, 8);

        let err = text.multiply(&int).unwrap_err();
        assert_eq!(err.origin[0].span.start.index, 8);

        let err = moved(Value::bool(true), 2, 6).subtract(&int).unwrap_err();
        assert_eq!(err.origin[0].span.start.index, 2);
    }
}
