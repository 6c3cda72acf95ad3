use std::{fmt, rc::Rc};

use crate::{
    error::{ErrorKind, RuntimeError},
    interpreter::{
        evaluator::function::core::BuiltIn,
        position::Span,
        value::{
            dict_key::Dictionary,
            function::{Function, Namespace},
        },
    },
};

/// Maximum number of hops kept in a value's origin chain.
///
/// Older hops are discarded first.
pub const MAX_ORIGIN_DEPTH: usize = 16;

/// The kind of a runtime value.
///
/// Kinds double as the type tags checked by function signatures and by the
/// kind-locking rule of assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Int,
    Float,
    Str,
    Bool,
    Array,
    Tuple,
    Dict,
    Func,
    BuiltInFunc,
    Exception,
    Namespace,
}

impl Kind {
    /// The name shown to users.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Str => "Str",
            Self::Bool => "Bool",
            Self::Array => "Array",
            Self::Tuple => "Tuple",
            Self::Dict => "Dict",
            Self::Func => "Func",
            Self::BuiltInFunc => "BuiltInFunc",
            Self::Exception => "Exception",
            Self::Namespace => "Namespace",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The payload of a runtime value.
#[derive(Debug, Clone)]
pub enum Data {
    /// The absence of a value.
    Null,
    /// A 64 bit signed integer.
    Int(i64),
    /// A double precision float.
    Float(f64),
    /// An immutable string.
    Str(Rc<str>),
    /// `True` or `False`.
    Bool(bool),
    /// An ordered, homogeneous list such as `[1, 2, 3]`.
    Array(Rc<Vec<Value>>),
    /// An ordered, homogeneous group such as `(1, 2)`.
    Tuple(Rc<Vec<Value>>),
    /// A mapping such as `{"a": 1}`.
    Dict(Rc<Dictionary>),
    /// A user function together with its closure.
    Func(Rc<Function>),
    /// A function implemented by the interpreter.
    BuiltIn(&'static BuiltIn),
    /// An error caught by a handler block.
    Exception(Rc<RuntimeError>),
    /// The bindings of an included module.
    Namespace(Rc<Namespace>),
}

/// One hop in the history of a value: where it was before being moved.
#[derive(Debug, Clone)]
pub struct Origin {
    /// The span the value occupied.
    pub span:    Span,
    /// Display name of the frame it was evaluated in.
    pub display: Rc<str>,
}

/// A runtime value together with its diagnostic metadata.
///
/// Values are never mutated in place once bound: every access copies the
/// value and records the previous location in [`Value::origin`].
#[derive(Debug, Clone)]
pub struct Value {
    /// The payload.
    pub data:     Data,
    /// Where the value was last produced or accessed.
    pub span:     Option<Span>,
    /// Display name of the frame that produced it.
    pub owner:    Option<Rc<str>>,
    /// Previous locations, oldest first.
    pub origin:   Vec<Origin>,
    /// The name of the most recent binding holding this value.
    pub name:     Option<Rc<str>>,
    /// Reserved bindings can not be overwritten.
    pub reserved: bool,
}

impl Value {
    /// Wraps a payload with no position information.
    #[must_use]
    pub const fn new(data: Data) -> Self {
        Self { data,
               span: None,
               owner: None,
               origin: Vec::new(),
               name: None,
               reserved: false }
    }

    #[must_use]
    pub const fn null() -> Self {
        Self::new(Data::Null)
    }

    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::new(Data::Int(value))
    }

    #[must_use]
    pub const fn float(value: f64) -> Self {
        Self::new(Data::Float(value))
    }

    #[must_use]
    pub const fn bool(value: bool) -> Self {
        Self::new(Data::Bool(value))
    }

    #[must_use]
    pub fn string(value: impl Into<Rc<str>>) -> Self {
        Self::new(Data::Str(value.into()))
    }

    /// Builds an array, requiring every element to share the first one's kind.
    ///
    /// # Errors
    /// A `ValueError` naming both kinds if an element does not match.
    pub fn array(elements: Vec<Self>) -> Result<Self, RuntimeError> {
        check_homogeneous("Array", "elements", elements.iter())?;
        Ok(Self::new(Data::Array(Rc::new(elements))))
    }

    /// Builds a tuple, requiring every element to share the first one's kind.
    ///
    /// # Errors
    /// A `ValueError` naming both kinds if an element does not match.
    pub fn tuple(elements: Vec<Self>) -> Result<Self, RuntimeError> {
        check_homogeneous("Tuple", "elements", elements.iter())?;
        Ok(Self::new(Data::Tuple(Rc::new(elements))))
    }

    /// Builds a dictionary; keys and values are each checked for a single kind.
    ///
    /// # Errors
    /// A `ValueError` on mixed kinds or unhashable keys.
    pub fn dict(entries: Vec<(Self, Self)>) -> Result<Self, RuntimeError> {
        check_homogeneous("Dict", "keys", entries.iter().map(|(key, _)| key))?;
        check_homogeneous("Dict", "values", entries.iter().map(|(_, value)| value))?;
        Ok(Self::new(Data::Dict(Rc::new(Dictionary::from_entries(entries)?))))
    }

    /// The value's kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match &self.data {
            Data::Null => Kind::Null,
            Data::Int(_) => Kind::Int,
            Data::Float(_) => Kind::Float,
            Data::Str(_) => Kind::Str,
            Data::Bool(_) => Kind::Bool,
            Data::Array(_) => Kind::Array,
            Data::Tuple(_) => Kind::Tuple,
            Data::Dict(_) => Kind::Dict,
            Data::Func(_) => Kind::Func,
            Data::BuiltIn(_) => Kind::BuiltInFunc,
            Data::Exception(_) => Kind::Exception,
            Data::Namespace(_) => Kind::Namespace,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self.data, Data::Null)
    }

    /// Places the value at `span`, produced by the frame `owner`.
    #[must_use]
    pub fn at(mut self, span: &Span, owner: &Rc<str>) -> Self {
        self.span = Some(span.clone());
        self.owner = Some(Rc::clone(owner));
        self
    }

    /// Copies the value to a new location, remembering where it came from.
    ///
    /// The copy is never reserved: reservation belongs to the binding the
    /// value was read from.
    #[must_use]
    pub fn relocate(&self, span: &Span, owner: &Rc<str>) -> Self {
        let mut copy = self.clone();
        if let Some(previous) = copy.span.take() {
            if copy.origin.len() == MAX_ORIGIN_DEPTH {
                copy.origin.remove(0);
            }
            let display = copy.owner
                              .clone()
                              .unwrap_or_else(|| Rc::from("<builtin>"));
            copy.origin.push(Origin { span: previous,
                                      display });
        }
        copy.reserved = false;
        copy.at(span, owner)
    }

    /// Marks the value as held by the binding `name`.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(Rc::from(name));
        self
    }

    /// Marks the value as reserved.
    #[must_use]
    pub fn reserve(mut self) -> Self {
        self.reserved = true;
        self
    }

    /// The history of this value including its current location.
    #[must_use]
    pub fn provenance(&self) -> Vec<Origin> {
        let mut chain = self.origin.clone();
        if let (Some(span), Some(display)) = (&self.span, &self.owner) {
            chain.push(Origin { span:    span.clone(),
                                display: Rc::clone(display), });
        }
        chain
    }
}

/// Values compare by kind and payload; positions and history are ignored.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.payload_eq(other)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::string(v)
    }
}

fn check_homogeneous<'a>(container: &str,
                         what: &str,
                         mut items: impl Iterator<Item = &'a Value>)
                         -> Result<(), RuntimeError> {
    let Some(first) = items.next() else {
        return Ok(());
    };
    let expected = first.kind();
    for item in items {
        if item.kind() != expected {
            return Err(RuntimeError::new(ErrorKind::Value,
                                         format!("{container} {what} must be of type {expected}, {} given",
                                                 item.kind()),
                                         item.span.clone()).with_origin(&item.origin));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::position::SourceFile;

    #[test]
    fn collections_lock_the_first_kind() {
        assert!(Value::array(vec![Value::int(1), Value::int(2)]).is_ok());
        assert!(Value::array(Vec::new()).is_ok());

        let err = Value::array(vec![Value::int(1), Value::string("a")]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Value);
        assert!(err.message.contains("Int"));
        assert!(err.message.contains("Str"));

        let err = Value::dict(vec![(Value::string("a"), Value::int(1)),
                                   (Value::string("b"), Value::float(1.0))]).unwrap_err();
        assert!(err.message.contains("values"));
    }

    #[test]
    fn relocating_records_the_previous_span() {
        let source = SourceFile::new("t.peri", "var x = 1\nx");
        let owner: Rc<str> = Rc::from("<program>");
        let value = Value::int(1).at(&source.span(8, 9), &owner).reserve();

        let moved = value.relocate(&source.span(10, 11), &owner);
        assert_eq!(moved.origin.len(), 1);
        assert_eq!(moved.origin[0].span.start.column, 8);
        assert_eq!(moved.span.as_ref().map(|s| s.start.line), Some(1));
        assert!(!moved.reserved);
        assert_eq!(moved.provenance().len(), 2);
    }

    #[test]
    fn origin_chains_are_bounded() {
        let source = SourceFile::new("t.peri", "x");
        let owner: Rc<str> = Rc::from("<program>");
        let mut value = Value::int(1).at(&source.span(0, 1), &owner);
        for _ in 0..MAX_ORIGIN_DEPTH * 2 {
            value = value.relocate(&source.span(0, 1), &owner);
        }

        assert_eq!(value.origin.len(), MAX_ORIGIN_DEPTH);
    }
}
