use std::{collections::HashMap, rc::Rc};

use ordered_float::OrderedFloat;

use crate::{
    error::{ErrorKind, RuntimeError},
    interpreter::value::core::{Data, Value},
};

/// The hashable projection of a value used as a dictionary key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DictKey {
    /// `Null`.
    Null,
    /// An integer such as `-4` or `42`.
    Int(i64),
    /// A float such as `3.14`.
    Float(OrderedFloat<f64>),
    /// A string such as `"key"`.
    Str(Rc<str>),
    /// `True` or `False`.
    Bool(bool),
    /// A tuple of hashable values such as `(1, 2)`.
    Tuple(Vec<DictKey>),
}

impl TryFrom<&Value> for DictKey {
    type Error = RuntimeError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        Ok(match &v.data {
            Data::Null => Self::Null,
            Data::Int(i) => Self::Int(*i),
            Data::Float(f) => Self::Float(OrderedFloat(*f)),
            Data::Str(s) => Self::Str(Rc::clone(s)),
            Data::Bool(b) => Self::Bool(*b),
            Data::Tuple(items) => Self::Tuple(items.iter()
                                                   .map(Self::try_from)
                                                   .collect::<Result<_, _>>()?),
            _ => {
                return Err(RuntimeError::new(ErrorKind::Value,
                                             format!("{} can not be used as a dictionary key",
                                                     v.kind()),
                                             v.span.clone()).with_origin(&v.origin));
            },
        })
    }
}

/// An insertion-ordered mapping from hashable values to values.
///
/// Later entries with an equal key replace earlier ones but keep the earlier
/// entry's position.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<(Value, Value)>,
    index:   HashMap<DictKey, usize>,
}

impl Dictionary {
    /// Builds a dictionary from key/value pairs.
    ///
    /// # Errors
    /// A `ValueError` if a key is not hashable.
    pub fn from_entries(pairs: Vec<(Value, Value)>) -> Result<Self, RuntimeError> {
        let mut dict = Self::default();
        for (key, value) in pairs {
            let hashed = DictKey::try_from(&key)?;
            if let Some(&slot) = dict.index.get(&hashed) {
                dict.entries[slot] = (key, value);
            } else {
                dict.index.insert(hashed, dict.entries.len());
                dict.entries.push((key, value));
            }
        }
        Ok(dict)
    }

    /// Looks up the value stored under `key`.
    ///
    /// # Errors
    /// A `ValueError` if `key` is not hashable.
    pub fn get(&self, key: &Value) -> Result<Option<&Value>, RuntimeError> {
        let hashed = DictKey::try_from(key)?;
        Ok(self.index.get(&hashed).map(|&slot| &self.entries[slot].1))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_keys_replace_earlier_ones_in_place() {
        let dict = Dictionary::from_entries(vec![(Value::string("a"), Value::int(1)),
                                                 (Value::string("b"), Value::int(2)),
                                                 (Value::string("a"), Value::int(3))]).unwrap();

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(&Value::string("a")).unwrap(), Some(&Value::int(3)));
        assert_eq!(dict.iter().next().map(|(k, _)| k.clone()), Some(Value::string("a")));
    }

    #[test]
    fn float_and_tuple_keys_hash() {
        let key = Value::tuple(vec![Value::float(0.5), Value::float(1.5)]).unwrap();
        let dict = Dictionary::from_entries(vec![(key.clone(), Value::bool(true))]).unwrap();

        assert_eq!(dict.get(&key).unwrap(), Some(&Value::bool(true)));
        assert_eq!(dict.get(&Value::tuple(Vec::new()).unwrap()).unwrap(), None);
    }

    #[test]
    fn arrays_are_not_hashable() {
        let key = Value::array(vec![Value::int(1)]).unwrap();
        let err = Dictionary::from_entries(vec![(key, Value::null())]).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Value);
    }
}
