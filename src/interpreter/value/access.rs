use crate::{
    error::{ErrorKind, RuntimeError},
    interpreter::{
        position::Span,
        value::core::{Data, Value},
    },
    util::num::{len_to_i64, normalize_index},
};

impl Value {
    /// `self.name`
    ///
    /// Namespaces expose their bindings, exceptions expose `kind` and
    /// `message`, and sized collections expose `length`.
    pub fn get_attribute(&self, name: &str, span: &Span) -> Result<Self, RuntimeError> {
        let found = match (&self.data, name) {
            (Data::Namespace(namespace), _) => namespace.symbols.borrow().get_local(name).cloned(),
            (Data::Exception(error), "kind") => Some(Self::string(error.kind.name())),
            (Data::Exception(error), "message") => Some(Self::string(error.message.as_str())),
            (Data::Str(s), "length") => Some(Self::int(len_to_i64(s.chars().count()))),
            (Data::Array(items) | Data::Tuple(items), "length") => {
                Some(Self::int(len_to_i64(items.len())))
            },
            (Data::Dict(dict), "length") => Some(Self::int(len_to_i64(dict.len()))),
            _ => None,
        };

        found.ok_or_else(|| {
                 let owner = match &self.data {
                     Data::Namespace(namespace) => format!("Namespace '{}'", namespace.name),
                     _ => self.kind().to_string(),
                 };
                 RuntimeError::at(ErrorKind::Attribute,
                                  format!("{owner} has no attribute '{name}'"),
                                  span).with_origin(&self.origin)
             })
    }

    /// `self[index]`
    ///
    /// Sequences take an `Int` index, negative values counting from the end;
    /// dictionaries take a key of their key kind.
    pub fn get_index(&self, index: &Self, span: &Span) -> Result<Self, RuntimeError> {
        match (&self.data, &index.data) {
            (Data::Array(items) | Data::Tuple(items), Data::Int(i)) => {
                normalize_index(*i, items.len()).map(|slot| items[slot].clone())
                                                .ok_or_else(|| self.out_of_range(*i, items.len(), span))
            },
            (Data::Str(s), Data::Int(i)) => {
                let len = s.chars().count();
                normalize_index(*i, len).and_then(|slot| s.chars().nth(slot))
                                        .map(|c| Self::string(c.to_string()))
                                        .ok_or_else(|| self.out_of_range(*i, len, span))
            },
            (Data::Array(_) | Data::Tuple(_) | Data::Str(_), _) => {
                Err(RuntimeError::at(ErrorKind::Type,
                                     format!("{} indices must be of type Int, {} given",
                                             self.kind(),
                                             index.kind()),
                                     span).with_origin(&index.origin))
            },
            (Data::Dict(dict), _) => {
                dict.get(index)?.cloned().ok_or_else(|| {
                                              RuntimeError::at(ErrorKind::Index,
                                                               format!("Key {} was not found",
                                                                       index.repr()),
                                                               span).with_origin(&index.origin)
                                          })
            },
            _ => Err(RuntimeError::at(ErrorKind::Operation,
                                      format!("{} can not be indexed", self.kind()),
                                      span).with_origin(&self.origin)),
        }
    }

    /// The elements a `for` loop visits, or `None` if the kind is not
    /// iterable.
    ///
    /// Strings yield one-character strings and dictionaries yield their keys
    /// in insertion order.
    #[must_use]
    pub fn elements(&self) -> Option<Vec<Self>> {
        match &self.data {
            Data::Array(items) | Data::Tuple(items) => Some(items.as_ref().clone()),
            Data::Str(s) => Some(s.chars().map(|c| Self::string(c.to_string())).collect()),
            Data::Dict(dict) => Some(dict.iter().map(|(key, _)| key.clone()).collect()),
            _ => None,
        }
    }

    fn out_of_range(&self, index: i64, len: usize, span: &Span) -> RuntimeError {
        RuntimeError::at(ErrorKind::Index,
                         format!("Index {index} is out of range for {} of length {len}",
                                 self.kind()),
                         span).with_origin(&self.origin)
    }
}
