use std::fmt::{self, Display, Write as _};

use crate::{
    interpreter::value::core::{Data, Value},
    util::num::format_float,
};

impl Display for Value {
    /// Formats the value the way `print` shows it: strings appear without
    /// quotes, everything nested inside a collection uses [`Value::repr`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Data::Str(s) => f.write_str(s),
            _ => f.write_str(&self.repr()),
        }
    }
}

impl Value {
    /// The source-like representation of the value.
    #[must_use]
    pub fn repr(&self) -> String {
        match &self.data {
            Data::Null => "Null".to_owned(),
            Data::Int(i) => i.to_string(),
            Data::Float(x) => format_float(*x),
            Data::Str(s) => format!("{s:?}"),
            Data::Bool(true) => "True".to_owned(),
            Data::Bool(false) => "False".to_owned(),
            Data::Array(items) => format!("[{}]", join(items.iter())),
            Data::Tuple(items) if items.len() == 1 => format!("({},)", items[0].repr()),
            Data::Tuple(items) => format!("({})", join(items.iter())),
            Data::Dict(dict) => {
                let mut out = String::from("{");
                for (i, (key, value)) in dict.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{}: {}", key.repr(), value.repr());
                }
                out.push('}');
                out
            },
            Data::Func(_) => match &self.name {
                Some(name) => format!("<Func {name}>"),
                None => "<Func>".to_owned(),
            },
            Data::BuiltIn(builtin) => format!("<BuiltInFunc {}>", builtin.name),
            Data::Exception(error) => format!("<Exception {}: {}>", error.kind, error.message),
            Data::Namespace(namespace) => format!("<Namespace {}>", namespace.name),
        }
    }
}

fn join<'a>(items: impl Iterator<Item = &'a Value>) -> String {
    items.map(Value::repr).collect::<Vec<_>>().join(", ")
}
