use std::{fmt, rc::Rc};

use crate::{
    ast::Node,
    interpreter::{
        context::Scope,
        value::core::{Kind, Value},
    },
};

/// A positional parameter of a user function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// The kind every argument bound to this parameter must have.
    pub kind: Option<Kind>,
}

/// A user function: its signature, its body, and the scope it closes over.
///
/// The closure is a strong reference. A function stored in the scope it
/// closes over (every named recursive function) forms a reference cycle and
/// is only freed with the process; so is an exception kept in a scope of the
/// frames it records.
pub struct Function {
    /// Positional parameters, in declaration order.
    pub params:      Vec<Parameter>,
    /// Named options with their default values, in declaration order.
    pub options:     Vec<(String, Value)>,
    /// The kind the function must return, if declared.
    pub return_kind: Option<Kind>,
    pub body:        Rc<[Node]>,
    /// The scope the function was created in.
    pub closure:     Scope,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
         .field("params", &self.params)
         .field("options", &self.options.iter().map(|(name, _)| name).collect::<Vec<_>>())
         .field("return_kind", &self.return_kind)
         .finish_non_exhaustive()
    }
}

/// The bindings produced by including a module.
#[derive(Debug)]
pub struct Namespace {
    /// The dotted module name the namespace was included as.
    pub name:    String,
    pub symbols: Scope,
}
