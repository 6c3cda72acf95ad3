use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::interpreter::{position::Span, value::core::Value};

/// A shared handle to a [`SymbolTable`].
///
/// Call frames own their table, but closures created inside a frame keep it
/// alive for as long as they are reachable.
pub type Scope = Rc<RefCell<SymbolTable>>;

/// One level of lexical scope.
///
/// Lookups walk from a table to its parent until the root is reached.
#[derive(Default)]
pub struct SymbolTable {
    bindings: HashMap<String, Value>,
    parent:   Option<Scope>,
}

impl SymbolTable {
    /// Creates a table with no parent.
    #[must_use]
    pub fn root() -> Scope {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Creates an empty table enclosed by `parent`.
    #[must_use]
    pub fn child(parent: &Scope) -> Scope {
        Rc::new(RefCell::new(Self { bindings: HashMap::new(),
                                    parent:   Some(Rc::clone(parent)), }))
    }

    /// Binds `name` in this table, replacing any existing binding here.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Returns the binding of `name` in this table only.
    #[must_use]
    pub fn get_local(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Returns the nearest binding of `name`, walking up the parent chain.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref()?.borrow().get(name)
    }

    /// Finds the table owning the nearest binding of `name`.
    #[must_use]
    pub fn owner(scope: &Scope, name: &str) -> Option<Scope> {
        let mut current = Rc::clone(scope);
        loop {
            if current.borrow().bindings.contains_key(name) {
                return Some(current);
            }
            let parent = current.borrow().parent.clone();
            current = parent?;
        }
    }

    /// Names bound directly in this table, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
         .field("names", &self.names())
         .field("has_parent", &self.parent.is_some())
         .finish()
    }
}

/// What kind of code a [`Context`] is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// The program's top level.
    Program,
    /// The top level of an included module.
    Module,
    /// The body of a user function.
    Function,
}

/// One frame of the dynamic call stack.
///
/// Contexts exist to rebuild tracebacks: each one remembers who called it and
/// from where. Lexical lookups go through [`Context::symbols`] instead.
pub struct Context {
    /// Name shown in tracebacks, e.g. `<program>` or a function name.
    pub display:   Rc<str>,
    /// The scope statements in this frame are evaluated against.
    pub symbols:   Scope,
    /// The calling frame.
    pub parent:    Option<Rc<Self>>,
    /// The span of the call that created this frame.
    pub call_site: Option<Span>,
    pub frame:     Frame,
    /// Number of enclosing function frames, this one included.
    pub depth:     usize,
}

impl Context {
    /// Creates a frame with no caller.
    #[must_use]
    pub fn root(display: impl Into<Rc<str>>, symbols: Scope, frame: Frame) -> Rc<Self> {
        Rc::new(Self { display: display.into(),
                       symbols,
                       parent: None,
                       call_site: None,
                       frame,
                       depth: 0 })
    }

    /// Creates the frame of a call made from `caller` at `call_site`.
    #[must_use]
    pub fn call(display: impl Into<Rc<str>>,
                symbols: Scope,
                caller: &Rc<Self>,
                call_site: Span,
                frame: Frame)
                -> Rc<Self> {
        let depth = caller.depth + usize::from(frame == Frame::Function);
        Rc::new(Self { display: display.into(),
                       symbols,
                       parent: Some(Rc::clone(caller)),
                       call_site: Some(call_site),
                       frame,
                       depth })
    }

    /// Whether `return()` is allowed in this frame.
    #[must_use]
    pub fn in_function(&self) -> bool {
        self.frame == Frame::Function
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
         .field("display", &self.display)
         .field("frame", &self.frame)
         .field("call_site", &self.call_site)
         .field("parent", &self.parent.as_ref().map(|parent| &parent.display))
         .finish_non_exhaustive()
    }
}
