use std::rc::Rc;

use crate::interpreter::position::Span;

/// Binary operators, in no particular precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `^`
    Power,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `and`
    And,
    /// `or`
    Or,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `+`
    Plus,
    /// `-`
    Negate,
    /// `not`
    Not,
}

/// A positional parameter in a function literal, e.g. `x` or `x: int`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDef {
    pub name:          String,
    /// Expression evaluating to the type tag the argument must match.
    pub declared_type: Option<Node>,
    pub span:          Span,
}

/// A named option with a default value, e.g. `end = "\n"`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDef {
    pub name:    String,
    pub default: Node,
    pub span:    Span,
}

/// The signature and body of a function literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub params:      Vec<ParameterDef>,
    pub options:     Vec<OptionDef>,
    /// Expression evaluating to the type tag of the return value.
    pub return_type: Option<Node>,
    pub body:        Rc<[Node]>,
}

/// A named argument at a call site, e.g. `f(1, end = "")`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArgument {
    pub name:  String,
    pub value: Node,
    pub span:  Span,
}

/// One parenthesised argument list of a call.
///
/// `f(1)(2)` has two of these.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArguments {
    pub positional: Vec<Node>,
    pub named:      Vec<NamedArgument>,
    /// From the opening to the closing parenthesis.
    pub span:       Span,
}

/// A condition and the block it guards.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Node,
    pub body:      Vec<Node>,
}

/// A node of the abstract syntax tree together with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    #[must_use]
    pub const fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Every construct of the language.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An integer literal such as `42`.
    Int(i64),
    /// A float literal such as `0.5`.
    Float(f64),
    /// A string literal such as `"hi"`.
    Str(String),
    /// `[a, b, c]`
    Array(Vec<Node>),
    /// `(a, b, c)`
    Tuple(Vec<Node>),
    /// `{key: value, ...}`
    Dict(Vec<(Node, Node)>),
    /// A bare identifier.
    VarAccess(String),
    /// `name = value`, rebinding an existing name.
    VarAssign { name: String, value: Box<Node> },
    /// `var name = value`
    VarCreate { name: String, value: Box<Node> },
    /// `var name`, binding `Null`.
    VarNull(String),
    /// A prefix operator applied to an operand.
    Unary { op: UnaryOperator, operand: Box<Node> },
    /// An infix operator applied to two operands.
    Binary {
        left:  Box<Node>,
        op:    BinaryOperator,
        right: Box<Node>,
    },
    /// `func(params) -> type { body }` or `lambda(params) { expr }`.
    Function(Rc<FunctionDef>),
    /// `callee(args)(args)...`
    Call {
        callee: Box<Node>,
        calls:  Vec<CallArguments>,
    },
    /// `target.name`
    Attribute { target: Box<Node>, name: String },
    /// `target[index]`
    Index { target: Box<Node>, index: Box<Node> },
    /// `return()` or `return(value)`
    Return(Option<Box<Node>>),
    /// `break()`
    Break,
    /// `continue()`
    Continue,
    /// `if (c) {..} elif (c) {..} else {..}`
    If {
        branches:  Vec<Branch>,
        otherwise: Option<Vec<Node>>,
    },
    /// `switch (var name as subject) { when (c) {..} else {..} }`
    Switch {
        name:      String,
        /// Whether the scrutinee was introduced with `var`.
        overwrite: bool,
        subject:   Box<Node>,
        cases:     Vec<Branch>,
        otherwise: Option<Vec<Node>>,
    },
    /// `for (var name in iterable) { body }`
    For {
        name:      String,
        /// Whether the loop variable was introduced with `var`.
        overwrite: bool,
        iterable:  Box<Node>,
        body:      Vec<Node>,
    },
    /// `while (condition) { body }`
    While { condition: Box<Node>, body: Vec<Node> },
    /// `handler { body }`
    Handler(Vec<Node>),
    /// `include(module_name)`
    Include(Box<Node>),
}
