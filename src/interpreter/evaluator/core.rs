use std::{
    io::{self, Write},
    rc::Rc,
};

use crate::{
    ast::{Node, NodeKind},
    error::{Error, ErrorKind, RuntimeError},
    interpreter::{
        config::Config,
        context::{Context, Frame, Scope, SymbolTable},
        evaluator::function::core::PRELUDE,
        lexer::{normalize, tokenize},
        parser::core::parse,
        position::{SourceFile, Span},
        value::core::{Data, Value},
    },
};

/// Remaining stack below which evaluation moves to a fresh segment.
const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each extra stack segment.
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Why evaluation of a node stopped early.
///
/// Every non-local exit travels up the recursion as the `Err` side of an
/// [`EvalResult`], so `?` forwards it through every enclosing construct until
/// the one that handles it: function calls stop `Return`, loops stop `Break`
/// and `Continue`, handler blocks stop most `Error`s.
#[derive(Debug)]
pub enum Signal {
    /// `return(value)` inside a function body.
    Return(Value, Span),
    /// `break()` inside a loop body.
    Break(Span),
    /// `continue()` inside a loop body.
    Continue(Span),
    /// A runtime error.
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(error: RuntimeError) -> Self {
        Self::Error(error)
    }
}

impl Signal {
    /// Converts a signal that escaped every construct able to handle it into
    /// the error describing the misplaced statement.
    #[must_use]
    pub fn into_error(self) -> RuntimeError {
        match self {
            Self::Error(error) => error,
            Self::Return(_, span) => {
                RuntimeError::at(ErrorKind::Return, "Return can only be used inside a function", &span)
            },
            Self::Break(span) => RuntimeError::at(ErrorKind::Break, "Break can only be used inside a loop", &span),
            Self::Continue(span) => {
                RuntimeError::at(ErrorKind::Continue, "Continue can only be used inside a loop", &span)
            },
        }
    }
}

/// Result type used by the evaluator.
pub type EvalResult<T = Value> = Result<T, Signal>;

/// Attaches the frame an error was raised in.
pub trait InContext<T> {
    /// Records `context` and `span` on an error that does not have them yet.
    fn in_context(self, context: &Rc<Context>, span: &Span) -> EvalResult<T>;
}

impl<T> InContext<T> for Result<T, RuntimeError> {
    fn in_context(self, context: &Rc<Context>, span: &Span) -> EvalResult<T> {
        self.map_err(|error| Signal::Error(error.or_span(span).in_context(context)))
    }
}

/// Runs Peri.dot programs.
///
/// An interpreter owns the configuration, the reserved prelude of built-in
/// bindings and the writer `print` sends output to. Every call to
/// [`Interpreter::run`] starts from a fresh program scope, so runs do not see
/// each other's bindings.
///
/// ```
/// use peridot::interpreter::{config::Config, evaluator::core::Interpreter, value::core::Value};
///
/// let mut interpreter = Interpreter::new(Config::default());
/// let values = interpreter.run("<doc>", "var x = 20\nx + 22").unwrap();
///
/// assert_eq!(values[1], Value::int(42));
/// ```
pub struct Interpreter {
    pub(crate) config:    Config,
    output:               Box<dyn Write>,
    prelude:              Scope,
    /// Modules currently being included, outermost first.
    pub(crate) including: Vec<String>,
}

impl Interpreter {
    /// Creates an interpreter printing to standard output.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config,
               output: Box::new(io::stdout()),
               prelude: prelude(),
               including: Vec::new() }
    }

    /// Sends the output of `print` to `output` instead of standard output.
    #[must_use]
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Lexes, parses and evaluates `source`, reporting positions against
    /// `file`.
    ///
    /// Returns the value of every top-level statement.
    ///
    /// # Errors
    /// The first syntax or runtime error; output printed before a runtime
    /// error is not rolled back.
    pub fn run(&mut self, file: &str, source: &str) -> Result<Vec<Value>, Error> {
        let source = SourceFile::new(file, normalize(source));
        let context = Context::root("<program>", SymbolTable::child(&self.prelude), Frame::Program);
        self.execute(&source, &context)
    }

    /// A fresh scope enclosed by the prelude, for module top levels.
    pub(crate) fn module_scope(&self) -> Scope {
        SymbolTable::child(&self.prelude)
    }

    /// Evaluates a whole source file in `context`.
    pub(crate) fn execute(&mut self,
                          source: &Rc<SourceFile>,
                          context: &Rc<Context>)
                          -> Result<Vec<Value>, Error> {
        let lexemes = tokenize(source)?;
        let program = parse(&lexemes)?;

        let mut values = Vec::with_capacity(program.len());
        for statement in &program {
            let value = self.evaluate(statement, context, false)
                            .map_err(|signal| Error::Runtime(signal.into_error()))?;
            values.push(value);
        }
        Ok(values)
    }

    /// Writes one line of program output.
    pub(crate) fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }

    /// Evaluates a node.
    ///
    /// `inside_loop` tells whether `break()` and `continue()` have a loop to
    /// act on; function bodies reset it.
    ///
    /// # Errors
    /// A [`Signal`] for every non-local exit. Errors leaving this function
    /// always carry a span and the frame they were raised in.
    pub fn evaluate(&mut self, node: &Node, context: &Rc<Context>, inside_loop: bool) -> EvalResult {
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.dispatch(node, context, inside_loop)
        });
        result.map_err(|signal| match signal {
                  Signal::Error(error) => Signal::Error(error.or_span(&node.span).in_context(context)),
                  other => other,
              })
    }

    fn dispatch(&mut self, node: &Node, context: &Rc<Context>, inside_loop: bool) -> EvalResult {
        let span = &node.span;
        match &node.kind {
            NodeKind::Int(value) => Ok(Value::int(*value).at(span, &context.display)),
            NodeKind::Float(value) => Ok(Value::float(*value).at(span, &context.display)),
            NodeKind::Str(value) => Ok(Value::string(value.as_str()).at(span, &context.display)),
            NodeKind::Array(items) => self.eval_array(items, span, context, inside_loop),
            NodeKind::Tuple(items) => self.eval_tuple(items, span, context, inside_loop),
            NodeKind::Dict(entries) => self.eval_dict(entries, span, context, inside_loop),
            NodeKind::VarAccess(name) => Self::eval_access(name, span, context),
            NodeKind::VarAssign { name, value } => {
                let value = self.evaluate(value, context, inside_loop)?;
                Self::assign(name, value, span, context)
            },
            NodeKind::VarCreate { name, value } => {
                let value = self.evaluate(value, context, inside_loop)?;
                Self::create(name, value, span, context)
            },
            NodeKind::VarNull(name) => Self::create(name, Value::null().at(span, &context.display), span, context),
            NodeKind::Unary { op, operand } => self.eval_unary(*op, operand, span, context, inside_loop),
            NodeKind::Binary { left, op, right } => {
                self.eval_binary(left, *op, right, span, context, inside_loop)
            },
            NodeKind::Function(definition) => self.eval_function(definition, span, context, inside_loop),
            NodeKind::Call { callee, calls } => self.eval_call(callee, calls, context, inside_loop),
            NodeKind::Attribute { target, name } => {
                let target = self.evaluate(target, context, inside_loop)?;
                let value = target.get_attribute(name, span).in_context(context, span)?;
                Ok(value.relocate(span, &context.display))
            },
            NodeKind::Index { target, index } => {
                let target = self.evaluate(target, context, inside_loop)?;
                let index = self.evaluate(index, context, inside_loop)?;
                let value = target.get_index(&index, span).in_context(context, span)?;
                Ok(value.relocate(span, &context.display))
            },
            NodeKind::Return(value) => self.eval_return(value.as_deref(), span, context, inside_loop),
            NodeKind::Break => Self::eval_break(span, inside_loop),
            NodeKind::Continue => Self::eval_continue(span, inside_loop),
            NodeKind::If { branches, otherwise } => {
                self.eval_if(branches, otherwise.as_deref(), span, context, inside_loop)
            },
            NodeKind::Switch { name,
                               overwrite,
                               subject,
                               cases,
                               otherwise, } => {
                self.eval_switch(name, *overwrite, subject, cases, otherwise.as_deref(), span, context, inside_loop)
            },
            NodeKind::For { name,
                            overwrite,
                            iterable,
                            body, } => self.eval_for(name, *overwrite, iterable, body, span, context),
            NodeKind::While { condition, body } => self.eval_while(condition, body, span, context),
            NodeKind::Handler(body) => self.eval_handler(body, span, context, inside_loop),
            NodeKind::Include(module) => self.eval_include(module, span, context, inside_loop),
        }
    }

    /// Evaluates the statements of a block in order.
    ///
    /// Blocks share the scope of the surrounding code. The first signal stops
    /// the block and is passed on unchanged.
    pub(crate) fn eval_block(&mut self,
                             statements: &[Node],
                             context: &Rc<Context>,
                             inside_loop: bool)
                             -> EvalResult<()> {
        for statement in statements {
            self.evaluate(statement, context, inside_loop)?;
        }
        Ok(())
    }
}

/// The reserved root scope: constants and built-in functions.
fn prelude() -> Scope {
    let scope = SymbolTable::root();
    {
        let mut table = scope.borrow_mut();
        table.define("Null", Value::null().named("Null").reserve());
        table.define("True", Value::bool(true).named("True").reserve());
        table.define("False", Value::bool(false).named("False").reserve());
        for builtin in PRELUDE {
            table.define(builtin.name,
                         Value::new(Data::BuiltIn(builtin)).named(builtin.name).reserve());
        }
    }
    scope
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Result<Vec<Value>, Error> {
        Interpreter::new(Config::default()).run("t.peri", text)
    }

    #[test]
    fn every_statement_produces_a_value() {
        let values = run("1 + 2\nvar x = 4\nx * 2").unwrap();
        assert_eq!(values, vec![Value::int(3), Value::int(4), Value::int(8)]);
    }

    #[test]
    fn runs_do_not_share_bindings() {
        let mut interpreter = Interpreter::new(Config::default());
        interpreter.run("a.peri", "var x = 1").unwrap();

        let Err(Error::Runtime(error)) = interpreter.run("b.peri", "x") else {
            panic!("x leaked between runs");
        };
        assert_eq!(error.kind, ErrorKind::Identifier);
    }

    #[test]
    fn errors_carry_their_frame_and_span() {
        let Err(Error::Runtime(error)) = run("var f = func() {\n1 + \"a\"\n}\nf()") else {
            panic!("expected a runtime error");
        };
        assert_eq!(error.kind, ErrorKind::Operation);
        assert_eq!(&*error.context.unwrap().display, "f");
        assert_eq!(error.span.unwrap().start.line, 1);
    }

    #[test]
    fn misplaced_control_flow_is_reported() {
        for (text, kind) in [("return(1)", ErrorKind::Return),
                             ("break()", ErrorKind::Break),
                             ("continue()", ErrorKind::Continue)]
        {
            let Err(Error::Runtime(error)) = run(text) else {
                panic!("{text} should fail");
            };
            assert_eq!(error.kind, kind);
        }
    }
}
