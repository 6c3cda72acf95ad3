use std::rc::Rc;

use crate::{
    ast::{CallArguments, FunctionDef, Node},
    error::{ErrorKind, RuntimeError},
    interpreter::{
        context::{Context, Frame, SymbolTable},
        evaluator::{
            core::{EvalResult, InContext, Interpreter, Signal},
            function::{builtin, convert},
        },
        position::Span,
        value::{
            core::{Data, Kind, Value},
            function::{Function, Parameter},
        },
    },
};

/// Signature of built-in function implementations.
///
/// A builtin receives the interpreter (for output), the evaluated positional
/// arguments and the span of the call.
pub type BuiltinFn = fn(&mut Interpreter, &[Value], &Span) -> Result<Value, RuntimeError>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
#[derive(Debug, Clone, Copy)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(counts) => counts.contains(&n),
        }
    }

    fn describe(&self) -> String {
        let counts: &[usize] = match self {
            Self::Exact(m) => std::slice::from_ref(m),
            Self::OneOf(counts) => counts,
        };
        let counts = counts.iter().map(ToString::to_string).collect::<Vec<_>>();
        match counts.split_last() {
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
            None => "no".to_owned(),
        }
    }
}

/// A function implemented by the interpreter.
#[derive(Debug)]
pub struct BuiltIn {
    pub name:     &'static str,
    pub arity:    Arity,
    /// The kind this builtin stands for when used as a type tag, e.g. `int`.
    pub produces: Option<Kind>,
    pub func:     BuiltinFn,
}

/// Defines a static table of builtin functions.
///
/// Each entry provides:
/// - a string name,
/// - the accepted argument counts,
/// - optionally the kind the builtin stands for as a type tag,
/// - a function pointer implementing the builtin.
macro_rules! builtin_functions {
    (
        $table:ident {
            $(
                $name:literal => {
                    arity: $arity:expr,
                    $(produces: $kind:expr,)?
                    func: $func:expr $(,)?
                }
            ),* $(,)?
        }
    ) => {
        pub static $table: &[BuiltIn] = &[
            $(
                BuiltIn { name:     $name,
                          arity:    $arity,
                          produces: builtin_functions!(@produces $($kind)?),
                          func:     $func },
            )*
        ];
    };
    (@produces) => { None };
    (@produces $kind:expr) => { Some($kind) };
}

pub(crate) use builtin_functions;

builtin_functions! {
    PRELUDE {
        "print"  => { arity: Arity::OneOf(&[0, 1]), func: builtin::print },
        "range"  => { arity: Arity::OneOf(&[1, 2, 3]), func: builtin::range },
        "type"   => { arity: Arity::Exact(1), func: builtin::type_of },
        "panic"  => { arity: Arity::Exact(1), func: builtin::panic },
        "throw"  => { arity: Arity::Exact(1), func: builtin::throw },
        "assert" => { arity: Arity::OneOf(&[1, 2]), func: builtin::assert },
        "str"    => { arity: Arity::Exact(1), produces: Kind::Str, func: convert::to_str },
        "int"    => { arity: Arity::Exact(1), produces: Kind::Int, func: convert::to_int },
        "float"  => { arity: Arity::Exact(1), produces: Kind::Float, func: convert::to_float },
        "bool"   => { arity: Arity::Exact(1), produces: Kind::Bool, func: convert::to_bool },
        "array"  => { arity: Arity::Exact(1), produces: Kind::Array, func: convert::to_array },
        "tuple"  => { arity: Arity::Exact(1), produces: Kind::Tuple, func: convert::to_tuple },
    }
}

/// Arguments of one call, evaluated.
struct Arguments {
    positional: Vec<Value>,
    named:      Vec<(String, Value, Span)>,
    span:       Span,
}

impl Interpreter {
    /// Creates a function value from a literal.
    ///
    /// Type annotations and option defaults are evaluated once, here, in the
    /// defining scope; the function closes over that scope.
    pub(crate) fn eval_function(&mut self,
                                definition: &FunctionDef,
                                span: &Span,
                                context: &Rc<Context>,
                                inside_loop: bool)
                                -> EvalResult {
        let mut params = Vec::with_capacity(definition.params.len());
        for param in &definition.params {
            let kind = match &param.declared_type {
                Some(node) => Some(self.eval_type_tag(node, context, inside_loop)?),
                None => None,
            };
            params.push(Parameter { name: param.name.clone(),
                                    kind });
        }

        let mut options = Vec::with_capacity(definition.options.len());
        for option in &definition.options {
            let default = self.evaluate(&option.default, context, inside_loop)?;
            options.push((option.name.clone(), default));
        }

        let return_kind = match &definition.return_type {
            Some(node) => Some(self.eval_type_tag(node, context, inside_loop)?),
            None => None,
        };

        let function = Function { params,
                                  options,
                                  return_kind,
                                  body: Rc::clone(&definition.body),
                                  closure: Rc::clone(&context.symbols) };

        Ok(Value::new(Data::Func(Rc::new(function))).at(span, &context.display))
    }

    /// Evaluates a type annotation such as `int` to the kind it names.
    fn eval_type_tag(&mut self, node: &Node, context: &Rc<Context>, inside_loop: bool) -> EvalResult<Kind> {
        let tag = self.evaluate(node, context, inside_loop)?;
        match &tag.data {
            Data::BuiltIn(BuiltIn { produces: Some(kind), .. }) => Ok(*kind),
            _ => Err(RuntimeError::at(ErrorKind::Type,
                                      format!("{} is not a type", tag.repr()),
                                      &node.span).with_origin(&tag.provenance())
                                                 .into()),
        }
    }

    /// Evaluates `callee(args)(args)...`.
    ///
    /// Each argument list is evaluated left to right and applied to the result
    /// of the previous call.
    pub(crate) fn eval_call(&mut self,
                            callee: &Node,
                            calls: &[CallArguments],
                            context: &Rc<Context>,
                            inside_loop: bool)
                            -> EvalResult {
        let mut target = self.evaluate(callee, context, inside_loop)?;

        for call in calls {
            let mut arguments = Arguments { positional: Vec::with_capacity(call.positional.len()),
                                            named:      Vec::with_capacity(call.named.len()),
                                            span:       callee.span.to(&call.span), };
            for argument in &call.positional {
                arguments.positional.push(self.evaluate(argument, context, inside_loop)?);
            }
            for argument in &call.named {
                let value = self.evaluate(&argument.value, context, inside_loop)?;
                arguments.named.push((argument.name.clone(), value, argument.span.clone()));
            }

            target = self.call(&target, arguments, context)?;
        }

        Ok(target)
    }

    fn call(&mut self, callee: &Value, arguments: Arguments, context: &Rc<Context>) -> EvalResult {
        match &callee.data {
            Data::BuiltIn(builtin) => self.call_builtin(builtin, arguments, context),
            Data::Func(function) => {
                let name = callee.name.as_deref().unwrap_or("<anonymous>");
                self.call_function(function, name, arguments, context)
            },
            _ => Err(RuntimeError::new(ErrorKind::Operation,
                                       format!("{} can not be called", callee.kind()),
                                       callee.span.clone()).with_origin(&callee.origin)
                                                           .into()),
        }
    }

    fn call_builtin(&mut self, builtin: &BuiltIn, arguments: Arguments, context: &Rc<Context>) -> EvalResult {
        let span = &arguments.span;

        if let Some((name, _, name_span)) = arguments.named.first() {
            return Err(RuntimeError::at(ErrorKind::Argument,
                                        format!("{} has no option '{name}'", builtin.name),
                                        name_span).into());
        }
        if !builtin.arity.check(arguments.positional.len()) {
            return Err(RuntimeError::at(ErrorKind::Argument,
                                        format!("{} takes {} argument(s), {} given",
                                                builtin.name,
                                                builtin.arity.describe(),
                                                arguments.positional.len()),
                                        span).into());
        }

        let result = (builtin.func)(self, &arguments.positional, span).in_context(context, span)?;
        Ok(result.relocate(span, &context.display))
    }

    /// Calls a user function.
    ///
    /// A new frame is created whose scope is a child of the function's
    /// closure. Arguments are checked against the declared parameter kinds and
    /// the result against the declared return kind.
    fn call_function(&mut self,
                     function: &Function,
                     name: &str,
                     arguments: Arguments,
                     context: &Rc<Context>)
                     -> EvalResult {
        let span = &arguments.span;

        if context.depth >= self.config.max_call_depth {
            return Err(RuntimeError::at(ErrorKind::Panic,
                                        format!("Maximum call depth of {} exceeded",
                                                self.config.max_call_depth),
                                        span).into());
        }
        if arguments.positional.len() != function.params.len() {
            return Err(RuntimeError::at(ErrorKind::Argument,
                                        format!("{name} takes {} argument(s), {} given",
                                                function.params.len(),
                                                arguments.positional.len()),
                                        span).into());
        }

        let scope = SymbolTable::child(&function.closure);
        {
            let mut table = scope.borrow_mut();
            for (param, value) in function.params.iter().zip(arguments.positional) {
                if let Some(kind) = param.kind
                   && value.kind() != kind
                {
                    return Err(RuntimeError::new(ErrorKind::Type,
                                                 format!("Argument '{}' of {name} must be of type {kind}, {} given",
                                                         param.name,
                                                         value.kind()),
                                                 value.span.clone()).with_origin(&value.origin)
                                                                    .into());
                }
                table.define(param.name.as_str(), value.named(&param.name));
            }

            for (option, default) in &function.options {
                table.define(option.as_str(), default.clone().named(option));
            }
            for (option, value, option_span) in arguments.named {
                if !function.options.iter().any(|(known, _)| *known == option) {
                    return Err(RuntimeError::at(ErrorKind::Argument,
                                                format!("{name} has no option '{option}'"),
                                                &option_span).into());
                }
                let value = value.named(&option);
                table.define(option, value);
            }
        }

        let frame = Context::call(name, scope, context, span.clone(), Frame::Function);
        tracing::trace!(function = name, depth = frame.depth, "call");

        let mut result = Value::null();
        for statement in function.body.iter() {
            match self.evaluate(statement, &frame, false) {
                Ok(_) => {},
                Err(Signal::Return(value, _)) => {
                    result = value;
                    break;
                },
                Err(signal) => return Err(signal),
            }
        }

        if let Some(kind) = function.return_kind
           && result.kind() != kind
        {
            return Err(RuntimeError::at(ErrorKind::Type,
                                        format!("{name} must return type {kind}, {} given",
                                                result.kind()),
                                        span).with_origin(&result.provenance())
                                             .into());
        }

        Ok(result.relocate(span, &context.display))
    }
}
