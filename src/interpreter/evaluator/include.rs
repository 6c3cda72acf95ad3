use std::{path::Path, rc::Rc};

use crate::{
    ast::Node,
    error::{Error, ErrorKind, RuntimeError},
    interpreter::{
        context::{Context, Frame, Scope},
        evaluator::core::{EvalResult, Interpreter},
        lexer::normalize,
        module,
        position::{SourceFile, Span},
        value::{
            core::{Data, Origin, Value},
            function::Namespace,
        },
    },
};

impl Interpreter {
    /// `include("a.b")`
    ///
    /// Resolves the module against the search paths (as `a/b.peri`), falling
    /// back to the native modules. A script module runs once per include in a
    /// fresh scope enclosed by the prelude. The resulting namespace is bound
    /// under the last component of the name and is also the statement's value.
    pub(crate) fn eval_include(&mut self,
                               module: &Node,
                               span: &Span,
                               context: &Rc<Context>,
                               inside_loop: bool)
                               -> EvalResult {
        let value = self.evaluate(module, context, inside_loop)?;
        let Data::Str(name) = &value.data else {
            return Err(RuntimeError::at(ErrorKind::Type,
                                        format!("Module name must be of type Str, {} given", value.kind()),
                                        &module.span).with_origin(&value.provenance())
                                                     .into());
        };
        if !module::is_valid_name(name) {
            return Err(RuntimeError::at(ErrorKind::Pattern,
                                        format!("Invalid module name {}", value.repr()),
                                        &module.span).with_origin(&value.provenance())
                                                     .into());
        }
        if self.including.iter().any(|active| **active == **name) {
            return Err(RuntimeError::at(ErrorKind::Include,
                                        format!("Circular include of module {name}"),
                                        span).into());
        }

        let symbols = match module::find_script(&self.config.search_paths, name) {
            Some((path, text)) => self.run_module(name, &path, &text, span, context)?,
            None => module::native(name, &self.config).ok_or_else(|| {
                                                          RuntimeError::at(ErrorKind::Include,
                                                                           format!("Module {name} does not exist"),
                                                                           span)
                                                      })?,
        };

        let namespace = Namespace { name: name.to_string(),
                                    symbols };
        let binding = name.rsplit('.').next().unwrap_or(name);
        let namespace = Value::new(Data::Namespace(Rc::new(namespace))).at(span, &context.display);

        Self::create(binding, namespace, span, context)
    }

    fn run_module(&mut self,
                  name: &str,
                  path: &Path,
                  text: &str,
                  span: &Span,
                  context: &Rc<Context>)
                  -> EvalResult<Scope> {
        let source = SourceFile::new(path.display().to_string(), normalize(text));
        let scope = self.module_scope();
        let frame = Context::call(format!("<module {name}>"),
                                  Rc::clone(&scope),
                                  context,
                                  span.clone(),
                                  Frame::Module);

        self.including.push(name.to_owned());
        let result = self.execute(&source, &frame);
        self.including.pop();

        match result {
            Ok(_) => Ok(scope),
            Err(Error::Runtime(error)) => Err(error.into()),
            Err(Error::Parse(error)) => {
                let origin = Origin { span:    error.span.clone(),
                                      display: Rc::clone(&frame.display), };
                Err(RuntimeError::at(ErrorKind::Include,
                                     format!("Module {name} could not be parsed: {}: {}",
                                             error.kind.name(),
                                             error.message),
                                     span).with_origin(&[origin])
                                          .into())
            },
            Err(error @ Error::Io { .. }) => {
                Err(RuntimeError::at(ErrorKind::Include, format!("Module {name} could not be read: {error}"), span).into())
            },
        }
    }
}
