use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;

use crate::{
    error::{ErrorKind, RuntimeError},
    interpreter::{
        config::Config,
        context::{Scope, SymbolTable},
        evaluator::{
            core::Interpreter,
            function::core::{Arity, BuiltIn, builtin_functions},
        },
        position::Span,
        value::core::{Data, Kind, Value},
    },
    util::num::{f64_to_i64_truncated, i64_to_f64_checked},
};

/// File extension of Peri.dot scripts.
pub const SCRIPT_EXTENSION: &str = "peri";

static MODULE_NAME: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

/// Whether `name` is a dotted sequence of identifiers, e.g. `utils.strings`.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    MODULE_NAME.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$"))
               .as_ref()
               .is_ok_and(|pattern| pattern.is_match(name))
}

/// The relative path a module is looked up under: `a.b` becomes `a/b.peri`.
#[must_use]
pub fn relative_path(name: &str) -> PathBuf {
    let mut path: PathBuf = name.split('.').collect();
    path.set_extension(SCRIPT_EXTENSION);
    path
}

/// Reads the first script named `name` found in `search_paths`.
///
/// Directories that do not contain the module, or whose copy can not be
/// read, are skipped.
#[must_use]
pub fn find_script(search_paths: &[PathBuf], name: &str) -> Option<(PathBuf, String)> {
    let relative = relative_path(name);
    search_paths.iter().find_map(|directory| read_script(&directory.join(&relative)))
}

fn read_script(path: &Path) -> Option<(PathBuf, String)> {
    match fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!(path = %path.display(), "resolved module");
            Some((path.to_path_buf(), text))
        },
        Err(error) => {
            tracing::debug!(path = %path.display(), %error, "skipped module candidate");
            None
        },
    }
}

/// Builds the bindings of a module implemented by the interpreter.
#[must_use]
pub fn native(name: &str, config: &Config) -> Option<Scope> {
    let scope = SymbolTable::root();
    {
        let mut table = scope.borrow_mut();
        match name {
            "math" => {
                table.define("pi", Value::float(std::f64::consts::PI).named("pi"));
                table.define("e", Value::float(std::f64::consts::E).named("e"));
                table.define("tau", Value::float(std::f64::consts::TAU).named("tau"));
                for builtin in MATH {
                    table.define(builtin.name, Value::new(Data::BuiltIn(builtin)).named(builtin.name));
                }
            },
            "sys" => {
                let paths = config.search_paths
                                  .iter()
                                  .map(|path| Value::string(path.display().to_string()))
                                  .collect();
                table.define("version", Value::string(env!("CARGO_PKG_VERSION")).named("version"));
                table.define("path", Value::array(paths).ok()?.named("path"));
            },
            _ => return None,
        }
    }
    Some(scope)
}

builtin_functions! {
    MATH {
        "sqrt"  => { arity: Arity::Exact(1), func: sqrt },
        "floor" => { arity: Arity::Exact(1), func: floor },
        "ceil"  => { arity: Arity::Exact(1), func: ceil },
        "abs"   => { arity: Arity::Exact(1), func: abs },
    }
}

fn sqrt(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    let x = as_float(&args[0], "sqrt", span)?;
    if x < 0.0 {
        return Err(RuntimeError::at(ErrorKind::Value,
                                    "Square root of a negative number",
                                    span).with_origin(&args[0].provenance()));
    }
    Ok(Value::float(x.sqrt()))
}

fn floor(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    round_with(&args[0], "floor", span, f64::floor)
}

fn ceil(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    round_with(&args[0], "ceil", span, f64::ceil)
}

fn abs(_: &mut Interpreter, args: &[Value], span: &Span) -> Result<Value, RuntimeError> {
    match args[0].data {
        Data::Int(i) => i.checked_abs()
                         .map(Value::int)
                         .ok_or_else(|| RuntimeError::at(ErrorKind::Value, "Integer overflow", span)),
        Data::Float(x) => Ok(Value::float(x.abs())),
        _ => Err(expected_number(&args[0], "abs", span)),
    }
}

fn round_with(value: &Value, function: &str, span: &Span, round: fn(f64) -> f64) -> Result<Value, RuntimeError> {
    match value.data {
        Data::Int(i) => Ok(Value::int(i)),
        Data::Float(x) => f64_to_i64_truncated(round(x)).map(Value::int).ok_or_else(|| {
                              RuntimeError::at(ErrorKind::Value,
                                               format!("{function} of {} does not fit an Int", value.repr()),
                                               span).with_origin(&value.provenance())
                          }),
        _ => Err(expected_number(value, function, span)),
    }
}

fn as_float(value: &Value, function: &str, span: &Span) -> Result<f64, RuntimeError> {
    match value.data {
        Data::Float(x) => Ok(x),
        Data::Int(i) => i64_to_f64_checked(i, RuntimeError::at(ErrorKind::Value,
                                                                "Integer is too large to convert",
                                                                span)),
        _ => Err(expected_number(value, function, span)),
    }
}

fn expected_number(value: &Value, function: &str, span: &Span) -> RuntimeError {
    RuntimeError::at(ErrorKind::Type,
                     format!("{function} expects an {} or a {}, {} given",
                             Kind::Int,
                             Kind::Float,
                             value.kind()),
                     span).with_origin(&value.provenance())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_names_are_dotted_identifiers() {
        assert!(is_valid_name("math"));
        assert!(is_valid_name("utils.strings_2"));
        assert!(!is_valid_name("2d"));
        assert!(!is_valid_name("a..b"));
        assert!(!is_valid_name("a/b"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn dotted_names_map_to_nested_paths() {
        assert_eq!(relative_path("a.b"), Path::new("a").join("b.peri"));
    }

    #[test]
    fn native_modules() {
        let math = native("math", &Config::default()).unwrap();
        assert_eq!(math.borrow().names().len(), 7);
        let sys = native("sys", &Config::default()).unwrap();
        assert_eq!(sys.borrow().get("version"), Some(Value::string(env!("CARGO_PKG_VERSION"))));
        assert!(native("os", &Config::default()).is_none());
    }

    #[test]
    fn missing_scripts_are_skipped() {
        let searched = vec![PathBuf::from("/nonexistent/peridot")];
        assert!(find_script(&searched, "nothing").is_none());
    }
}
