use std::path::PathBuf;

/// Default limit on nested user-function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Settings for one [`Interpreter`](crate::interpreter::evaluator::core::Interpreter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directories searched, in order, for `<module>.peri` files.
    pub search_paths:   Vec<PathBuf>,
    /// Nested user-function calls allowed before a `PanicError` is raised.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { search_paths:   vec![PathBuf::from(".")],
               max_call_depth: DEFAULT_MAX_CALL_DEPTH, }
    }
}

impl Config {
    /// Puts `path` in front of the search paths.
    #[must_use]
    pub fn search_first(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.insert(0, path.into());
        self
    }
}
