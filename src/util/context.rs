//! Process-wide state merged from CLI flags and environment (§9).
//!
//! There is one `GlobalContext` per invocation; it is built once in the
//! driver and threaded through every core operation so the engine stays
//! free of hidden globals and is trivially testable.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Search-path entries compiled in when nothing else supplies them.
pub const DEFAULT_SEARCH_PATH: &[&str] = &["/usr/lib/pkgconfig", "/usr/share/pkgconfig"];

const PATH_VAR: &str = "FLAGBROKER_PATH";
const DEBUG_SPEW_VAR: &str = "FLAGBROKER_DEBUG_SPEW";
const TOP_BUILD_DIR_VAR: &str = "FLAGBROKER_TOP_BUILD_DIR";
const DISABLE_UNINSTALLED_VAR: &str = "FLAGBROKER_DISABLE_UNINSTALLED";

/// Merged configuration for one invocation: search path, global variable
/// environment, and the flags that steer resolution and output.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    pub search_path: Vec<PathBuf>,
    pub variables: HashMap<String, String>,
    pub disable_uninstalled: bool,
    /// Whether to apply the per-file `prefix` auto-override (§4.3/§9).
    pub define_prefix: bool,
    pub prefix_variable: String,
    pub msvc_syntax: bool,
    pub print_errors: bool,
    pub silence_errors: bool,
    pub errors_to_stdout: bool,
    pub debug: bool,
    /// Walk `Requires.private` too and include `.private` fragments (`--static`).
    pub static_closure: bool,
}

impl GlobalContext {
    /// Build a context from the environment alone; CLI flags are layered on
    /// top by the driver after this call.
    pub fn from_env() -> Self {
        let mut search_path = Vec::new();
        if let Ok(raw) = env::var(PATH_VAR) {
            search_path.extend(env::split_paths(&raw));
        }
        search_path.extend(DEFAULT_SEARCH_PATH.iter().map(PathBuf::from));

        let mut variables = HashMap::new();
        let top_build_dir =
            env::var(TOP_BUILD_DIR_VAR).unwrap_or_else(|_| "$(top_builddir)".to_string());
        variables.insert("pc_top_builddir".to_string(), top_build_dir);

        let debug = env::var(DEBUG_SPEW_VAR).is_ok();

        GlobalContext {
            search_path,
            variables,
            disable_uninstalled: env::var(DISABLE_UNINSTALLED_VAR).is_ok(),
            define_prefix: true,
            prefix_variable: "prefix".to_string(),
            msvc_syntax: false,
            print_errors: debug,
            silence_errors: false,
            errors_to_stdout: false,
            debug,
            static_closure: false,
        }
    }

    /// Record a `--define-variable=NAME=VALUE` override in the global
    /// environment; globals shadow per-package values during substitution.
    pub fn define_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Prepend a directory to the front of the search path (highest priority).
    pub fn prepend_search_dir(&mut self, dir: impl Into<PathBuf>) {
        self.search_path.insert(0, dir.into());
    }

    pub fn lookup_global(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Whether verbose errors should be printed for a "printing" query
    /// (§4.5 state machine).
    pub fn verbose_for_printing_query(&self) -> bool {
        !(self.silence_errors && !self.debug)
    }

    /// Whether verbose errors should be printed for a pure predicate query.
    pub fn verbose_for_predicate_query(&self) -> bool {
        self.print_errors || self.debug
    }
}

impl Default for GlobalContext {
    fn default() -> Self {
        GlobalContext {
            search_path: DEFAULT_SEARCH_PATH.iter().map(PathBuf::from).collect(),
            variables: HashMap::new(),
            disable_uninstalled: false,
            define_prefix: true,
            prefix_variable: "prefix".to_string(),
            msvc_syntax: false,
            print_errors: false,
            silence_errors: false,
            errors_to_stdout: false,
            debug: false,
            static_closure: false,
        }
    }
}

/// Compute the directory two levels above a `.pc` file's own directory, used
/// for the `prefix` auto-override (`.../lib/pkgconfig/foo.pc` -> `...`).
pub fn prefix_from_pcfiledir(pcfiledir: &Path) -> Option<PathBuf> {
    pcfiledir.parent()?.parent().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_has_compiled_in_path() {
        let ctx = GlobalContext::default();
        assert_eq!(ctx.search_path.len(), DEFAULT_SEARCH_PATH.len());
    }

    #[test]
    fn define_variable_overrides_global_lookup() {
        let mut ctx = GlobalContext::default();
        ctx.define_variable("prefix", "/opt");
        assert_eq!(ctx.lookup_global("prefix"), Some("/opt"));
    }

    #[test]
    fn prefix_from_pcfiledir_strips_two_levels() {
        let dir = Path::new("/usr/lib/pkgconfig");
        assert_eq!(prefix_from_pcfiledir(dir), Some(PathBuf::from("/usr")));
    }

    #[test]
    fn verbosity_policy_matches_state_machine() {
        let mut ctx = GlobalContext::default();
        assert!(ctx.verbose_for_printing_query());
        ctx.silence_errors = true;
        assert!(!ctx.verbose_for_printing_query());
        ctx.debug = true;
        assert!(ctx.verbose_for_printing_query());

        let mut ctx2 = GlobalContext::default();
        assert!(!ctx2.verbose_for_predicate_query());
        ctx2.print_errors = true;
        assert!(ctx2.verbose_for_predicate_query());
    }
}
