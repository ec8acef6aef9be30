//! The parsed representation of one metadata file (§3).

use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::fragment::Fragment;
use crate::core::requirement::RequiredVersion;
use crate::util::interning::InternedString;

/// A fully parsed module: its declared properties, its own variable
/// environment, and its (unresolved) requirement lists.
#[derive(Debug, Clone)]
pub struct Package {
    /// The name this package was requested/loaded under.
    pub key: InternedString,
    pub name: String,
    pub description: String,
    pub version: String,
    pub url: String,
    /// Directory containing the source metadata file, if loaded from disk.
    pub pcfiledir: Option<PathBuf>,
    /// True if this record came from a `name-uninstalled.pc` file.
    pub uninstalled: bool,

    pub cflags: Vec<Fragment>,
    pub cflags_private: Vec<Fragment>,
    pub libs: Vec<Fragment>,
    pub libs_private: Vec<Fragment>,

    pub requires: Vec<RequiredVersion>,
    pub requires_private: Vec<RequiredVersion>,

    /// Per-file variable environment (post line-by-line substitution).
    pub variables: HashMap<String, String>,
}

impl Package {
    /// Look up a variable: globals take precedence over this package's own
    /// environment (matches the rule variable substitution itself uses).
    pub fn variable<'a>(&'a self, name: &str, global: Option<&'a str>) -> Option<&'a str> {
        global.or_else(|| self.variables.get(name).map(String::as_str))
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Package {}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
