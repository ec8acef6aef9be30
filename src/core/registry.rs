//! Package lookup across the configured search path (§4.3).

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use walkdir::WalkDir;

use crate::core::metadata;
use crate::core::package::Package;
use crate::util::context::GlobalContext;
use crate::util::diagnostic::BrokerError;

/// Caches loaded packages by lookup key so repeated requests for the same
/// module return the identical `Rc`, which the resolver and aggregator rely
/// on for identity-based deduplication.
pub struct Registry {
    cache: RefCell<HashMap<String, Rc<Package>>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry { cache: RefCell::new(HashMap::new()) }
    }

    /// Resolve a module name to a loaded `Package`, following the lookup
    /// order in §4.3: cache, then `name-uninstalled.pc`, then `name.pc`,
    /// then (if `name` already looks like a path) the file directly.
    pub fn load(&self, name: &str, ctx: &GlobalContext) -> Result<Rc<Package>, BrokerError> {
        if let Some(pkg) = self.cache.borrow().get(name) {
            return Ok(Rc::clone(pkg));
        }

        if name.ends_with(".pc") && Path::new(name).is_file() {
            let pkg = metadata::parse_file(Path::new(name), name, ctx)?;
            return Ok(self.install(name, pkg));
        }

        if !ctx.disable_uninstalled {
            if let Some(path) =
                find_in_search_path(&ctx.search_path, &format!("{}-uninstalled.pc", name))
            {
                let mut pkg = metadata::parse_file(&path, name, ctx)?;
                pkg.uninstalled = true;
                return Ok(self.install(name, pkg));
            }
        }

        if let Some(path) = find_in_search_path(&ctx.search_path, &format!("{}.pc", name)) {
            let pkg = metadata::parse_file(&path, name, ctx)?;
            return Ok(self.install(name, pkg));
        }

        Err(BrokerError::NotFound { name: name.to_string() })
    }

    fn install(&self, key: &str, pkg: Package) -> Rc<Package> {
        let rc = Rc::new(pkg);
        self.cache.borrow_mut().insert(key.to_string(), Rc::clone(&rc));
        rc
    }

    /// Enumerate every `.pc` file across the search path (for `--list-all`),
    /// deduplicated by stem and skipping `-uninstalled` variants.
    pub fn list_all(&self, ctx: &GlobalContext) -> Vec<(String, String, String)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for dir in &ctx.search_path {
            if !dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(dir).min_depth(1).max_depth(1).into_iter().flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("pc") {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if stem.ends_with("-uninstalled") || !seen.insert(stem.to_string()) {
                    continue;
                }
                if let Ok(pkg) = metadata::parse_file(path, stem, ctx) {
                    out.push((stem.to_string(), pkg.name.clone(), pkg.description.clone()));
                }
            }
        }
        out.sort();
        out
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn find_in_search_path(dirs: &[PathBuf], filename: &str) -> Option<PathBuf> {
    for dir in dirs {
        let candidate = dir.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_pc(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(format!("{}.pc", name)), body).unwrap();
    }

    fn ctx_for(dir: &Path) -> GlobalContext {
        let mut ctx = GlobalContext::default();
        ctx.search_path = vec![dir.to_path_buf()];
        ctx
    }

    #[test]
    fn loads_and_caches_by_identity() {
        let tmp = TempDir::new().unwrap();
        write_pc(tmp.path(), "foo", "Name: foo\nDescription: d\nVersion: 1.0\n");
        let ctx = ctx_for(tmp.path());
        let reg = Registry::new();
        let a = reg.load("foo", &ctx).unwrap();
        let b = reg.load("foo", &ctx).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn prefers_uninstalled_variant() {
        let tmp = TempDir::new().unwrap();
        write_pc(tmp.path(), "foo", "Name: foo\nDescription: d\nVersion: 1.0\n");
        std::fs::write(
            tmp.path().join("foo-uninstalled.pc"),
            "Name: foo\nDescription: d\nVersion: 2.0\n",
        )
        .unwrap();
        let ctx = ctx_for(tmp.path());
        let reg = Registry::new();
        let pkg = reg.load("foo", &ctx).unwrap();
        assert!(pkg.uninstalled);
        assert_eq!(pkg.version, "2.0");
    }

    #[test]
    fn disable_uninstalled_skips_variant() {
        let tmp = TempDir::new().unwrap();
        write_pc(tmp.path(), "foo", "Name: foo\nDescription: d\nVersion: 1.0\n");
        std::fs::write(
            tmp.path().join("foo-uninstalled.pc"),
            "Name: foo\nDescription: d\nVersion: 2.0\n",
        )
        .unwrap();
        let mut ctx = ctx_for(tmp.path());
        ctx.disable_uninstalled = true;
        let reg = Registry::new();
        let pkg = reg.load("foo", &ctx).unwrap();
        assert!(!pkg.uninstalled);
        assert_eq!(pkg.version, "1.0");
    }

    #[test]
    fn missing_module_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx_for(tmp.path());
        let reg = Registry::new();
        let err = reg.load("nosuch", &ctx).unwrap_err();
        assert!(matches!(err, BrokerError::NotFound { .. }));
    }

    #[test]
    fn list_all_enumerates_and_dedups() {
        let tmp = TempDir::new().unwrap();
        write_pc(tmp.path(), "foo", "Name: foo\nDescription: Foo lib\nVersion: 1.0\n");
        write_pc(tmp.path(), "bar", "Name: bar\nDescription: Bar lib\nVersion: 1.0\n");
        std::fs::write(
            tmp.path().join("foo-uninstalled.pc"),
            "Name: foo\nDescription: Foo lib\nVersion: 1.0\n",
        )
        .unwrap();
        let ctx = ctx_for(tmp.path());
        let reg = Registry::new();
        let all = reg.list_all(&ctx);
        assert_eq!(all.len(), 2);
    }
}
