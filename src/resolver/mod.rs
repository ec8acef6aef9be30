//! Transitive dependency resolution (§4.4).
//!
//! Resolution is a depth-first pre-order walk from the command-line order,
//! with first-occurrence semantics: a module already in the output is never
//! revisited, which is what makes cycles in `Requires` harmless. There are
//! two distinct closures — the public one (`Requires` only) used by every
//! ordinary query, and the static one (`Requires` plus `Requires.private`)
//! used only when `--static` is given (§4.4 "Two distinct closures", §9).

use std::collections::HashSet;
use std::rc::Rc;

use crate::core::package::Package;
use crate::core::registry::Registry;
use crate::core::requirement::RequiredVersion;
use crate::util::context::GlobalContext;
use crate::util::diagnostic::BrokerError;

/// Resolve `seeds` into the ordered transitive closure the aggregator walks.
///
/// When `include_private` is false, `Requires.private` entries are never
/// loaded or version-checked — only parsed and stored on the `Package`
/// record by the metadata parser, matching the reference tool's behavior of
/// not even touching private dependencies for non-static queries.
pub fn resolve(
    seeds: &[RequiredVersion],
    registry: &Registry,
    ctx: &GlobalContext,
    include_private: bool,
) -> Result<Vec<Rc<Package>>, BrokerError> {
    let mut order = Vec::new();
    let mut visited: HashSet<*const Package> = HashSet::new();
    for seed in seeds {
        visit(seed, registry, ctx, include_private, &mut visited, &mut order)?;
    }
    Ok(order)
}

fn visit(
    req: &RequiredVersion,
    registry: &Registry,
    ctx: &GlobalContext,
    include_private: bool,
    visited: &mut HashSet<*const Package>,
    order: &mut Vec<Rc<Package>>,
) -> Result<(), BrokerError> {
    let pkg = registry.load(req.name.as_str(), ctx)?;

    if !req.comparison.test(&pkg.version, &req.version) {
        return Err(BrokerError::VersionMismatch {
            name: req.name.to_string(),
            comparison: req.comparison.to_string(),
            wanted: req.version.clone(),
            have: pkg.version.clone(),
            url: if pkg.url.is_empty() { None } else { Some(pkg.url.clone()) },
        });
    }

    let ptr = Rc::as_ptr(&pkg);
    if visited.contains(&ptr) {
        return Ok(());
    }
    visited.insert(ptr);
    order.push(Rc::clone(&pkg));

    for dep in &pkg.requires {
        visit(dep, registry, ctx, include_private, visited, order)?;
    }
    if include_private {
        for dep in &pkg.requires_private {
            visit(dep, registry, ctx, include_private, visited, order)?;
        }
    }
    Ok(())
}
