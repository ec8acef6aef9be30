//! Flag aggregation (§4.5): walk a resolved closure and emit deduplicated,
//! order-preserving flag sequences for each query kind.

use std::collections::HashSet;
use std::rc::Rc;

use crate::core::fragment::{Fragment, FragmentKind};
use crate::core::package::Package;

/// Which fragment kinds a query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagSelector {
    /// `-I` only.
    IncludeDirs,
    /// everything but `-I`.
    CflagsOther,
    /// `-I` and everything else.
    AllCflags,
    /// `-l` only.
    Libs,
    /// `-L` only.
    LibDirs,
    /// everything but `-l`/`-L`.
    LibsOther,
    /// `-l`, `-L`, and everything else.
    AllLibs,
}

fn wants(selector: FlagSelector, kind: FragmentKind) -> bool {
    use FragmentKind::*;
    match selector {
        FlagSelector::IncludeDirs => kind == IncludeDir,
        FlagSelector::CflagsOther => kind != IncludeDir,
        FlagSelector::AllCflags => true,
        FlagSelector::Libs => kind == Lib,
        FlagSelector::LibDirs => kind == LibDir,
        FlagSelector::LibsOther => kind != Lib && kind != LibDir,
        FlagSelector::AllLibs => true,
    }
}

/// Whether `selector` draws from the cflags-family lists or the libs-family
/// lists on each `Package`.
fn is_cflags_selector(selector: FlagSelector) -> bool {
    matches!(
        selector,
        FlagSelector::IncludeDirs | FlagSelector::CflagsOther | FlagSelector::AllCflags
    )
}

/// Walk `closure` and collect the fragments a query kind selects, applying
/// the per-kind dedup rule from §4.5: INCLUDE_DIR/LIB_DIR/OTHER are deduped
/// by exact text on first occurrence; LIB is never deduped.
///
/// `include_private` mirrors whether the closure was resolved with
/// `Requires.private` walked (the `--static` modifier); when true, each
/// package's `.private` fragment lists are also considered.
pub fn aggregate(
    closure: &[Rc<Package>],
    selector: FlagSelector,
    include_private: bool,
) -> Vec<Fragment> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for pkg in closure {
        let lists: Vec<&Vec<Fragment>> = if is_cflags_selector(selector) {
            if include_private {
                vec![&pkg.cflags, &pkg.cflags_private]
            } else {
                vec![&pkg.cflags]
            }
        } else if include_private {
            vec![&pkg.libs, &pkg.libs_private]
        } else {
            vec![&pkg.libs]
        };

        for list in lists {
            for frag in list {
                if !wants(selector, frag.kind) {
                    continue;
                }
                if frag.kind == FragmentKind::Lib {
                    out.push(frag.clone());
                } else if seen.insert(frag.text.clone()) {
                    out.push(frag.clone());
                }
            }
        }
    }

    out
}

/// Render fragments as one space-joined line, with MSVC-syntax translation
/// applied when requested (§4.5): `-lfoo` -> `foo.lib`, `-L/dir` -> `/libpath:/dir`.
pub fn render(fragments: &[Fragment], msvc_syntax: bool) -> String {
    fragments
        .iter()
        .map(|f| {
            if !msvc_syntax {
                f.text.clone()
            } else {
                match f.kind {
                    FragmentKind::Lib => format!("{}.lib", &f.text[2..]),
                    FragmentKind::LibDir => format!("/libpath:{}", &f.text[2..]),
                    _ => f.text.clone(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
