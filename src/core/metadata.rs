//! Metadata file parsing: line classification, variable substitution, and
//! shell-style tokenization of flag properties (§4.2).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::fragment::Fragment;
use crate::core::package::Package;
use crate::core::requirement::parse_requirement_list;
use crate::util::context::{prefix_from_pcfiledir, GlobalContext};
use crate::util::diagnostic::BrokerError;
use crate::util::interning::InternedString;

/// Fixed-point bound on recursive `${...}` expansion (§4.2); exceeding it
/// means the file defines a substitution cycle.
const MAX_SUBSTITUTIONS: usize = 15;

enum LineKind {
    Variable(String, String),
    Property(String, String),
    Malformed(String),
}

/// Join backslash-continued physical lines into logical lines, dropping
/// blank lines and `#` comments.
fn logical_lines(raw: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending = String::new();
    for physical in raw.lines() {
        let trimmed = physical.trim_end();
        if let Some(stripped) = trimmed.strip_suffix('\\') {
            pending.push_str(stripped);
            continue;
        }
        pending.push_str(trimmed);
        let line = std::mem::take(&mut pending);
        let t = line.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        out.push(line);
    }
    if !pending.trim().is_empty() {
        out.push(pending);
    }
    out
}

fn classify_line(line: &str) -> LineKind {
    let eq = line.find('=');
    let colon = line.find(':');
    match (eq, colon) {
        (Some(e), Some(c)) if c < e => property(line, c),
        (Some(e), _) => {
            let key = line[..e].trim().to_string();
            let value = line[e + 1..].trim().to_string();
            if key.is_empty()
                || !key.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
            {
                LineKind::Malformed(format!("invalid variable name '{}'", key))
            } else {
                LineKind::Variable(key, value)
            }
        }
        (None, Some(c)) => property(line, c),
        (None, None) => LineKind::Malformed(format!("unrecognized line: '{}'", line)),
    }
}

fn property(line: &str, colon_at: usize) -> LineKind {
    let key = line[..colon_at].trim().to_string();
    let value = line[colon_at + 1..].trim().to_string();
    LineKind::Property(key, value)
}

/// Expand the leftmost `${name}` in `s`, looking the name up in the global
/// environment first, then the file's own variable environment.
fn expand_once(
    s: &str,
    locals: &HashMap<String, String>,
    ctx: &GlobalContext,
    path: &Path,
) -> Result<Option<String>, BrokerError> {
    let Some(start) = s.find("${") else {
        return Ok(None);
    };
    let rest = &s[start + 2..];
    let Some(end) = rest.find('}') else {
        return Err(BrokerError::ParseError {
            path: path.to_path_buf(),
            message: "unterminated ${ in value".to_string(),
        });
    };
    let name = &rest[..end];
    let value = ctx
        .lookup_global(name)
        .map(str::to_string)
        .or_else(|| locals.get(name).cloned())
        .ok_or_else(|| BrokerError::UnknownVariable {
            name: name.to_string(),
            package: path.display().to_string(),
        })?;

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..start]);
    out.push_str(&value);
    out.push_str(&rest[end + 1..]);
    Ok(Some(out))
}

/// Recursively expand `${...}` references to a fixed point, bounded at
/// `MAX_SUBSTITUTIONS` expansions to catch cycles.
pub fn substitute(
    value: &str,
    locals: &HashMap<String, String>,
    ctx: &GlobalContext,
    path: &Path,
) -> Result<String, BrokerError> {
    let mut current = value.to_string();
    for _ in 0..MAX_SUBSTITUTIONS {
        match expand_once(&current, locals, ctx, path)? {
            Some(next) => current = next,
            None => return Ok(current),
        }
    }
    Err(BrokerError::SubstitutionCycle { name: path.display().to_string() })
}

/// Shell-style tokenization: single/double quotes group whitespace, and
/// backslash escapes the following character.
pub fn tokenize_shell(s: &str, path: &Path) -> Result<Vec<String>, BrokerError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
                i += 1;
            }
            '\'' => {
                in_token = true;
                i += 1;
                let start = i;
                while i < chars.len() && chars[i] != '\'' {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(BrokerError::ParseError {
                        path: path.to_path_buf(),
                        message: "unterminated single quote".to_string(),
                    });
                }
                current.extend(&chars[start..i]);
                i += 1;
            }
            '"' => {
                in_token = true;
                i += 1;
                let mut closed = false;
                while i < chars.len() {
                    if chars[i] == '"' {
                        closed = true;
                        i += 1;
                        break;
                    }
                    if chars[i] == '\\' && i + 1 < chars.len() && matches!(chars[i + 1], '"' | '\\' | '$')
                    {
                        current.push(chars[i + 1]);
                        i += 2;
                    } else {
                        current.push(chars[i]);
                        i += 1;
                    }
                }
                if !closed {
                    return Err(BrokerError::ParseError {
                        path: path.to_path_buf(),
                        message: "unterminated double quote".to_string(),
                    });
                }
            }
            '\\' => {
                in_token = true;
                if i + 1 < chars.len() {
                    current.push(chars[i + 1]);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            c => {
                in_token = true;
                current.push(c);
                i += 1;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn tokenize_flags(s: &str, path: &Path) -> Result<Vec<Fragment>, BrokerError> {
    Ok(tokenize_shell(s, path)?.into_iter().map(Fragment::new).collect())
}

/// Parse one metadata file's contents into a `Package`.
///
/// `key` is the module name the caller requested (the lookup key, which may
/// differ in case or form from the file's own `Name:` property).
pub fn parse_str(raw: &str, path: &Path, key: &str, ctx: &GlobalContext) -> Result<Package, BrokerError> {
    let mut variables: HashMap<String, String> = HashMap::new();
    let pcfiledir = path.parent().map(Path::to_path_buf);
    if let Some(dir) = &pcfiledir {
        variables.insert("pcfiledir".to_string(), dir.display().to_string());
    }

    let mut name = None;
    let mut description = None;
    let mut version = None;
    let mut url = String::new();
    let mut cflags_raw = String::new();
    let mut cflags_private_raw = String::new();
    let mut libs_raw = String::new();
    let mut libs_private_raw = String::new();
    let mut requires_raw = String::new();
    let mut requires_private_raw = String::new();

    for line in logical_lines(raw) {
        match classify_line(&line) {
            LineKind::Variable(ident, value) => {
                let expanded = substitute(&value, &variables, ctx, path)?;
                if ident == "prefix" && ctx.define_prefix {
                    if let Some(dir) = pcfiledir.as_deref().and_then(prefix_from_pcfiledir) {
                        variables.insert(ident, dir.display().to_string());
                        continue;
                    }
                }
                variables.insert(ident, expanded);
            }
            LineKind::Property(prop, value) => {
                let expanded = substitute(&value, &variables, ctx, path)?;
                match prop.as_str() {
                    "Name" => name = Some(expanded),
                    "Description" => description = Some(expanded),
                    "Version" => version = Some(expanded),
                    "URL" => url = expanded,
                    "Requires" => requires_raw = expanded,
                    "Requires.private" => requires_private_raw = expanded,
                    "Cflags" | "CFlags" => cflags_raw = expanded,
                    "Cflags.private" => cflags_private_raw = expanded,
                    "Libs" => libs_raw = expanded,
                    "Libs.private" => libs_private_raw = expanded,
                    "Conflicts" => {}
                    _ => {}
                }
            }
            LineKind::Malformed(message) => {
                return Err(BrokerError::ParseError { path: path.to_path_buf(), message });
            }
        }
    }

    let requires = parse_requirement_list(&requires_raw).map_err(|reason| BrokerError::BadRequirement {
        text: requires_raw.clone(),
        reason,
    })?;
    let requires_private =
        parse_requirement_list(&requires_private_raw).map_err(|reason| BrokerError::BadRequirement {
            text: requires_private_raw.clone(),
            reason,
        })?;

    Ok(Package {
        key: InternedString::new(key),
        name: name.unwrap_or_default(),
        description: description.unwrap_or_default(),
        version: version.unwrap_or_default(),
        url,
        pcfiledir,
        uninstalled: false,
        cflags: tokenize_flags(&cflags_raw, path)?,
        cflags_private: tokenize_flags(&cflags_private_raw, path)?,
        libs: tokenize_flags(&libs_raw, path)?,
        libs_private: tokenize_flags(&libs_private_raw, path)?,
        requires,
        requires_private,
        variables,
    })
}

/// Read and parse a metadata file from disk.
pub fn parse_file(path: &Path, key: &str, ctx: &GlobalContext) -> Result<Package, BrokerError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| BrokerError::IoError(format!("{}: {}", path.display(), e)))?;
    let mut pkg = parse_str(&raw, path, key, ctx)?;
    if pkg.name.is_empty() || pkg.version.is_empty() {
        return Err(BrokerError::ParseError {
            path: path.to_path_buf(),
            message: "missing mandatory Name/Description/Version property".to_string(),
        });
    }
    pkg.uninstalled = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with("-uninstalled"))
        .unwrap_or(false);
    Ok(pkg)
}
