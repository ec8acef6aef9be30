//! Requirement-list grammar: `Requires:`/`Requires.private:` value parsing (§4.4).

use crate::core::version::Comparison;
use crate::util::InternedString;

/// One entry of a parsed `Requires:` line: a module name with an optional
/// version constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredVersion {
    pub name: InternedString,
    pub comparison: Comparison,
    pub version: String,
}

impl RequiredVersion {
    pub fn any(name: impl Into<InternedString>) -> Self {
        RequiredVersion {
            name: name.into(),
            comparison: Comparison::AlwaysMatch,
            version: String::new(),
        }
    }
}

/// Parse a whitespace-or-comma separated requirement list, e.g.
/// `"foo >= 1.2, bar"` or `"foo>=1.2 bar"`.
pub fn parse_requirement_list(input: &str) -> Result<Vec<RequiredVersion>, String> {
    let tokens = tokenize(input);
    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let name = tokens[i].clone();
        i += 1;
        if i < tokens.len() && is_operator(&tokens[i]) {
            let op = Comparison::parse(&tokens[i])
                .ok_or_else(|| format!("unknown comparison operator '{}'", tokens[i]))?;
            i += 1;
            if i >= tokens.len() {
                return Err(format!("expected a version after '{}' {}", name, op));
            }
            let version = tokens[i].clone();
            i += 1;
            out.push(RequiredVersion {
                name: InternedString::new(&name),
                comparison: op,
                version,
            });
        } else {
            out.push(RequiredVersion::any(InternedString::new(&name)));
        }
    }
    Ok(out)
}

fn is_operator(s: &str) -> bool {
    matches!(s, "<" | "<=" | "=" | ">=" | ">" | "!=")
}

/// Split a requirement-list string into name/operator/version tokens.
///
/// Commas and whitespace both separate entries; an operator may be glued to
/// either side (`foo>=1.2`) or whitespace-separated (`foo >= 1.2`).
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.is_empty() {
            tokens.push(std::mem::take(current));
        }
    };

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() || c == ',' {
            flush(&mut current, &mut tokens);
            i += 1;
            continue;
        }
        if matches!(c, '<' | '>' | '=' | '!') {
            flush(&mut current, &mut tokens);
            let start = i;
            while i < chars.len() && matches!(chars[i], '<' | '>' | '=' | '!') {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
            continue;
        }
        current.push(c);
        i += 1;
    }
    flush(&mut current, &mut tokens);
    tokens
}
