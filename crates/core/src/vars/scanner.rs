//! Placeholder scanning over plain text.
//!
//! A placeholder is `{{name}}`, with optional whitespace inside the braces
//! (`{{ name }}`). Offsets are byte offsets into the scanned string.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::types::VariableMap;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").unwrap());

/// Byte range of a placeholder inside its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A single placeholder occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Variable name with surrounding whitespace removed.
    pub name: &'a str,
    /// The raw placeholder text, braces included.
    pub text: &'a str,
    pub span: Span,
}

/// Iterate over every placeholder in `content`, in text order.
pub fn placeholders(content: &str) -> impl Iterator<Item = Placeholder<'_>> {
    PLACEHOLDER_RE.captures_iter(content).filter_map(|caps| {
        let whole = caps.get(0)?;
        let name = caps.get(1)?.as_str().trim();
        if name.is_empty() {
            return None;
        }
        Some(Placeholder {
            name,
            text: whole.as_str(),
            span: Span { start: whole.start(), end: whole.end() },
        })
    })
}

/// Unique variable names in order of first occurrence.
#[must_use]
pub fn scan_names(content: &str) -> Vec<String> {
    scan_names_in([content])
}

/// Unique variable names across several texts, in order of first occurrence.
pub fn scan_names_in<'a, I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for text in texts {
        for p in placeholders(text) {
            if seen.insert(p.name) {
                names.push(p.name.to_string());
            }
        }
    }
    names
}

/// Rebuild `content`, asking `resolve` for each placeholder's replacement.
///
/// A placeholder for which `resolve` returns `None` is copied verbatim.
pub fn substitute<F>(content: &str, mut resolve: F) -> String
where
    F: FnMut(&Placeholder<'_>) -> Option<String>,
{
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for p in placeholders(content) {
        out.push_str(&content[last..p.span.start]);
        match resolve(&p) {
            Some(value) => out.push_str(&value),
            None => out.push_str(p.text),
        }
        last = p.span.end;
    }
    out.push_str(&content[last..]);
    out
}

/// Replace every placeholder whose variable is present in `vars`.
#[must_use]
pub fn replace_variables(content: &str, vars: &VariableMap) -> String {
    substitute(content, |p| vars.get(p.name).cloned())
}

/// Whether `content` still contains at least one placeholder.
#[must_use]
pub fn has_placeholders(content: &str) -> bool {
    placeholders(content).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> VariableMap {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_scan_names_first_seen_order() {
        let names = scan_names("Hello {{name}}, you are {{age}}. Bye {{name}}");
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn test_scan_tolerates_whitespace() {
        assert_eq!(scan_names("{{ topic }} and {{topic}}"), vec!["topic"]);
        assert_eq!(scan_names("{{\tlang\n}}"), vec!["lang"]);
    }

    #[test]
    fn test_scan_skips_empty_braces() {
        assert!(scan_names("{{}} {{   }} {x}").is_empty());
    }

    #[test]
    fn test_spans_cover_placeholder_text() {
        let content = "a {{ x }} b";
        let p = placeholders(content).next().unwrap();
        assert_eq!(p.name, "x");
        assert_eq!(p.text, "{{ x }}");
        assert_eq!(&content[p.span.start..p.span.end], "{{ x }}");
    }

    #[test]
    fn test_replace_leaves_unresolved_verbatim() {
        let out = replace_variables("{{a}}{{b}}", &vars(&[("a", "X")]));
        assert_eq!(out, "X{{b}}");
    }

    #[test]
    fn test_replace_handles_multibyte_text() {
        let out = replace_variables("¿{{q}}? ✓ {{ q }}", &vars(&[("q", "qué")]));
        assert_eq!(out, "¿qué? ✓ qué");
    }

    #[test]
    fn test_has_placeholders() {
        assert!(has_placeholders("x {{y}}"));
        assert!(!has_placeholders("plain"));
    }
}
