use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scan::{strip_bom, NAMESPACE_HEADER};

// `using A.B;`, `global using A.B;`, `using static A.B.C;`. Aliases contain `=` and never match.
static USING_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:global[ \t]+)?using[ \t]+(?:static[ \t]+)?((?:\w+\.)*\w+)[ \t]*;")
        .expect("using directive regex")
});

// Any column-zero directive, alias form included.
static TOP_LEVEL_USING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:global[ \t]+)?using[ \t]+(?:static[ \t]+)?(?:\w+[ \t]*=[ \t]*)?(?:\w+\.)*\w+[ \t]*;")
        .expect("top-level using regex")
});

/// Namespaces imported by using directives anywhere in the document.
pub fn imported_namespaces(text: &str) -> HashSet<String> {
    let text = strip_bom(text);
    USING_DIRECTIVE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Namespaces declared by the document plus all of their ancestors.
pub fn enclosing_namespaces(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for caps in NAMESPACE_HEADER.captures_iter(strip_bom(text)) {
        let Some(name) = caps.get(1) else { continue };
        let name = name.as_str();
        let mut end = name.len();
        loop {
            let prefix = &name[..end];
            if !out.iter().any(|n| n == prefix) {
                out.push(prefix.to_string());
            }
            match prefix.rfind('.') {
                Some(dot) => end = dot,
                None => break,
            }
        }
    }
    out
}

/// Whether symbols of `namespace` already resolve without a new directive.
pub fn is_visible(namespace: &str, imported: &HashSet<String>, enclosing: &[String]) -> bool {
    imported.contains(namespace) || enclosing.iter().any(|n| n == namespace)
}

/// Zero-based line where a new directive belongs: right after the last top-level
/// directive, or the first line when there is none.
pub fn using_insertion_line(text: &str) -> u32 {
    let text = strip_bom(text);
    TOP_LEVEL_USING
        .find_iter(text)
        .last()
        .map(|m| text[..m.start()].matches('\n').count() as u32 + 1)
        .unwrap_or(0)
}

/// Line terminator the document already uses: `\r\n` when its first break is CRLF.
pub fn line_ending(text: &str) -> &'static str {
    match text.find('\n') {
        Some(i) if text[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

pub fn using_directive(namespace: &str, eol: &str) -> String {
    format!("using {};{}", namespace, eol)
}
