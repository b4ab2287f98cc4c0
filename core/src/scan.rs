use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::index::{IndexedSymbol, SymbolKind};

// `namespace A.B {` (brace may sit on a following line) or file-scoped `namespace A.B;`
pub(crate) static NAMESPACE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^namespace ((?:\w+\.)*\w+)\s*(\{|;)").expect("namespace header regex"));

static TYPE_DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(class|interface|struct|enum)[ \t]+([A-Z]\w*)").expect("type declaration regex"));

const NAMESPACE_KEYWORD: &str = "namespace";

/// A namespace declaration together with the source text it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBlock<'a> {
    pub name: &'a str,
    pub body: &'a str,
}

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Drop a leading byte-order mark, which would otherwise hide a first-line `^` match.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text)
}

/// Strip a leading BOM and every carriage return so `^`/`$` anchors see plain `\n` lines.
pub fn normalize_source(text: &str) -> Cow<'_, str> {
    let text = strip_bom(text);
    if text.contains('\r') {
        Cow::Owned(text.replace('\r', ""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Split text into namespace blocks.
///
/// A braced block runs from its header to the last line holding only `}` before the
/// next occurrence of the word `namespace`. A nested namespace therefore truncates the
/// outer block; the nested one is picked up on its own. Headers without a closing line
/// produce nothing. File-scoped namespaces cover everything up to the next `namespace`.
pub fn namespace_blocks(text: &str) -> Vec<NamespaceBlock<'_>> {
    let mut blocks = Vec::new();
    let mut cursor = 0usize;

    while cursor <= text.len() {
        let Some(caps) = NAMESPACE_HEADER.captures_at(text, cursor) else {
            break;
        };
        let (Some(whole), Some(name), Some(opener)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            break;
        };

        let body_start = whole.end();
        let limit = text[body_start..]
            .find(NAMESPACE_KEYWORD)
            .map(|i| body_start + i)
            .unwrap_or(text.len());

        if opener.as_str() == ";" {
            blocks.push(NamespaceBlock {
                name: name.as_str(),
                body: &text[whole.start()..limit],
            });
            cursor = limit.max(body_start);
            continue;
        }

        match last_closing_line(text, body_start, limit) {
            Some(end) => {
                blocks.push(NamespaceBlock {
                    name: name.as_str(),
                    body: &text[whole.start()..end],
                });
                cursor = end;
            }
            None => cursor = body_start,
        }
    }

    blocks
}

// Byte offset just past the last `}` in [start, limit) that sits alone on its line.
fn last_closing_line(text: &str, start: usize, limit: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    text[start..limit]
        .match_indices('}')
        .map(|(i, _)| start + i)
        .filter(|&pos| {
            let at_line_start = pos > 0 && bytes[pos - 1] == b'\n';
            let at_line_end = pos + 1 == bytes.len() || bytes[pos + 1] == b'\n';
            at_line_start && at_line_end
        })
        .last()
        .map(|pos| pos + 1)
}

/// Type declarations in source order. Names must start with an uppercase letter.
pub fn declared_symbols(body: &str) -> Vec<(SymbolKind, &str)> {
    TYPE_DECLARATION
        .captures_iter(body)
        .filter_map(|caps| {
            let kind = SymbolKind::from_keyword(caps.get(1)?.as_str())?;
            Some((kind, caps.get(2)?.as_str()))
        })
        .collect()
}

/// Every type declared inside a namespace block of `text`.
pub fn scan_source(text: &str) -> Vec<IndexedSymbol> {
    let text = normalize_source(text);
    let mut symbols = Vec::new();
    for block in namespace_blocks(&text) {
        for (kind, name) in declared_symbols(block.body) {
            symbols.push(IndexedSymbol {
                name: name.to_string(),
                namespace: block.name.to_string(),
                kind,
            });
        }
    }
    symbols
}
