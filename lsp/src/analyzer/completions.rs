use autousing_core::usings::{enclosing_namespaces, imported_namespaces, is_visible, line_ending, using_insertion_line};
use autousing_core::SymbolIndex;
use tower_lsp::lsp_types::CompletionItem;

use super::{completion_kind, insert_using_edit};

/// Completion items for every indexed type the document cannot reference yet.
///
/// Nothing is offered while the cursor line contains a `.`, since member access and
/// qualified names never need a new directive. With `add_using` each item carries the
/// edit that imports its namespace.
pub fn completion_items(index: &SymbolIndex, text: &str, current_line: &str, add_using: bool) -> Vec<CompletionItem> {
    if current_line.contains('.') {
        return Vec::new();
    }

    let imported = imported_namespaces(text);
    let enclosing = enclosing_namespaces(text);
    let insert_line = using_insertion_line(text);
    let eol = line_ending(text);

    index
        .iter()
        .filter(|symbol| !is_visible(&symbol.namespace, &imported, &enclosing))
        .map(|symbol| CompletionItem {
            label: symbol.name.clone(),
            kind: Some(completion_kind(symbol.kind)),
            detail: Some(symbol.detail()),
            additional_text_edits: add_using.then(|| vec![insert_using_edit(insert_line, &symbol.namespace, eol)]),
            ..Default::default()
        })
        .collect()
}
