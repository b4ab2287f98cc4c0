use autousing_core::SymbolKind;
use tower_lsp::lsp_types::{CompletionItemKind, Position, Range, TextEdit};

mod code_actions;
mod completions;
#[cfg(test)]
mod tests;

pub use code_actions::{using_code_actions, ADD_ALL_TITLE};
pub use completions::completion_items;

/// Command that rebuilds the workspace symbol index.
pub const REINDEX_COMMAND: &str = "autousing-csharp-workspace.reindex";

pub fn completion_kind(kind: SymbolKind) -> CompletionItemKind {
    match kind {
        SymbolKind::Class => CompletionItemKind::CLASS,
        SymbolKind::Interface => CompletionItemKind::INTERFACE,
        SymbolKind::Struct => CompletionItemKind::STRUCT,
        SymbolKind::Enum => CompletionItemKind::ENUM,
    }
}

// Zero-width insertion of `using <ns>;` at the start of `line`, ended with `eol`.
pub(crate) fn insert_using_edit(line: u32, namespace: &str, eol: &str) -> TextEdit {
    let at = Position::new(line, 0);
    TextEdit {
        range: Range::new(at, at),
        new_text: autousing_core::usings::using_directive(namespace, eol),
    }
}
