use std::collections::HashMap;

use autousing_core::usings::{enclosing_namespaces, imported_namespaces, is_visible, line_ending, using_insertion_line};
use autousing_core::{missing_symbol_name, missing_symbols, SymbolIndex};
use tower_lsp::lsp_types::{CodeAction, CodeActionKind, CodeActionOrCommand, Diagnostic, TextEdit, Url, WorkspaceEdit};
use tracing::debug;

use super::insert_using_edit;

pub const ADD_ALL_TITLE: &str = "Add all missing using directives";

/// Quick fixes that import the namespace of each unresolved, indexed symbol.
///
/// One action per namespace, in order of first mention; each action carries every
/// diagnostic naming a symbol of that namespace. When more than one namespace is
/// missing, a combined action inserting all of them is appended.
pub fn using_code_actions(
    index: &SymbolIndex,
    uri: &Url,
    text: &str,
    diagnostics: &[Diagnostic],
) -> Vec<CodeActionOrCommand> {
    let imported = imported_namespaces(text);
    let enclosing = enclosing_namespaces(text);

    let mut grouped: Vec<(String, Vec<Diagnostic>)> = Vec::new();
    for name in missing_symbols(diagnostics.iter().map(|d| d.message.as_str()), index) {
        let Some(namespace) = index.namespace_of(&name) else {
            continue;
        };
        if is_visible(namespace, &imported, &enclosing) {
            continue;
        }
        let fixed = diagnostics
            .iter()
            .filter(|d| missing_symbol_name(&d.message) == Some(name.as_str()))
            .cloned();
        match grouped.iter_mut().find(|(ns, _)| ns == namespace) {
            Some((_, diags)) => diags.extend(fixed),
            None => grouped.push((namespace.to_string(), fixed.collect())),
        }
    }

    if grouped.is_empty() {
        return Vec::new();
    }
    debug!(
        "missing namespaces: {:?}",
        grouped.iter().map(|(ns, _)| ns.as_str()).collect::<Vec<_>>()
    );

    let line = using_insertion_line(text);
    let eol = line_ending(text);
    let mut actions: Vec<CodeActionOrCommand> = grouped
        .iter()
        .map(|(namespace, diags)| {
            quick_fix(
                format!("Add 'using {};'", namespace),
                uri,
                vec![insert_using_edit(line, namespace, eol)],
                diags.clone(),
                true,
            )
        })
        .collect();

    if grouped.len() > 1 {
        let edits = grouped.iter().map(|(ns, _)| insert_using_edit(line, ns, eol)).collect();
        let diags = grouped.iter().flat_map(|(_, d)| d.iter().cloned()).collect();
        actions.push(quick_fix(ADD_ALL_TITLE.to_string(), uri, edits, diags, false));
    }

    actions
}

fn quick_fix(
    title: String,
    uri: &Url,
    edits: Vec<TextEdit>,
    diagnostics: Vec<Diagnostic>,
    preferred: bool,
) -> CodeActionOrCommand {
    let edit = WorkspaceEdit {
        changes: Some(HashMap::from([(uri.clone(), edits)])),
        ..Default::default()
    };
    CodeActionOrCommand::CodeAction(CodeAction {
        title,
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(diagnostics),
        edit: Some(edit),
        command: None,
        is_preferred: preferred.then_some(true),
        disabled: None,
        data: None,
    })
}
