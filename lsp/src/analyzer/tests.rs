use super::*;
use autousing_core::SymbolIndex;
use tower_lsp::lsp_types::{CodeActionKind, CodeActionOrCommand, Diagnostic, DiagnosticSeverity, Url};

fn create_index() -> SymbolIndex {
    let mut index = SymbolIndex::new();
    index.extend_from_source(
        "namespace Shop.Models {\npublic class Order {}\npublic enum Status {}\n}\nnamespace Shop.Data {\npublic interface IRepository {}\n}\n",
    );
    index.extend_from_source("namespace Shop.Web\n{\n    public struct Route {}\n}\n");
    index
}

fn diag(message: &str) -> Diagnostic {
    Diagnostic {
        severity: Some(DiagnosticSeverity::ERROR),
        message: message.to_string(),
        ..Default::default()
    }
}

fn uri() -> Url {
    Url::parse("file:///work/Shop/Web/Controller.cs").unwrap()
}

#[test]
fn test_completion_excludes_imported_and_enclosing() {
    let index = create_index();
    let text = "using System;\nusing Shop.Data;\n\nnamespace Shop.Web.Controllers {\n    class Home {\n        \n    }\n}\n";
    let items = completion_items(&index, text, "        ", false);
    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    // Shop.Data imported, Shop.Web encloses the document
    assert_eq!(labels, vec!["Order", "Status"]);
    assert_eq!(items[0].kind, Some(CompletionItemKind::CLASS));
    assert_eq!(items[1].kind, Some(CompletionItemKind::ENUM));
    assert_eq!(items[0].detail.as_deref(), Some("from Shop.Models"));
    assert!(items[0].additional_text_edits.is_none());
}

#[test]
fn test_completion_suppressed_on_dotted_line() {
    let index = create_index();
    let items = completion_items(&index, "", "var x = order.", true);
    assert!(items.is_empty());
}

#[test]
fn test_completion_attaches_using_edit() {
    let index = create_index();
    let text = "using System;\n\nclass Program {}\n";
    let items = completion_items(&index, text, "", true);
    assert_eq!(items.len(), 4);
    let route = items.iter().find(|i| i.label == "Route").unwrap();
    assert_eq!(route.kind, Some(CompletionItemKind::STRUCT));
    let edits = route.additional_text_edits.as_ref().unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].range.start, Position::new(1, 0));
    assert_eq!(edits[0].new_text, "using Shop.Web;\n");
}

#[test]
fn test_code_action_per_namespace() {
    let index = create_index();
    let diagnostics = vec![
        diag("The name 'Order' does not exist in the current context"),
        diag("The type or namespace name 'Status' could not be found (are you missing a using directive?)"),
        diag("The name 'Nowhere' does not exist in the current context"),
    ];
    let actions = using_code_actions(&index, &uri(), "class A {}\n", &diagnostics);
    assert_eq!(actions.len(), 1);
    let CodeActionOrCommand::CodeAction(action) = &actions[0] else {
        panic!("expected code action");
    };
    assert_eq!(action.title, "Add 'using Shop.Models;'");
    assert_eq!(action.kind, Some(CodeActionKind::QUICKFIX));
    assert_eq!(action.is_preferred, Some(true));
    assert_eq!(action.diagnostics.as_ref().map(|d| d.len()), Some(2));
    let changes = action.edit.as_ref().and_then(|e| e.changes.as_ref()).unwrap();
    let edits = &changes[&uri()];
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].range.start, Position::new(0, 0));
    assert_eq!(edits[0].new_text, "using Shop.Models;\n");
}

#[test]
fn test_code_action_add_all() {
    let index = create_index();
    let diagnostics = vec![
        diag("The name 'Order' does not exist in the current context"),
        diag("The name 'IRepository' does not exist in the current context"),
    ];
    let text = "using System;\nusing System.Linq;\n\nclass A {}\n";
    let actions = using_code_actions(&index, &uri(), text, &diagnostics);
    let titles: Vec<_> = actions
        .iter()
        .filter_map(|a| match a {
            CodeActionOrCommand::CodeAction(a) => Some(a.title.as_str()),
            CodeActionOrCommand::Command(_) => None,
        })
        .collect();
    assert_eq!(titles, vec!["Add 'using Shop.Models;'", "Add 'using Shop.Data;'", ADD_ALL_TITLE]);

    let CodeActionOrCommand::CodeAction(all) = &actions[2] else {
        panic!("expected code action");
    };
    let edits = &all.edit.as_ref().and_then(|e| e.changes.as_ref()).unwrap()[&uri()];
    let texts: Vec<_> = edits.iter().map(|e| e.new_text.as_str()).collect();
    assert_eq!(texts, vec!["using Shop.Models;\n", "using Shop.Data;\n"]);
    assert!(edits.iter().all(|e| e.range.start == Position::new(2, 0)));
}

#[test]
fn test_code_action_skips_already_imported() {
    let index = create_index();
    let diagnostics = vec![diag("The name 'Order' does not exist in the current context")];
    let actions = using_code_actions(&index, &uri(), "using Shop.Models;\n", &diagnostics);
    assert!(actions.is_empty());
}

#[test]
fn test_code_action_groups_repeated_names() {
    let index = create_index();
    let diagnostics = vec![
        diag("The name 'Order' does not exist in the current context"),
        diag("The name 'IRepository' does not exist in the current context"),
        diag("The name 'Order' does not exist in the current context"),
    ];
    let actions = using_code_actions(&index, &uri(), "", &diagnostics);
    assert_eq!(actions.len(), 3);
    let CodeActionOrCommand::CodeAction(models) = &actions[0] else {
        panic!("expected code action");
    };
    assert_eq!(models.title, "Add 'using Shop.Models;'");
    assert_eq!(models.diagnostics.as_ref().map(|d| d.len()), Some(2));
    let CodeActionOrCommand::CodeAction(all) = &actions[2] else {
        panic!("expected code action");
    };
    assert_eq!(all.diagnostics.as_ref().map(|d| d.len()), Some(3));
}

#[test]
fn test_crlf_documents_get_crlf_directives() {
    let index = create_index();
    let text = "using System;\r\n\r\nclass Program {}\r\n";
    let items = completion_items(&index, text, "", true);
    let order = items.iter().find(|i| i.label == "Order").unwrap();
    let edits = order.additional_text_edits.as_ref().unwrap();
    assert_eq!(edits[0].range.start, Position::new(1, 0));
    assert_eq!(edits[0].new_text, "using Shop.Models;\r\n");

    let diagnostics = vec![diag("The name 'Route' does not exist in the current context")];
    let actions = using_code_actions(&index, &uri(), text, &diagnostics);
    let CodeActionOrCommand::CodeAction(action) = &actions[0] else {
        panic!("expected code action");
    };
    let edits = &action.edit.as_ref().and_then(|e| e.changes.as_ref()).unwrap()[&uri()];
    assert_eq!(edits[0].new_text, "using Shop.Web;\r\n");
}

#[test]
fn test_completion_kind_mapping() {
    use autousing_core::SymbolKind;
    assert_eq!(completion_kind(SymbolKind::Interface), CompletionItemKind::INTERFACE);
    assert_eq!(completion_kind(SymbolKind::Struct), CompletionItemKind::STRUCT);
}
