use std::path::PathBuf;

use ropey::Rope;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::{debug, info};

use crate::analyzer::{completion_items, using_code_actions, REINDEX_COMMAND};

use super::{
    indexing::{is_source_uri, ReindexArgs},
    state::{AutoUsingServer, Document},
    text::{apply_content_change, line_text},
};

fn roots_from_params(params: &InitializeParams) -> Vec<PathBuf> {
    if let Some(folders) = &params.workspace_folders {
        let roots: Vec<PathBuf> = folders.iter().filter_map(|f| f.uri.to_file_path().ok()).collect();
        if !roots.is_empty() {
            return roots;
        }
    }
    #[allow(deprecated)]
    let root_uri = params.root_uri.as_ref();
    root_uri.and_then(|u| u.to_file_path().ok()).into_iter().collect()
}

// Roots after a folder change: removals first, then additions not already present.
fn merge_workspace_roots(mut roots: Vec<PathBuf>, event: &WorkspaceFoldersChangeEvent) -> Vec<PathBuf> {
    let paths = |folders: &[WorkspaceFolder]| -> Vec<PathBuf> {
        folders.iter().filter_map(|f| f.uri.to_file_path().ok()).collect()
    };
    let removed = paths(&event.removed);
    roots.retain(|r| !removed.contains(r));
    for path in paths(&event.added) {
        if !roots.contains(&path) {
            roots.push(path);
        }
    }
    roots
}

#[tower_lsp::async_trait]
impl LanguageServer for AutoUsingServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let roots = roots_from_params(&params);
        info!("C# auto-using server initializing with roots: {:?}", roots);
        self.set_workspace_roots(roots);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::INCREMENTAL),
                    save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                    ..Default::default()
                })),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: None,
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
                    code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                    work_done_progress_options: Default::default(),
                    resolve_provider: Some(false),
                })),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![REINDEX_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                workspace: Some(WorkspaceServerCapabilities {
                    workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                        supported: Some(true),
                        change_notifications: Some(OneOf::Left(true)),
                    }),
                    file_operations: None,
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "C# Auto-Using Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("C# auto-using server initialized");
        let _ = self
            .client
            .log_message(MessageType::INFO, "C# auto-using server started")
            .await;
        self.load_config().await;
        self.reindex_and_report(ReindexArgs { show_output: true }).await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("C# auto-using server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        // Push-style clients send the section inline; pull-style ones are queried.
        if let Some(section) = params.settings.get(super::config::CONFIG_SECTION) {
            self.apply_config_value(section.clone());
        } else {
            self.load_config().await;
        }
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        let roots = merge_workspace_roots(self.workspace_roots(), &params.event);
        info!("workspace roots now {:?}", roots);
        self.set_workspace_roots(roots);
        self.reindex_and_report(ReindexArgs::default()).await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = Document {
            content: Rope::from_str(&params.text_document.text),
        };
        self.documents.insert(params.text_document.uri, document);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let mut entry = self.documents.entry(uri).or_default();
        for change in &params.content_changes {
            apply_content_change(&mut entry.content, change);
        }
        debug!("{} changed ({} edits)", entry.key(), params.content_changes.len());
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let config = self.config_snapshot();
        if config.reindex_on_save && is_source_uri(&params.text_document.uri, &config.index.extension) {
            debug!("reindexing after save of {}", params.text_document.uri);
            self.reindex_and_report(ReindexArgs::default()).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.remove(&params.text_document.uri);
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let (text, current_line) = match self.documents.get(uri) {
            Some(doc) => (doc.content.to_string(), line_text(&doc.content, position.line)),
            None => return Ok(None),
        };

        let index = self.current_index();
        let add_using = self.config_snapshot().completion_add_using;
        let items = completion_items(&index, &text, &current_line, add_using);
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = &params.text_document.uri;
        let text = match self.documents.get(uri) {
            Some(doc) => doc.content.to_string(),
            None => String::new(),
        };

        let index = self.current_index();
        let actions = using_code_actions(&index, uri, &text, &params.context.diagnostics);
        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<serde_json::Value>> {
        if params.command != REINDEX_COMMAND {
            return Err(Error::invalid_params(format!("Unknown command: {}", params.command)));
        }

        let args = ReindexArgs::from_arguments(&params.arguments);
        match self.reindex(args).await {
            Ok(count) => Ok(Some(serde_json::json!({ "symbols": count }))),
            Err(e) => {
                let mut err = Error::internal_error();
                err.message = format!("Reindex failed: {:#}", e).into();
                Err(err)
            }
        }
    }
}
