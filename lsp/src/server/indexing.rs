use autousing_core::build_index;
use serde::Deserialize;
use tower_lsp::lsp_types::{MessageType, Url};
use tracing::{info, warn};

use super::state::AutoUsingServer;

/// Arguments accepted by the reindex command.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReindexArgs {
    #[serde(default)]
    pub(crate) show_output: bool,
}

impl ReindexArgs {
    pub(crate) fn from_arguments(arguments: &[serde_json::Value]) -> Self {
        arguments
            .first()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

pub(crate) fn is_source_uri(uri: &Url, extension: &str) -> bool {
    uri.to_file_path()
        .ok()
        .and_then(|p| p.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case(extension)))
        .unwrap_or(false)
}

impl AutoUsingServer {
    /// Rebuild the symbol index from the workspace roots and swap it in.
    ///
    /// Overlapping requests queue on the gate so only one scan runs at a time.
    pub(crate) async fn reindex(&self, args: ReindexArgs) -> anyhow::Result<usize> {
        let _gate = self.reindex_gate.lock().await;

        let roots = self.workspace_roots();
        let options = self.config_snapshot().index;
        if roots.is_empty() {
            warn!("reindex requested without workspace roots");
        }

        let index = build_index(&roots, &options).await?;
        let symbols = index.len();
        let files = index.files_scanned();
        self.replace_index(index);

        info!("indexed {} symbols from {} files", symbols, files);
        self.client
            .log_message(MessageType::INFO, format!("Finished, {} symbols", symbols))
            .await;
        if args.show_output {
            self.client
                .show_message(
                    MessageType::INFO,
                    format!("C# auto-using: indexed {} symbols from {} files", symbols, files),
                )
                .await;
        }
        Ok(symbols)
    }

    // Failures are reported to the client rather than returned.
    pub(crate) async fn reindex_and_report(&self, args: ReindexArgs) {
        if let Err(e) = self.reindex(args).await {
            warn!("reindex failed: {:#}", e);
            self.client
                .log_message(MessageType::ERROR, format!("Reindex failed: {:#}", e))
                .await;
        }
    }
}
