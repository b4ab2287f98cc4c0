use autousing_core::IndexOptions;
use serde::Deserialize;
use tower_lsp::lsp_types::ConfigurationItem;
use tracing::{debug, warn};

use super::state::AutoUsingServer;

pub(crate) const CONFIG_SECTION: &str = "autousing";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServerConfig {
    pub(crate) index: IndexOptions,
    pub(crate) reindex_on_save: bool,
    pub(crate) completion_add_using: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            index: IndexOptions::default(),
            reindex_on_save: false,
            completion_add_using: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AutoUsingConfigSection {
    #[serde(default)]
    exclude: Option<Vec<String>>,
    #[serde(default)]
    max_concurrent_reads: Option<usize>,
    #[serde(default)]
    reindex_on_save: Option<bool>,
    #[serde(default)]
    completion: CompletionConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CompletionConfig {
    #[serde(default)]
    add_using: Option<bool>,
}

impl ServerConfig {
    /// Overlay a client `autousing` section. Returns false when the value does not parse.
    pub(crate) fn apply_section(&mut self, value: serde_json::Value) -> bool {
        if value.is_null() {
            return true;
        }
        let cfg = match serde_json::from_value::<AutoUsingConfigSection>(value) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("ignoring malformed {} settings: {}", CONFIG_SECTION, e);
                return false;
            }
        };

        if let Some(exclude) = cfg.exclude {
            self.index.exclude_dirs = exclude;
        }
        if let Some(v) = cfg.max_concurrent_reads.filter(|v| *v > 0) {
            self.index.max_concurrent_reads = v;
        }
        self.reindex_on_save = cfg.reindex_on_save.unwrap_or(false);
        self.completion_add_using = cfg.completion.add_using.unwrap_or(true);
        true
    }
}

impl AutoUsingServer {
    pub(crate) async fn load_config(&self) {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(CONFIG_SECTION.to_string()),
        }];

        if let Ok(values) = self.client.configuration(items).await {
            if let Some(val) = values.into_iter().next() {
                self.apply_config_value(val);
            }
        }
    }

    pub(crate) fn apply_config_value(&self, value: serde_json::Value) {
        if let Ok(mut guard) = self.config.lock() {
            if guard.apply_section(value) {
                debug!("configuration updated: {:?}", *guard);
            }
        }
    }
}
