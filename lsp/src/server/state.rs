use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use autousing_core::SymbolIndex;
use dashmap::DashMap;
use ropey::Rope;
use tower_lsp::lsp_types::Url;
use tower_lsp::Client;

/// In-memory copy of an open C# document.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub(crate) content: Rope,
}

/// Primary LSP server state shared across handlers.
pub(crate) struct AutoUsingServer {
    pub(crate) client: Client,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    /// Replaced wholesale by every reindex; readers keep their snapshot.
    pub(crate) index: RwLock<Arc<SymbolIndex>>,
    pub(crate) roots: Mutex<Vec<PathBuf>>,
    pub(crate) config: Mutex<super::config::ServerConfig>,
    pub(crate) reindex_gate: tokio::sync::Mutex<()>,
}

impl AutoUsingServer {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            index: RwLock::new(Arc::new(SymbolIndex::new())),
            roots: Mutex::new(Vec::new()),
            config: Mutex::new(super::config::ServerConfig::default()),
            reindex_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub(crate) fn current_index(&self) -> Arc<SymbolIndex> {
        match self.index.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn replace_index(&self, index: SymbolIndex) {
        let fresh = Arc::new(index);
        match self.index.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
    }

    pub(crate) fn config_snapshot(&self) -> super::config::ServerConfig {
        match self.config.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn workspace_roots(&self) -> Vec<PathBuf> {
        self.roots.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub(crate) fn set_workspace_roots(&self, roots: Vec<PathBuf>) {
        if let Ok(mut guard) = self.roots.lock() {
            *guard = roots;
        }
    }
}
