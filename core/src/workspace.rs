use std::path::{Path, PathBuf};

use anyhow::Context;
use futures::stream::{self, StreamExt};
use tokio::task;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::index::SymbolIndex;

pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[".git", ".svn", ".hg", "CVS", "node_modules"];
pub const DEFAULT_MAX_CONCURRENT_READS: usize = 16;
pub const SOURCE_EXTENSION: &str = "cs";

/// Knobs for a workspace scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    /// Directory names that are never descended into.
    pub exclude_dirs: Vec<String>,
    pub max_concurrent_reads: usize,
    pub extension: String,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            max_concurrent_reads: DEFAULT_MAX_CONCURRENT_READS,
            extension: SOURCE_EXTENSION.to_string(),
        }
    }
}

impl IndexOptions {
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.exclude_dirs.iter().any(|d| d == name))
                .unwrap_or(false)
    }

    fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

/// Source files below `roots`, sorted and de-duplicated.
pub fn find_source_files(roots: &[PathBuf], options: &IndexOptions) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !options.is_excluded(e))
        {
            match entry {
                Ok(entry) if entry.file_type().is_file() && options.is_source(entry.path()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => warn!("skipping unreadable path under {}: {}", root.display(), e),
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

/// Scan every source file under `roots` into a fresh index.
///
/// Reads run concurrently but are merged in path order, so duplicate names resolve the
/// same way on every run. Unreadable files are logged and skipped.
pub async fn build_index(roots: &[PathBuf], options: &IndexOptions) -> anyhow::Result<SymbolIndex> {
    let roots_owned = roots.to_vec();
    let options_owned = options.clone();
    let files = task::spawn_blocking(move || find_source_files(&roots_owned, &options_owned))
        .await
        .context("source file discovery task failed")?;
    debug!("discovered {} source files", files.len());

    let limit = options.max_concurrent_reads.max(1);
    let contents: Vec<(PathBuf, std::io::Result<String>)> = stream::iter(files)
        .map(|path| async move {
            let read = tokio::fs::read_to_string(&path).await;
            (path, read)
        })
        .buffered(limit)
        .collect()
        .await;

    let mut index = SymbolIndex::new();
    for (path, read) in contents {
        match read {
            Ok(text) => {
                index.extend_from_source(&text);
            }
            Err(e) => warn!("failed to read {}: {}", path.display(), e),
        }
    }

    info!("Finished, {} symbols", index.len());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_find_source_files_skips_excluded_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/Order.cs", "");
        write(dir.path(), "src/Nested/Cart.CS", "");
        write(dir.path(), "src/readme.md", "");
        write(dir.path(), ".git/hooks/Hook.cs", "");
        write(dir.path(), "node_modules/pkg/Thing.cs", "");

        let files = find_source_files(&[dir.path().to_path_buf()], &IndexOptions::default());
        let rel: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(rel, vec!["src/Nested/Cart.CS", "src/Order.cs"]);
    }

    #[tokio::test]
    async fn test_build_index_over_workspace() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/Models.cs", "namespace Shop.Models {\npublic class Order {}\npublic enum Status {}\n}\n");
        write(dir.path(), "b/Repo.cs", "namespace Shop.Data\n{\n    public interface IRepo {}\n}\n");

        let index = build_index(&[dir.path().to_path_buf()], &IndexOptions::default())
            .await
            .unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.files_scanned(), 2);
        assert_eq!(index.namespace_of("IRepo"), Some("Shop.Data"));
        assert_eq!(index.namespace_of("Status"), Some("Shop.Models"));
    }

    #[tokio::test]
    async fn test_duplicate_names_resolve_by_path_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.cs", "namespace First {\nclass Shared {}\n}\n");
        write(dir.path(), "b.cs", "namespace Second {\nclass Shared {}\n}\n");

        let options = IndexOptions {
            max_concurrent_reads: 1,
            ..IndexOptions::default()
        };
        let index = build_index(&[dir.path().to_path_buf()], &options).await.unwrap();
        assert_eq!(index.namespace_of("Shared"), Some("Second"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Bad.cs"), [0xff, 0xfe, 0x00, 0x41]).unwrap();
        write(dir.path(), "Good.cs", "namespace Ok {\nstruct Fine {}\n}\n");

        let index = build_index(&[dir.path().to_path_buf()], &IndexOptions::default())
            .await
            .unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.contains("Fine"));
        assert_eq!(index.files_scanned(), 1);
    }

    #[tokio::test]
    async fn test_byte_order_mark_files_are_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = vec![0xef, 0xbb, 0xbf];
        bytes.extend_from_slice(b"namespace Acme.Models;\r\n\r\npublic class Order\r\n{\r\n}\r\n");
        fs::write(dir.path().join("Order.cs"), bytes).unwrap();

        let index = build_index(&[dir.path().to_path_buf()], &IndexOptions::default())
            .await
            .unwrap();
        assert_eq!(index.namespace_of("Order"), Some("Acme.Models"));
    }

    #[tokio::test]
    async fn test_missing_root_yields_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let index = build_index(&[missing], &IndexOptions::default()).await.unwrap();
        assert!(index.is_empty());
    }
}
