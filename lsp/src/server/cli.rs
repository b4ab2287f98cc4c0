use std::path::PathBuf;

use anyhow::Context;
use autousing_core::{build_index, IndexOptions, SymbolIndex};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "autousing-lsp")]
#[command(about = "Language server offering C# type completion and missing `using` fixes", version)]
pub(crate) struct Cli {
    /// Communicate over stdio (the default transport)
    #[arg(long)]
    pub(crate) stdio: bool,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Scan directories and print the symbol index
    Index {
        /// Workspace directories to scan
        #[arg(required = true)]
        roots: Vec<PathBuf>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Directory names to skip (repeatable; replaces the defaults)
        #[arg(long = "exclude")]
        exclude: Vec<String>,
    },
}

pub(crate) async fn try_cli_index(cli: &Cli) -> anyhow::Result<Option<String>> {
    let Some(Command::Index { roots, json, exclude }) = &cli.command else {
        return Ok(None);
    };

    for root in roots {
        anyhow::ensure!(root.is_dir(), "Not a directory: {}", root.display());
    }

    let mut options = IndexOptions::default();
    if !exclude.is_empty() {
        options.exclude_dirs = exclude.clone();
    }

    let index = build_index(roots, &options)
        .await
        .with_context(|| format!("Failed to index {} root(s)", roots.len()))?;
    render_index(&index, *json).map(Some)
}

pub(crate) fn render_index(index: &SymbolIndex, json: bool) -> anyhow::Result<String> {
    if json {
        let symbols: Vec<_> = index.iter().collect();
        let output = serde_json::json!({
            "files_scanned": index.files_scanned(),
            "symbols": symbols,
        });
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    let mut lines: Vec<String> = index
        .iter()
        .map(|s| format!("{:<10} {:<40} {}", s.kind, s.name, s.namespace))
        .collect();
    lines.push(format!(
        "{} symbols in {} files",
        index.len(),
        index.files_scanned()
    ));
    Ok(lines.join("\n"))
}
