//! Regex-driven index of C# type declarations grouped by namespace.
//!
//! The index feeds completion and missing-`using` quick fixes in the language server.

pub mod diagnostics;
pub mod index;
pub mod scan;
pub mod usings;
pub mod workspace;

pub use diagnostics::{missing_symbol_name, missing_symbols};
pub use index::{IndexedSymbol, SymbolIndex, SymbolKind};
pub use workspace::{IndexOptions, build_index, find_source_files};
