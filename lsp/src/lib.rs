//! Language server that indexes C# type declarations across a workspace and offers
//! completion plus quick fixes for missing `using` directives.

pub mod analyzer;
mod server;

pub use server::run;
