mod cli;
mod config;
mod entry;
mod handlers;
mod indexing;
mod state;
mod text;

pub use entry::run;
