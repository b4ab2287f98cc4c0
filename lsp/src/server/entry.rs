use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

use super::{
    cli::{try_cli_index, Cli},
    state::AutoUsingServer,
};

pub async fn run() {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match try_cli_index(&cli).await {
        Ok(Some(output)) => {
            println!("{}", output);
            return;
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("autousing-lsp index error: {e:#}");
            std::process::exit(2);
        }
    }

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(AutoUsingServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
