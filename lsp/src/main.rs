#[tokio::main]
async fn main() {
    autousing_lsp::run().await;
}
