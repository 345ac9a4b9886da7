use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    codescout_cli::main_entry().await
}
