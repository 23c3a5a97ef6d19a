#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bonification_cli::run().await?;
    Ok(())
}
