#[tokio::main]
async fn main() -> anyhow::Result<()> {
    marquee_lib::run().await?;
    Ok(())
}
