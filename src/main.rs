/*
 * Responsibility
 * - tokio runtime entry point
 * - calls app::run() and nothing else
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    users_gateway::app::run().await
}
