//! Raw command - upload an image and print the full analysis JSON

use std::path::Path;

use anyhow::Result;

use crate::client::RelayClient;

pub async fn raw(client: &RelayClient, file: &Path) -> Result<()> {
    let response = client.caption_file(file).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
