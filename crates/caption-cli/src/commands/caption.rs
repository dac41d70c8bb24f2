//! Caption command - upload an image and print its caption

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::caption::extract_caption;
use crate::client::RelayClient;

/// Upload `file` and print the generated caption
pub async fn caption(client: &RelayClient, file: &Path) -> Result<()> {
    let response = client.caption_file(file).await?;

    match extract_caption(&response) {
        Some(caption) => println!("{} {}", "Generated Caption:".green().bold(), caption),
        None => println!("{}", "No caption found.".yellow()),
    }
    Ok(())
}
