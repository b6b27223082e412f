use std::sync::Arc;

use anyhow::{Context, Result};
use newsbrief::mail::gmail::GmailClient;
use newsbrief::pipeline::{Pipeline, RunOptions};
use newsbrief::storage::FileStore;

const DEFAULT_STATE_FILE: &str = "newsbrief_state.json";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let access_token = std::env::var("GMAIL_ACCESS_TOKEN")
        .context("GMAIL_ACCESS_TOKEN must hold a valid Gmail API bearer token")?;
    let state_file =
        std::env::var("NEWSBRIEF_STATE_FILE").unwrap_or_else(|_| DEFAULT_STATE_FILE.to_string());

    let mail = Arc::new(GmailClient::new(access_token));
    let store = Arc::new(FileStore::new(state_file));

    let pipeline = Pipeline::new(mail, store);
    let articles = pipeline.run(RunOptions::default()).await?;

    println!("{}", serde_json::to_string_pretty(&articles)?);
    Ok(())
}
