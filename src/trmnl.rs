use crate::views::Payload;
use anyhow::{Context, Result};
use log::info;
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;

/// Envelope that the TRMNL webhook expects around the template variables
#[derive(Serialize)]
struct WebhookBody<'a> {
    merge_variables: &'a Payload,
}

/// Send the payload to the TRMNL private plugin webhook
pub fn push(webhook_url: &str, payload: &Payload) -> Result<()> {
    let response = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")?
        .post(webhook_url)
        .json(&WebhookBody {
            merge_variables: payload,
        })
        .send()
        .context("Failed to connect to TRMNL webhook")?
        .error_for_status()
        .context("TRMNL webhook rejected the payload")?;

    info!("Pushed to TRMNL: {}", response.status());
    Ok(())
}

/// Print the payload that a normal run would send
pub fn dry_run(payload: &Payload) -> Result<()> {
    let body = WebhookBody {
        merge_variables: payload,
    };
    println!("=== Dry run - payload that would be sent ===");
    println!("{}", serde_json::to_string_pretty(&body)?);
    println!("Payload size: {} bytes", serde_json::to_string(&body)?.len());
    println!("=== End of payload ===");

    Ok(())
}
