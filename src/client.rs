use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::config::ClientConfig;

pub async fn send_transcript_request(config: &ClientConfig) -> Result<Value> {
    let client = reqwest::Client::new();

    println!(
        "🚀 Requesting transcript from: {}/api/transcript",
        config.server_url
    );
    println!(
        "   Video: {}, preferred language: {}",
        config.video_id, config.lang
    );

    let response = client
        .post(format!("{}/api/transcript", config.server_url))
        .json(&serde_json::json!({
            "videoId": config.video_id,
            "lang": config.lang,
        }))
        .send()
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response: {}", e))?;

    if !status.is_success() {
        return Err(anyhow!(
            "Server returned error {}: {}",
            status,
            response_text
        ));
    }

    let json: Value = serde_json::from_str(&response_text)
        .map_err(|e| anyhow!("Failed to parse JSON response: {}", e))?;

    Ok(json)
}

pub async fn check_server_health(server_url: &str) -> Result<()> {
    let client = reqwest::Client::new();

    println!("🔍 Checking server health at: {server_url}/api/health");

    let response = client
        .get(format!("{server_url}/api/health"))
        .send()
        .await
        .map_err(|e| anyhow!("Failed to connect to server: {}", e))?;

    if response.status().is_success() {
        println!("✅ Server is healthy");
        Ok(())
    } else {
        Err(anyhow!("Server health check failed: {}", response.status()))
    }
}

pub async fn run_client(config: ClientConfig) -> Result<()> {
    println!("🎬 Transcript Client");
    println!("====================");
    println!();

    if let Err(e) = check_server_health(&config.server_url).await {
        eprintln!("❌ {e}");
        eprintln!("💡 Make sure the server is running: yt-transcript-service serve");
        return Err(e);
    }

    match send_transcript_request(&config).await {
        Ok(result) => {
            println!("\n✅ Transcript fetched!");
            println!("📝 Result:");
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => {
            eprintln!("❌ Transcript fetch failed: {e}");
            return Err(e);
        }
    }

    Ok(())
}
