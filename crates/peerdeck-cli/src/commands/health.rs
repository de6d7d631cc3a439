//! Health command implementation.

use anyhow::Result;

use super::HealthArgs;

/// Run the health command.
pub async fn run(args: HealthArgs) -> Result<()> {
    let config = super::load_config();
    let client = super::api_client(&config);

    let (info, health) = tokio::try_join!(client.service_info(), client.health())?;

    if args.json {
        let output = serde_json::json!({ "info": info, "health": health });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Backend at {} is reachable.", client.base_url());

    if let Some(name) = info.get("name").and_then(|v| v.as_str()) {
        println!("  service: {name}");
    }
    if let Some(version) = info.get("version").and_then(|v| v.as_str()) {
        println!("  version: {version}");
    }
    if let Some(status) = health.get("status").and_then(|v| v.as_str()) {
        println!("  health:  {status}");
    }

    Ok(())
}
