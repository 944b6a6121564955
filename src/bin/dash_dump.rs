use anyhow::{Context, Result};
use convai_probe::config::recon_config::{
    DASHBOARD_ENDPOINT, DEFAULT_AUTH_HEADER, DEFAULT_CREDENTIAL_KEY, DEFAULT_ENV_FILE,
    DEFAULT_RANGES,
};
use convai_probe::domain::ports::CredentialSource;
use convai_probe::EnvFileCredentials;

/// 一次性的 dashboard dump（快速手動檢查用，正式流程走 convai-probe CLI）
#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    println!("🚀 Dumping dashboard analytics for {} ranges", DEFAULT_RANGES.len());

    let credentials = EnvFileCredentials::new(DEFAULT_ENV_FILE);
    let api_key = credentials
        .api_key(DEFAULT_CREDENTIAL_KEY)
        .context("no key")?;

    let client = reqwest::Client::new();

    for range in DEFAULT_RANGES {
        let data: serde_json::Value = client
            .get(DASHBOARD_ENDPOINT)
            .header(DEFAULT_AUTH_HEADER, api_key.as_str())
            .query(&[("range", range)])
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let keys: Vec<&String> = data.as_object().map(|o| o.keys().collect()).unwrap_or_default();
        println!("{} {:?}", range, keys);

        if let Some(charts) = data.get("charts").and_then(|v| v.as_array()) {
            for chart in charts {
                let name = chart.get("name").and_then(|v| v.as_str()).unwrap_or("unknown");
                let chart_type = chart.get("type").and_then(|v| v.as_str()).unwrap_or("unknown");
                let chart_keys: Vec<&String> = chart
                    .as_object()
                    .map(|o| o.keys().collect())
                    .unwrap_or_default();
                println!(" - {} {} {:?}", name, chart_type, chart_keys);
            }
        }

        if let Some(totals) = data.get("totals") {
            if !totals.is_null() {
                println!(" totals {}", totals);
            }
        }
    }

    println!("🎉 Done");

    Ok(())
}
