use crate::config::recon_config::DashboardDefinition;
use crate::core::{Capture, CredentialSource, Finding, Probe, ProbeReport, Storage};
use crate::utils::error::{ProbeError, Result};
use reqwest::Client;

/// Dashboard 分析探測：帶著 env 檔裡的 API key，對每個時間範圍
/// 抓一次 dashboard endpoint，摘要回應的 keys、charts 與 totals。
pub struct DashboardProbe<S: Storage, C: CredentialSource> {
    name: String,
    storage: S,
    credentials: C,
    config: DashboardDefinition,
    save_raw: bool,
    client: Client,
}

impl<S: Storage, C: CredentialSource> DashboardProbe<S, C> {
    pub fn new(
        name: String,
        storage: S,
        credentials: C,
        config: DashboardDefinition,
        save_raw: bool,
    ) -> Self {
        Self {
            name,
            storage,
            credentials,
            config,
            save_raw,
            client: Client::new(),
        }
    }

    /// 單一範圍的摘要行，對應 findings 一併回傳
    fn summarize_range(&self, range: &str, value: &serde_json::Value) -> Result<(Vec<String>, Vec<Finding>)> {
        let obj = value.as_object().ok_or_else(|| ProbeError::ProcessingError {
            message: format!("dashboard response for {} is not a JSON object", range),
        })?;

        let mut lines = Vec::new();
        let mut findings = Vec::new();

        let keys: Vec<String> = obj.keys().cloned().collect();
        lines.push(format!("{} {:?}", range, keys));
        findings.push(Finding {
            source: range.to_string(),
            label: "keys".to_string(),
            detail: serde_json::json!(keys),
        });

        // charts 可能缺席或是 null
        if let Some(charts) = obj.get("charts").and_then(|v| v.as_array()) {
            for chart in charts {
                let chart_obj = match chart.as_object() {
                    Some(obj) => obj,
                    None => {
                        tracing::warn!(
                            "📊 {}: Skipping non-object chart entry in {}",
                            self.name,
                            range
                        );
                        continue;
                    }
                };
                let chart_name = chart_obj
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");
                let chart_type = chart_obj
                    .get("type")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");
                let chart_keys: Vec<String> = chart_obj.keys().cloned().collect();

                lines.push(format!(" - {} {} {:?}", chart_name, chart_type, chart_keys));
                findings.push(Finding {
                    source: range.to_string(),
                    label: format!("chart:{}", chart_name),
                    detail: serde_json::json!({
                        "type": chart_type,
                        "keys": chart_keys,
                    }),
                });
            }
        }

        if let Some(totals) = obj.get("totals") {
            let non_empty = totals
                .as_object()
                .map(|t| !t.is_empty())
                .unwrap_or(!totals.is_null());
            if non_empty {
                lines.push(format!(" totals {}", totals));
                findings.push(Finding {
                    source: range.to_string(),
                    label: "totals".to_string(),
                    detail: totals.clone(),
                });
            }
        }

        Ok((lines, findings))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: CredentialSource> Probe for DashboardProbe<S, C> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Capture>> {
        // 沒有 key 就直接失敗，不發任何請求
        let api_key = self.credentials.api_key(self.config.credential_key())?;

        let mut captures = Vec::new();

        for (index, range) in self.config.ranges.iter().enumerate() {
            tracing::debug!(
                "📡 {}: Dashboard call {}/{}: range={}",
                self.name,
                index + 1,
                self.config.ranges.len(),
                range
            );

            let response = self
                .client
                .get(&self.config.endpoint)
                .header(self.config.auth_header(), api_key.as_str())
                .query(&[("range", range.as_str())])
                .timeout(std::time::Duration::from_secs(self.config.timeout_seconds()))
                .send()
                .await?;

            if !response.status().is_success() {
                let error_msg = format!(
                    "dashboard request for range {} failed with status: {}",
                    range,
                    response.status()
                );
                tracing::error!("❌ {}: {}", self.name, error_msg);
                return Err(ProbeError::ProcessingError { message: error_msg });
            }

            let body = response.text().await?;
            captures.push(Capture {
                source: range.clone(),
                body,
            });

            // 連續呼叫之間稍作延遲，避免請求過於頻繁
            if index < self.config.ranges.len() - 1 {
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }
        }

        tracing::info!(
            "📡 {}: Fetched {} range payloads",
            self.name,
            captures.len()
        );
        Ok(captures)
    }

    async fn extract(&self, captures: Vec<Capture>) -> Result<ProbeReport> {
        let mut lines = Vec::new();
        let mut findings = Vec::new();
        let mut raw_payloads = Vec::new();

        for capture in &captures {
            let value: serde_json::Value = serde_json::from_str(&capture.body)?;

            let (range_lines, range_findings) = self.summarize_range(&capture.source, &value)?;
            lines.extend(range_lines);
            findings.extend(range_findings);
            raw_payloads.push(value);
        }

        Ok(ProbeReport {
            probe_name: self.name.clone(),
            findings,
            text_output: lines.join("\n"),
            raw_payloads,
        })
    }

    async fn report(&self, report: ProbeReport) -> Result<String> {
        if report.text_output.is_empty() {
            tracing::warn!("📭 {}: Nothing to report", self.name);
        } else {
            println!("{}", report.text_output);
        }

        if self.save_raw {
            let filename = format!(
                "{}_{}.json",
                report.probe_name,
                chrono::Utc::now().format("%Y%m%d_%H%M%S")
            );
            let json = serde_json::to_string_pretty(&report)?;
            self.storage.write_file(&filename, json.as_bytes()).await?;
            tracing::info!("💾 {}: Findings saved to {}", self.name, filename);
            return Ok(filename);
        }

        Ok("stdout".to_string())
    }
}
