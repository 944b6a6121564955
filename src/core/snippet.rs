use crate::config::recon_config::SnippetDefinition;
use crate::core::{Capture, Finding, Probe, ProbeReport, Storage};
use crate::utils::error::{ProbeError, Result};
use crate::utils::text;
use reqwest::Client;

/// 文件頁 snippet 探測：抓 HTML、解碼實體、搜 needle、印出視窗內的片段
pub struct SnippetProbe<S: Storage> {
    storage: S,
    config: SnippetDefinition,
    save_raw: bool,
    client: Client,
}

impl<S: Storage> SnippetProbe<S> {
    pub fn new(storage: S, config: SnippetDefinition, save_raw: bool) -> Self {
        Self {
            storage,
            config,
            save_raw,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Probe for SnippetProbe<S> {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch(&self) -> Result<Vec<Capture>> {
        let mut request = self.client.get(&self.config.endpoint);

        if let Some(timeout) = self.config.timeout_seconds {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        tracing::debug!(
            "📡 {}: Fetching docs page: {}",
            self.config.name,
            self.config.endpoint
        );

        let response = request.send().await?;
        tracing::debug!(
            "📡 {}: Docs page status: {}",
            self.config.name,
            response.status()
        );

        if !response.status().is_success() {
            let error_msg = format!(
                "docs request to {} failed with status: {}",
                self.config.endpoint,
                response.status()
            );
            tracing::error!("❌ {}: {}", self.config.name, error_msg);
            return Err(ProbeError::ProcessingError { message: error_msg });
        }

        let body = response.text().await?;
        Ok(vec![Capture {
            source: self.config.endpoint.clone(),
            body,
        }])
    }

    async fn extract(&self, captures: Vec<Capture>) -> Result<ProbeReport> {
        let mut findings = Vec::new();
        let mut lines = Vec::new();

        for capture in &captures {
            let decoded = text::decode_entities(&capture.body);

            match text::excerpt(&decoded, &self.config.needle, self.config.window()) {
                Some(snippet) => {
                    tracing::info!(
                        "🔍 {}: Found '{}' ({} chars captured)",
                        self.config.name,
                        self.config.needle,
                        snippet.chars().count()
                    );
                    lines.push(snippet.clone());
                    findings.push(Finding {
                        source: capture.source.clone(),
                        label: self.config.needle.clone(),
                        detail: serde_json::Value::String(snippet),
                    });
                }
                None => {
                    // 文件頁改版時 needle 會消失；這不是錯誤，只是沒有發現
                    tracing::warn!(
                        "🔍 {}: Needle '{}' not found in {}",
                        self.config.name,
                        self.config.needle,
                        capture.source
                    );
                }
            }
        }

        Ok(ProbeReport {
            probe_name: self.config.name.clone(),
            findings,
            text_output: lines.join("\n"),
            raw_payloads: Vec::new(),
        })
    }

    async fn report(&self, report: ProbeReport) -> Result<String> {
        if report.text_output.is_empty() {
            tracing::warn!("📭 {}: Nothing to report", self.config.name);
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
            tracing::info!("💾 {}: Findings saved to {}", self.config.name, filename);
            return Ok(filename);
        }

        Ok("stdout".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn file_count(&self) -> usize {
            self.files.lock().await.len()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ProbeError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn definition(endpoint: String, needle: &str, window: usize) -> SnippetDefinition {
        SnippetDefinition {
            name: "test-snippet".to_string(),
            endpoint,
            needle: needle.to_string(),
            window: Some(window),
            timeout_seconds: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_and_extract_decodes_entities() {
        let server = MockServer::start();
        let page = "<html><body><pre>curl https://api.vendor.example/v1/agents \
                    --header &quot;xi-api-key: KEY&quot;</pre></body></html>";

        let docs_mock = server.mock(|when, then| {
            when.method(GET).path("/docs/agents");
            then.status(200)
                .header("Content-Type", "text/html")
                .body(page);
        });

        let probe = SnippetProbe::new(
            MockStorage::new(),
            definition(server.url("/docs/agents"), "curl https://api.", 200),
            false,
        );

        let captures = probe.fetch().await.unwrap();
        let report = probe.extract(captures).await.unwrap();

        docs_mock.assert();
        assert_eq!(report.findings.len(), 1);
        assert!(report.text_output.starts_with("curl https://api.vendor.example"));
        // 實體已解碼
        assert!(report.text_output.contains("--header \"xi-api-key: KEY\""));
    }

    #[tokio::test]
    async fn test_extract_respects_window() {
        let body = format!("curl https://api.{}", "x".repeat(500));
        let probe = SnippetProbe::new(
            MockStorage::new(),
            definition("https://docs.example/agents".to_string(), "curl https://api.", 200),
            false,
        );

        let report = probe
            .extract(vec![Capture {
                source: "https://docs.example/agents".to_string(),
                body,
            }])
            .await
            .unwrap();

        assert_eq!(report.text_output.chars().count(), 200);
    }

    #[tokio::test]
    async fn test_extract_missing_needle_yields_no_findings() {
        let probe = SnippetProbe::new(
            MockStorage::new(),
            definition("https://docs.example/agents".to_string(), "curl https://api.", 200),
            false,
        );

        let report = probe
            .extract(vec![Capture {
                source: "https://docs.example/agents".to_string(),
                body: "<html>nothing interesting</html>".to_string(),
            }])
            .await
            .unwrap();

        assert!(report.findings.is_empty());
        assert!(report.text_output.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_status_is_an_error() {
        let server = MockServer::start();

        let docs_mock = server.mock(|when, then| {
            when.method(GET).path("/docs/agents");
            then.status(500);
        });

        let probe = SnippetProbe::new(
            MockStorage::new(),
            definition(server.url("/docs/agents"), "curl https://api.", 200),
            false,
        );

        let err = probe.fetch().await.unwrap_err();

        docs_mock.assert();
        assert!(matches!(err, ProbeError::ProcessingError { .. }));
    }

    #[tokio::test]
    async fn test_report_saves_findings_when_enabled() {
        let storage = MockStorage::new();
        let probe = SnippetProbe::new(
            storage.clone(),
            definition("https://docs.example/agents".to_string(), "curl https://api.", 200),
            true,
        );

        let report = probe
            .extract(vec![Capture {
                source: "https://docs.example/agents".to_string(),
                body: "curl https://api.vendor.example/v1/agents".to_string(),
            }])
            .await
            .unwrap();

        let destination = probe.report(report).await.unwrap();

        assert!(destination.starts_with("test-snippet_"));
        assert!(destination.ends_with(".json"));
        assert_eq!(storage.file_count().await, 1);
    }

    #[tokio::test]
    async fn test_report_without_save_goes_to_stdout() {
        let storage = MockStorage::new();
        let probe = SnippetProbe::new(
            storage.clone(),
            definition("https://docs.example/agents".to_string(), "curl https://api.", 200),
            false,
        );

        let report = ProbeReport {
            probe_name: "test-snippet".to_string(),
            findings: Vec::new(),
            text_output: String::new(),
            raw_payloads: Vec::new(),
        };

        let destination = probe.report(report).await.unwrap();

        assert_eq!(destination, "stdout");
        assert_eq!(storage.file_count().await, 0);
    }
}
