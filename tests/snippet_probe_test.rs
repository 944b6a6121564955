use anyhow::Result;
use convai_probe::config::recon_config::SnippetDefinition;
use convai_probe::core::Probe;
use convai_probe::{LocalStorage, ProbeEngine, SnippetProbe};
use httpmock::prelude::*;
use tempfile::TempDir;

fn snippet_definition(name: &str, endpoint: String, needle: &str, window: usize) -> SnippetDefinition {
    SnippetDefinition {
        name: name.to_string(),
        endpoint,
        needle: needle.to_string(),
        window: Some(window),
        timeout_seconds: Some(10),
    }
}

/// 測試文件頁 snippet 探測的完整流程（抓取、解碼、擷取、存檔）
#[tokio::test]
async fn test_snippet_probe_end_to_end_with_save() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();

    // 文件頁把 curl 範例用 HTML 實體編碼
    let page = concat!(
        "<html><head><title>List agents</title></head><body>",
        "<div class=\"code-sample\"><pre>",
        "curl https://api.vendor.example/v1/convai/agents \\&#10;",
        "  --header &quot;xi-api-key: YOUR_API_KEY&quot;",
        "</pre></div>",
        "</body></html>"
    );

    let docs_mock = server.mock(|when, then| {
        when.method(GET).path("/docs/api-reference/agents/list");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(page);
    });

    let probe = SnippetProbe::new(
        LocalStorage::new(output_path.clone()),
        snippet_definition(
            "agents-curl-example",
            server.url("/docs/api-reference/agents/list"),
            "curl https://api.",
            200,
        ),
        true,
    );

    let engine = ProbeEngine::new(vec![Box::new(probe)]);
    let outcomes = engine.run().await?;

    docs_mock.assert();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].probe_name, "agents-curl-example");
    assert_eq!(outcomes[0].findings, 1);
    assert!(outcomes[0].destination.ends_with(".json"));

    // 存檔內容要包含解碼後的 snippet
    let saved_path = temp_dir.path().join(&outcomes[0].destination);
    let saved = std::fs::read_to_string(saved_path)?;
    let report: serde_json::Value = serde_json::from_str(&saved)?;

    let snippet = report["findings"][0]["detail"].as_str().unwrap();
    assert!(snippet.starts_with("curl https://api.vendor.example"));
    assert!(snippet.contains("--header \"xi-api-key: YOUR_API_KEY\""));
    assert!(!snippet.contains("&quot;"));

    Ok(())
}

/// 測試 Query parameters 區塊探測（較大的 800 字元視窗）
#[tokio::test]
async fn test_query_params_probe_captures_wide_window() -> Result<()> {
    let server = MockServer::start();

    let section = format!(
        "<h3>Query parameters</h3><dl>{}</dl>",
        "<dt>cursor</dt><dd>Used for fetching next page.</dd>\
         <dt>page_size</dt><dd>How many conversations to return at maximum.</dd>\
         <dt>call_successful</dt><dd>The result of the success evaluation.</dd>"
    );
    let page = format!("<html><body><h1>List conversations</h1>{}</body></html>", section);

    let docs_mock = server.mock(|when, then| {
        when.method(GET).path("/docs/api-reference/conversations/list");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(page);
    });

    let probe = SnippetProbe::new(
        LocalStorage::new("./unused".to_string()),
        snippet_definition(
            "conversations-query-params",
            server.url("/docs/api-reference/conversations/list"),
            "Query parameters",
            800,
        ),
        false,
    );

    let captures = probe.fetch().await?;
    let report = probe.extract(captures).await?;

    docs_mock.assert();
    assert_eq!(report.findings.len(), 1);
    assert!(report.text_output.starts_with("Query parameters"));
    assert!(report.text_output.contains("page_size"));
    assert!(report.text_output.contains("call_successful"));
    assert!(report.text_output.chars().count() <= 800);

    Ok(())
}

/// 頁面改版導致 needle 消失：不是錯誤，但也沒有 findings
#[tokio::test]
async fn test_snippet_probe_missing_needle_reports_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let docs_mock = server.mock(|when, then| {
        when.method(GET).path("/docs/api-reference/agents/list");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<html><body>The docs moved somewhere else.</body></html>");
    });

    let probe = SnippetProbe::new(
        LocalStorage::new(temp_dir.path().to_str().unwrap().to_string()),
        snippet_definition(
            "agents-curl-example",
            server.url("/docs/api-reference/agents/list"),
            "curl https://api.",
            200,
        ),
        false,
    );

    let engine = ProbeEngine::new(vec![Box::new(probe)]);
    let outcomes = engine.run().await?;

    docs_mock.assert();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].findings, 0);
    assert_eq!(outcomes[0].destination, "stdout");

    Ok(())
}

/// 文件頁回 404 時整個 run 以錯誤收場
#[tokio::test]
async fn test_snippet_probe_http_error_fails_run() -> Result<()> {
    let server = MockServer::start();

    let docs_mock = server.mock(|when, then| {
        when.method(GET).path("/docs/api-reference/agents/list");
        then.status(404);
    });

    let probe = SnippetProbe::new(
        LocalStorage::new("./unused".to_string()),
        snippet_definition(
            "agents-curl-example",
            server.url("/docs/api-reference/agents/list"),
            "curl https://api.",
            200,
        ),
        false,
    );

    let engine = ProbeEngine::new(vec![Box::new(probe)]);
    let result = engine.run().await;

    docs_mock.assert();
    assert!(result.is_err());

    Ok(())
}
