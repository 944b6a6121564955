use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 一次 HTTP 抓取的原始結果
#[derive(Debug, Clone)]
pub struct Capture {
    /// 抓取來源（文件頁 URL 或 dashboard 的時間範圍名稱）
    pub source: String,
    pub body: String,
}

/// 從 capture 萃取出的單一發現
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub source: String,
    pub label: String,
    pub detail: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub probe_name: String,
    pub findings: Vec<Finding>,
    /// 人類可讀的輸出，report 階段原樣印到 stdout
    pub text_output: String,
    /// dashboard 回應的完整 JSON（--save-raw 時一併存檔）
    #[serde(default)]
    pub raw_payloads: Vec<serde_json::Value>,
}

/// 單一 probe 執行完成後的摘要
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub probe_name: String,
    pub findings: usize,
    /// report 階段的輸出目的地（stdout 或存檔路徑）
    pub destination: String,
    pub duration: Duration,
}
