use crate::utils::error::{ProbeError, Result};
use crate::utils::validation::{
    self, validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const AGENTS_DOCS_ENDPOINT: &str = "https://elevenlabs.io/docs/api-reference/agents/list";
pub const CONVERSATIONS_DOCS_ENDPOINT: &str =
    "https://elevenlabs.io/docs/api-reference/conversations/list";
pub const DASHBOARD_ENDPOINT: &str = "https://api.elevenlabs.io/v1/convai/settings/dashboard";

pub const CURL_NEEDLE: &str = "curl https://api.";
pub const QUERY_PARAMS_NEEDLE: &str = "Query parameters";

pub const DEFAULT_ENV_FILE: &str = ".env.local";
pub const DEFAULT_CREDENTIAL_KEY: &str = "VITE_ELEVENLABS_API_KEY";
pub const DEFAULT_AUTH_HEADER: &str = "xi-api-key";
pub const DEFAULT_RANGES: [&str; 3] = ["LAST_7_DAYS", "LAST_30_DAYS", "ALL_TIME"];

const DEFAULT_SNIPPET_WINDOW: usize = 200;
const DEFAULT_DASHBOARD_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconConfig {
    pub recon: ReconInfo,
    #[serde(default)]
    pub docs_probes: Vec<SnippetDefinition>,
    pub dashboard: Option<DashboardDefinition>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetDefinition {
    pub name: String,
    pub endpoint: String,
    pub needle: String,
    pub window: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardDefinition {
    pub endpoint: String,
    pub ranges: Vec<String>,
    pub auth_header: Option<String>,
    pub credential_key: Option<String>,
    pub env_file: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_path: Option<String>,
    pub save_raw: Option<bool>,
}

impl SnippetDefinition {
    pub fn window(&self) -> usize {
        self.window.unwrap_or(DEFAULT_SNIPPET_WINDOW)
    }
}

impl DashboardDefinition {
    pub fn auth_header(&self) -> &str {
        self.auth_header.as_deref().unwrap_or(DEFAULT_AUTH_HEADER)
    }

    pub fn credential_key(&self) -> &str {
        self.credential_key
            .as_deref()
            .unwrap_or(DEFAULT_CREDENTIAL_KEY)
    }

    pub fn env_file(&self) -> &str {
        self.env_file.as_deref().unwrap_or(DEFAULT_ENV_FILE)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
            .unwrap_or(DEFAULT_DASHBOARD_TIMEOUT_SECS)
    }
}

impl ReconConfig {
    /// 從 TOML 檔案載入 recon 配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProbeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProbeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 內建的預設探測集：兩個文件頁 snippet 加一個 dashboard dump
    pub fn default_recon() -> Self {
        Self {
            recon: ReconInfo {
                name: "convai-recon".to_string(),
                description: "Probe vendor docs pages and dashboard analytics".to_string(),
                version: "1.0.0".to_string(),
            },
            docs_probes: vec![
                SnippetDefinition {
                    name: "agents-curl-example".to_string(),
                    endpoint: AGENTS_DOCS_ENDPOINT.to_string(),
                    needle: CURL_NEEDLE.to_string(),
                    window: Some(200),
                    timeout_seconds: None,
                },
                SnippetDefinition {
                    name: "conversations-query-params".to_string(),
                    endpoint: CONVERSATIONS_DOCS_ENDPOINT.to_string(),
                    needle: QUERY_PARAMS_NEEDLE.to_string(),
                    window: Some(800),
                    timeout_seconds: None,
                },
            ],
            dashboard: Some(DashboardDefinition {
                endpoint: DASHBOARD_ENDPOINT.to_string(),
                ranges: DEFAULT_RANGES.iter().map(|r| r.to_string()).collect(),
                auth_header: None,
                credential_key: None,
                env_file: None,
                timeout_seconds: None,
            }),
            report: None,
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("recon.name", &self.recon.name)?;

        if self.docs_probes.is_empty() && self.dashboard.is_none() {
            return Err(ProbeError::MissingConfigError {
                field: "docs_probes or dashboard".to_string(),
            });
        }

        for probe in &self.docs_probes {
            validate_non_empty_string("docs_probes.name", &probe.name)?;
            validate_url("docs_probes.endpoint", &probe.endpoint)?;
            validate_non_empty_string("docs_probes.needle", &probe.needle)?;
            validate_positive_number("docs_probes.window", probe.window(), 1)?;
        }

        if let Some(dashboard) = &self.dashboard {
            validate_url("dashboard.endpoint", &dashboard.endpoint)?;
            validate_non_empty_string("dashboard.auth_header", dashboard.auth_header())?;
            validate_non_empty_string("dashboard.credential_key", dashboard.credential_key())?;
            validation::validate_path("dashboard.env_file", dashboard.env_file())?;
            if dashboard.ranges.is_empty() {
                return Err(ProbeError::MissingConfigError {
                    field: "dashboard.ranges".to_string(),
                });
            }
            for range in &dashboard.ranges {
                validate_non_empty_string("dashboard.ranges", range)?;
            }
        }

        if let Some(report) = &self.report {
            if let Some(output_path) = &report.output_path {
                validation::validate_path("report.output_path", output_path)?;
            }
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        self.report
            .as_ref()
            .and_then(|r| r.output_path.as_deref())
            .unwrap_or("./captures")
    }

    pub fn save_raw(&self) -> bool {
        self.report
            .as_ref()
            .and_then(|r| r.save_raw)
            .unwrap_or(false)
    }
}

impl Validate for ReconConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
