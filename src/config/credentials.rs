use crate::domain::ports::CredentialSource;
use crate::utils::error::{ProbeError, Result};
use std::path::{Path, PathBuf};

/// 從本地 env 檔（例如 .env.local）讀取 API key
///
/// 逐行掃描，取第一個 `KEY=value` 匹配；值會去除前後空白與包住的引號。
#[derive(Debug, Clone)]
pub struct EnvFileCredentials {
    path: PathBuf,
}

impl EnvFileCredentials {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn missing(&self, key_name: &str) -> ProbeError {
        ProbeError::MissingCredentialError {
            key: key_name.to_string(),
            path: self.path.display().to_string(),
        }
    }
}

impl CredentialSource for EnvFileCredentials {
    fn api_key(&self, key_name: &str) -> Result<String> {
        // 檔案不存在視同沒有憑證
        let content =
            std::fs::read_to_string(&self.path).map_err(|_| self.missing(key_name))?;

        for line in content.lines() {
            let line = line.trim_start();
            if line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix(key_name) {
                if let Some(value) = rest.strip_prefix('=') {
                    let value = value.trim();
                    let value = value
                        .strip_prefix('"')
                        .and_then(|v| v.strip_suffix('"'))
                        .unwrap_or(value);
                    if value.is_empty() {
                        return Err(self.missing(key_name));
                    }
                    return Ok(value.to_string());
                }
            }
        }

        Err(self.missing(key_name))
    }
}
