pub mod cli;
pub mod credentials;
pub mod recon_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// 文件頁 snippet 探測加 dashboard 探測
    All,
    /// 只跑文件頁 snippet 探測
    Docs,
    /// 只跑 dashboard 探測
    Dashboard,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "convai-probe")]
#[command(about = "Probe a conversational-AI vendor's docs pages and dashboard API")]
pub struct CliConfig {
    #[arg(long, value_enum, default_value_t = ProbeKind::All)]
    pub probe: ProbeKind,

    #[arg(long, help = "TOML recon config (defaults to the built-in probe set)")]
    pub config: Option<String>,

    #[arg(long, help = "Env file holding the dashboard API key")]
    pub env_file: Option<String>,

    #[arg(long, help = "Directory for saved captures")]
    pub output_path: Option<String>,

    #[arg(long, help = "Save findings and raw payloads as JSON")]
    pub save_raw: bool,

    #[arg(long, help = "Log system resource usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        if let Some(env_file) = &self.env_file {
            validate_non_empty_string("env_file", env_file)?;
        }
        if let Some(output_path) = &self.output_path {
            validate_path("output_path", output_path)?;
        }
        Ok(())
    }
}
