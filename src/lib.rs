pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, ProbeKind};

pub use config::cli::LocalStorage;
pub use config::credentials::EnvFileCredentials;
pub use config::recon_config::ReconConfig;
pub use core::{dashboard::DashboardProbe, engine::ProbeEngine, snippet::SnippetProbe};
pub use utils::error::{ProbeError, Result};
