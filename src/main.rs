use clap::Parser;
use convai_probe::config::recon_config::ReconConfig;
use convai_probe::core::Probe;
use convai_probe::utils::{logger, validation::Validate};
use convai_probe::{
    CliConfig, DashboardProbe, EnvFileCredentials, LocalStorage, ProbeEngine, ProbeKind,
    SnippetProbe,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting convai-probe CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證 CLI 參數
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 載入 recon 配置：指定檔案或內建預設探測集
    let recon = match &config.config {
        Some(path) => match ReconConfig::from_file(path) {
            Ok(recon) => recon,
            Err(e) => {
                tracing::error!("❌ Failed to load recon config {}: {}", path, e);
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        },
        None => ReconConfig::default_recon(),
    };

    if let Err(e) = recon.validate() {
        tracing::error!("❌ Recon config validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 依選擇的 probe 種類組裝探測
    let probes = build_probes(&recon, &config);
    if probes.is_empty() {
        tracing::warn!("📭 No probes selected for {:?}", config.probe);
    }

    let engine = ProbeEngine::new_with_monitoring(probes, monitor_enabled);

    match engine.run().await {
        Ok(outcomes) => {
            let summary = ProbeEngine::get_execution_summary(&outcomes);
            tracing::info!("✅ Recon run completed successfully!");
            println!("✅ Recon run completed successfully!");
            for outcome in &outcomes {
                println!(
                    "📁 {}: {} findings -> {} ({:?})",
                    outcome.probe_name, outcome.findings, outcome.destination, outcome.duration
                );
            }
            println!(
                "📊 Total: {} probes, {} findings",
                summary.get("total_probes").unwrap(),
                summary.get("total_findings").unwrap()
            );
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Recon run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                convai_probe::utils::error::ErrorSeverity::Low => 0,
                convai_probe::utils::error::ErrorSeverity::Medium => 2,
                convai_probe::utils::error::ErrorSeverity::High => 1,
                convai_probe::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn build_probes(recon: &ReconConfig, config: &CliConfig) -> Vec<Box<dyn Probe>> {
    let output_path = config
        .output_path
        .clone()
        .unwrap_or_else(|| recon.output_path().to_string());
    let save_raw = config.save_raw || recon.save_raw();

    let mut probes: Vec<Box<dyn Probe>> = Vec::new();

    if matches!(config.probe, ProbeKind::All | ProbeKind::Docs) {
        for definition in &recon.docs_probes {
            probes.push(Box::new(SnippetProbe::new(
                LocalStorage::new(output_path.clone()),
                definition.clone(),
                save_raw,
            )));
        }
    }

    if matches!(config.probe, ProbeKind::All | ProbeKind::Dashboard) {
        if let Some(definition) = &recon.dashboard {
            let env_file = config
                .env_file
                .clone()
                .unwrap_or_else(|| definition.env_file().to_string());
            probes.push(Box::new(DashboardProbe::new(
                "dashboard".to_string(),
                LocalStorage::new(output_path.clone()),
                EnvFileCredentials::new(env_file),
                definition.clone(),
                save_raw,
            )));
        }
    }

    probes
}
