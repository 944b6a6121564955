use crate::core::{Probe, ProbeOutcome};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::collections::HashMap;
use std::time::Instant;

/// 依序驅動每個 probe 走完 fetch / extract / report 三階段
pub struct ProbeEngine {
    probes: Vec<Box<dyn Probe>>,
    monitor: SystemMonitor,
}

impl ProbeEngine {
    pub fn new(probes: Vec<Box<dyn Probe>>) -> Self {
        Self::new_with_monitoring(probes, false)
    }

    pub fn new_with_monitoring(probes: Vec<Box<dyn Probe>>, monitor_enabled: bool) -> Self {
        Self {
            probes,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn add_probe(&mut self, probe: Box<dyn Probe>) {
        self.probes.push(probe);
    }

    pub async fn run(&self) -> Result<Vec<ProbeOutcome>> {
        let mut outcomes = Vec::new();

        for probe in &self.probes {
            let started = Instant::now();

            tracing::info!("📥 {}: Starting fetch", probe.name());
            let captures = probe.fetch().await?;
            tracing::info!("📥 {}: Fetched {} captures", probe.name(), captures.len());
            self.monitor.log_stats(&format!("{} fetch", probe.name()));

            tracing::info!("🔄 {}: Starting extract", probe.name());
            let report = probe.extract(captures).await?;
            tracing::info!(
                "🔄 {}: Extracted {} findings",
                probe.name(),
                report.findings.len()
            );
            self.monitor.log_stats(&format!("{} extract", probe.name()));

            let findings = report.findings.len();
            let destination = probe.report(report).await?;
            self.monitor.log_stats(&format!("{} report", probe.name()));

            outcomes.push(ProbeOutcome {
                probe_name: probe.name().to_string(),
                findings,
                destination,
                duration: started.elapsed(),
            });
        }

        self.monitor.log_final_stats();
        Ok(outcomes)
    }

    pub fn get_execution_summary(
        outcomes: &[ProbeOutcome],
    ) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        let total_findings: usize = outcomes.iter().map(|o| o.findings).sum();
        let total_duration_ms: u128 = outcomes.iter().map(|o| o.duration.as_millis()).sum();
        let executed: Vec<serde_json::Value> = outcomes
            .iter()
            .map(|o| serde_json::Value::String(o.probe_name.clone()))
            .collect();

        summary.insert(
            "total_probes".to_string(),
            serde_json::Value::Number(outcomes.len().into()),
        );
        summary.insert(
            "total_findings".to_string(),
            serde_json::Value::Number(total_findings.into()),
        );
        summary.insert(
            "total_duration_ms".to_string(),
            serde_json::Value::Number((total_duration_ms as u64).into()),
        );
        summary.insert(
            "executed_probes".to_string(),
            serde_json::Value::Array(executed),
        );

        summary
    }
}
