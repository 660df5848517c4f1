use super::checks::Check;
use super::dependency::{DependencyCheck, DependencyTarget, HttpPing};
use super::environment::EnvironmentCheck;
use super::report::{aggregate, LivenessReport, LivenessReporter, ReadinessReport};
use super::runner::CheckRunner;
use crate::{config::AppConfig, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns the registered readiness checks and the liveness reporter.
pub struct HealthService {
    checks: Vec<Arc<dyn Check>>,
    runner: CheckRunner,
    liveness: LivenessReporter,
}

impl HealthService {
    pub fn new(runner: CheckRunner, liveness: LivenessReporter) -> Self {
        Self {
            checks: Vec::new(),
            runner,
            liveness,
        }
    }

    pub fn add_check<T: Check + 'static>(mut self, check: T) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub async fn readiness(&self) -> ReadinessReport {
        let report = aggregate(self.runner.run(&self.checks).await);

        if report.ready() {
            debug!("Readiness: ready ({} checks)", report.checks().len());
        } else {
            warn!(
                "Readiness: not ready, degraded checks: {}",
                report
                    .checks()
                    .iter()
                    .filter(|c| !c.is_ok())
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        report
    }

    pub fn liveness(&self) -> LivenessReport {
        self.liveness.liveness()
    }

    /// Environment check first, then the Supabase dependency.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let runner = CheckRunner::new(config.readiness.timeout());
        let liveness = LivenessReporter::new(config.service.version.clone());

        let ping = HttpPing::new(
            config.supabase.probe_path.clone(),
            config.supabase.request_timeout(),
        )?;

        let target = DependencyTarget::new(
            config.supabase.url.clone(),
            config.supabase.service_role_key.clone(),
        );

        let service = HealthService::new(runner, liveness)
            .add_check(EnvironmentCheck::new(config.readiness.required_env.clone()))
            .add_check(DependencyCheck::new("supabase", target, Arc::new(ping)));

        info!(
            "Health service configured with checks [{}] and timeout {:?}",
            service.check_names().join(", "),
            service.runner.timeout()
        );

        Ok(service)
    }
}
