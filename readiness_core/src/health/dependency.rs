//! Reachability checks for external dependencies

use super::checks::{Check, CheckError, CheckResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Minimal, read-only probe against a dependency.
#[async_trait::async_trait]
pub trait Ping: Send + Sync {
    async fn ping(&self, endpoint: &str, credential: &str) -> Result<(), CheckError>;
}

/// Connection settings for a dependency. Either value may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyTarget {
    pub endpoint: Option<String>,
    pub credential: Option<String>,
}

impl DependencyTarget {
    pub fn new(endpoint: Option<String>, credential: Option<String>) -> Self {
        Self { endpoint, credential }
    }

    fn resolve(&self, name: &str) -> Result<(&str, &str), CheckError> {
        let endpoint = non_empty(self.endpoint.as_deref());
        let credential = non_empty(self.credential.as_deref());

        match (endpoint, credential) {
            (Some(endpoint), Some(credential)) => Ok((endpoint, credential)),
            (endpoint, credential) => {
                let mut missing = Vec::new();
                if endpoint.is_none() {
                    missing.push("endpoint");
                }
                if credential.is_none() {
                    missing.push("credential");
                }
                Err(CheckError::ConfigurationMissing(format!(
                    "{} is not configured: missing {}",
                    name,
                    missing.join(", ")
                )))
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

pub struct DependencyCheck {
    name: String,
    target: DependencyTarget,
    pinger: Arc<dyn Ping>,
}

impl DependencyCheck {
    pub fn new(name: impl Into<String>, target: DependencyTarget, pinger: Arc<dyn Ping>) -> Self {
        Self {
            name: name.into(),
            target,
            pinger,
        }
    }

    async fn probe(&self, cancel: &CancellationToken) -> Result<(), CheckError> {
        // Fail fast without touching the network when the target is incomplete.
        let (endpoint, credential) = self.target.resolve(&self.name)?;

        tokio::select! {
            outcome = self.pinger.ping(endpoint, credential) => outcome,
            _ = cancel.cancelled() => {
                debug!("Probe for '{}' cancelled", self.name);
                Err(CheckError::Cancelled)
            }
        }
    }
}

#[async_trait::async_trait]
impl Check for DependencyCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, cancel: CancellationToken) -> CheckResult {
        CheckResult::from_outcome(&self.name, self.probe(&cancel).await)
    }
}

/// Probes an HTTP dependency with a single GET against a health path, sending the
/// credential the way Supabase expects it.
#[derive(Debug, Clone)]
pub struct HttpPing {
    client: Client,
    probe_path: String,
}

impl HttpPing {
    pub const DEFAULT_PROBE_PATH: &'static str = "/auth/v1/health";

    pub fn new(probe_path: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, probe_path))
    }

    pub fn with_client(client: Client, probe_path: impl Into<String>) -> Self {
        Self {
            client,
            probe_path: probe_path.into(),
        }
    }

    fn probe_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            self.probe_path.trim_start_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl Ping for HttpPing {
    async fn ping(&self, endpoint: &str, credential: &str) -> Result<(), CheckError> {
        let url = self.probe_url(endpoint);

        let response = self
            .client
            .get(&url)
            .header("apikey", credential)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| CheckError::DependencyUnreachable(error_chain(e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CheckError::DependencyUnreachable(format!("HTTP {}", status)))
        }
    }
}

/// `outer: cause: root cause`, since reqwest's own message omits the source.
fn error_chain(error: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::from(error))
}
