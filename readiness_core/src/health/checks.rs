//! Check capability and the values it produces

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Degraded,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "ok"),
            CheckStatus::Degraded => write!(f, "degraded"),
        }
    }
}

/// Reasons a check can come back degraded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("{0}")]
    ConfigurationMissing(String),

    #[error("{0}")]
    DependencyUnreachable(String),

    #[error("timeout")]
    Timeout,

    #[error("cancelled")]
    Cancelled,

    #[error("{0}")]
    Unknown(String),
}

impl CheckError {
    pub fn missing_env_vars<S: AsRef<str>>(keys: &[S]) -> Self {
        let joined = keys.iter().map(|k| k.as_ref()).collect::<Vec<_>>().join(", ");
        CheckError::ConfigurationMissing(format!("Missing env vars: {}", joined))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
            error: None,
        }
    }

    pub fn degraded(name: impl Into<String>, error: &CheckError) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Degraded,
            error: Some(error.to_string()),
        }
    }

    /// Folds a tagged outcome into a result carrying only the error's message.
    pub fn from_outcome(name: impl Into<String>, outcome: Result<(), CheckError>) -> Self {
        match outcome {
            Ok(()) => Self::ok(name),
            Err(e) => Self::degraded(name, &e),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CheckStatus::Ok
    }
}

/// A single readiness probe.
///
/// Implementations are expected to return a degraded [`CheckResult`] rather than
/// panic. The runner still guards against panics and hangs, and cancels `cancel`
/// once the check has lost its timeout race.
#[async_trait::async_trait]
pub trait Check: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self, cancel: CancellationToken) -> CheckResult;
}
