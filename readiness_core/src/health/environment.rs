use super::checks::{Check, CheckError, CheckResult};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tokio_util::sync::CancellationToken;
use tracing::error;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Verifies that every required configuration key is set to a non-empty value.
pub struct EnvironmentCheck {
    required: Vec<String>,
    lookup: Lookup,
}

impl EnvironmentCheck {
    pub const NAME: &'static str = "env";

    /// Reads keys from the process environment.
    pub fn new(required: Vec<String>) -> Self {
        Self::with_lookup(required, |key| std::env::var(key).ok())
    }

    pub fn with_lookup<F>(required: Vec<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            required,
            lookup: Box::new(lookup),
        }
    }

    /// Missing keys in the order they were configured.
    fn missing(&self) -> Vec<&str> {
        self.required
            .iter()
            .map(String::as_str)
            .filter(|key| (self.lookup)(*key).map_or(true, |value| value.is_empty()))
            .collect()
    }

    pub fn evaluate(&self) -> CheckResult {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.missing()));

        match outcome {
            Ok(missing) if missing.is_empty() => CheckResult::ok(Self::NAME),
            Ok(missing) => {
                CheckResult::degraded(Self::NAME, &CheckError::missing_env_vars(&missing))
            }
            Err(_) => {
                error!("Environment lookup panicked");
                CheckResult::degraded(
                    Self::NAME,
                    &CheckError::Unknown("environment check failed".to_string()),
                )
            }
        }
    }
}

#[async_trait::async_trait]
impl Check for EnvironmentCheck {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn check(&self, _cancel: CancellationToken) -> CheckResult {
        self.evaluate()
    }
}
