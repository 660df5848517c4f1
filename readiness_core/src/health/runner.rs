//! Concurrent check execution with a per-check timeout race

use super::checks::{Check, CheckError, CheckResult};
use futures_util::future::join_all;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const FALLBACK_FAILURE_MESSAGE: &str = "check failed";

#[derive(Debug, Clone)]
pub struct CheckRunner {
    timeout: Duration,
}

impl CheckRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs every check concurrently and returns one result per check, in input order.
    ///
    /// Each check runs on its own task and races a timer of `self.timeout`. A check
    /// that panics is reported as degraded with the panic message; one that loses the
    /// race is reported as degraded with `"timeout"`, its cancellation token is
    /// cancelled, and its task is left to wind down without being awaited.
    pub async fn run(&self, checks: &[Arc<dyn Check>]) -> Vec<CheckResult> {
        let started = Instant::now();
        let run_token = CancellationToken::new();
        // Cancels every still-running check once this call returns or is dropped.
        let _cancel_on_exit = run_token.clone().drop_guard();

        let slots = checks
            .iter()
            .cloned()
            .map(|check| run_slot(check, self.timeout, run_token.child_token()));

        let results = join_all(slots).await;

        debug!(
            "Ran {} readiness checks in {:?} ({} degraded)",
            results.len(),
            started.elapsed(),
            results.iter().filter(|r| !r.is_ok()).count()
        );

        results
    }
}

async fn run_slot(
    check: Arc<dyn Check>,
    timeout: Duration,
    cancel: CancellationToken,
) -> CheckResult {
    let name = check.name().to_string();
    let start = Instant::now();

    let task_cancel = cancel.clone();
    let mut handle = tokio::spawn(async move { check.check(task_cancel).await });

    let result = match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => CheckResult::degraded(&name, &failure_from_join(join_error)),
        Err(_) => {
            cancel.cancel();
            CheckResult::degraded(&name, &CheckError::Timeout)
        }
    };

    match &result.error {
        None => debug!("Check '{}' passed in {:?}", name, start.elapsed()),
        Some(error) => warn!("Check '{}' degraded in {:?}: {}", name, start.elapsed(), error),
    }

    result
}

fn failure_from_join(error: JoinError) -> CheckError {
    if error.is_panic() {
        CheckError::Unknown(panic_message(error.into_panic()))
    } else {
        CheckError::Unknown(FALLBACK_FAILURE_MESSAGE.to_string())
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::new()
    };

    if message.is_empty() {
        FALLBACK_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}
