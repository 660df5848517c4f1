//! Readiness and liveness reports

use super::checks::CheckResult;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::time::Instant;

/// Outcome of one readiness pass. Only the check list is stored; `ready` is
/// derived from it on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessReport {
    checks: Vec<CheckResult>,
}

impl ReadinessReport {
    pub fn ready(&self) -> bool {
        self.checks.iter().all(CheckResult::is_ok)
    }

    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }
}

impl Serialize for ReadinessReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ReadinessReport", 2)?;
        state.serialize_field("ready", &self.ready())?;
        state.serialize_field("checks", &self.checks)?;
        state.end()
    }
}

pub fn aggregate(results: Vec<CheckResult>) -> ReadinessReport {
    ReadinessReport { checks: results }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LivenessStatus {
    Ok,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LivenessReport {
    pub status: LivenessStatus,
    #[serde(rename = "uptime")]
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LivenessReporter {
    started_at: Instant,
    version: Option<String>,
}

impl LivenessReporter {
    pub fn new(version: Option<String>) -> Self {
        Self::started_at(Instant::now(), version)
    }

    pub fn started_at(started_at: Instant, version: Option<String>) -> Self {
        Self { started_at, version }
    }

    pub fn liveness(&self) -> LivenessReport {
        LivenessReport {
            status: LivenessStatus::Ok,
            uptime_seconds: self.started_at.elapsed().as_secs(),
            version: self.version.clone(),
        }
    }
}
