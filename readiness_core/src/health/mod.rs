pub mod checks;
pub mod dependency;
pub mod environment;
pub mod report;
pub mod runner;
pub mod service;


pub use checks::{Check, CheckError, CheckResult, CheckStatus};
pub use dependency::{DependencyCheck, DependencyTarget, HttpPing, Ping};
pub use environment::EnvironmentCheck;
pub use report::{aggregate, LivenessReport, LivenessReporter, LivenessStatus, ReadinessReport};
pub use runner::CheckRunner;
pub use service::HealthService;
