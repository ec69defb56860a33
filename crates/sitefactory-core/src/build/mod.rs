//! One build: request, orchestration and outcome

pub mod orchestrator;
pub mod request;
pub mod result;

pub use orchestrator::BuildOrchestrator;
pub use request::{BuildRequest, Environment, DEFAULT_GENERATOR_TIMEOUT};
pub use result::{BuildFailure, BuildResult, BuildStage, BuildWarning};
