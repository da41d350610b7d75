use emergent_client::ClientError;
use thiserror::Error;

/// Errors raised by the readiness machine, beyond the backend client's own
/// taxonomy.
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("backend error: {0}")]
    Client(#[from] ClientError),

    /// §4.F step 1: "reject if type is not a workflow artifact."
    #[error("{0} is not a workflow artifact and has no readiness state")]
    NotWorkflowArtifact(String),
}

impl ReadinessError {
    pub fn remedy(&self) -> String {
        match self {
            ReadinessError::Client(e) => e.remedy().to_string(),
            ReadinessError::NotWorkflowArtifact(_) => {
                "only Proposal, Spec, Requirement, Scenario, and Design carry readiness state."
                    .to_string()
            }
        }
    }
}
