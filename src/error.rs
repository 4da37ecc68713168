use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerdeployedError {
    #[error("{operation} failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("Pipeline '{0}' has no Source stage")]
    MissingSourceStage(String),

    #[error("Stage '{0}' has no latest execution id")]
    MissingExecutionId(String),

    #[error("Pipeline execution {0} was returned without details")]
    EmptyExecution(String),

    #[error("No revision id resolved for stage '{stage}' (execution {execution_id})")]
    ResolutionMiss { stage: String, execution_id: String },

    #[error("Artifact s3://{bucket}/{key} at version {version_id} has no '{field}' metadata")]
    MetadataMissing {
        bucket: String,
        key: String,
        version_id: String,
        field: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, VerdeployedError>;
