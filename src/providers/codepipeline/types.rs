use std::fmt;

use serde::{Serialize, Serializer};

/// Name of the stage that defines the execution epoch.
pub const SOURCE_STAGE_NAME: &str = "Source";

/// Latest execution status of a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    InProgress,
    Succeeded,
    Failed,
    Stopped,
    Superseded,
    /// Any status string CodePipeline reports that is not listed above
    Unknown(String),
}

impl From<&str> for StageStatus {
    fn from(value: &str) -> Self {
        match value {
            "InProgress" => Self::InProgress,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            "Stopped" => Self::Stopped,
            "Superseded" => Self::Superseded,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => f.write_str("InProgress"),
            Self::Succeeded => f.write_str("Succeeded"),
            Self::Failed => f.write_str("Failed"),
            Self::Stopped => f.write_str("Stopped"),
            Self::Superseded => f.write_str("Superseded"),
            Self::Unknown(raw) if raw.is_empty() => f.write_str("Unknown"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for StageStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Snapshot of one stage as reported by `GetPipelineState`.
#[derive(Debug, Clone, PartialEq)]
pub struct StageState {
    /// Stage name, unique within one pipeline state snapshot
    pub name: String,
    /// Pipeline execution id of the stage's latest execution
    pub execution_id: Option<String>,
    /// Status of the stage's latest execution
    pub status: StageStatus,
    /// Action states; only consulted for the Source stage
    pub actions: Vec<ActionState>,
}

impl StageState {
    pub fn is_source(&self) -> bool {
        self.name == SOURCE_STAGE_NAME
    }
}

/// State of one action within a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionState {
    /// Console link to the action's source location
    pub entity_url: Option<String>,
    /// Revision id the action currently points at
    pub current_revision: Option<String>,
}

/// One past (or current) run of the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineExecution {
    pub execution_id: String,
    /// Artifact revisions consumed by the execution, in the order CodePipeline lists them
    pub artifact_revisions: Vec<ArtifactRevision>,
}

/// Link between an execution and a source revision it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRevision {
    pub revision_id: Option<String>,
    /// Free-text summary, e.g. "Amazon S3 version id: <id>" for S3 sources
    pub summary: Option<String>,
}
