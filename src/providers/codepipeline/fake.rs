//! In-memory `PipelineApi` and `ArtifactStore` used by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Result, VerdeployedError};

use super::api::{ArtifactStore, PipelineApi};
use super::types::{ActionState, ArtifactRevision, PipelineExecution, StageState, StageStatus};

pub const CONSOLE_URL: &str =
    "https://console.aws.amazon.com/s3/home?region=us-east-1#/artifacts/source.zip";

pub fn s3_action(revision: &str) -> ActionState {
    ActionState {
        entity_url: Some(CONSOLE_URL.to_string()),
        current_revision: Some(revision.to_string()),
    }
}

pub fn github_action(revision: &str) -> ActionState {
    ActionState {
        entity_url: Some("https://github.com/acme/app/tree/main".to_string()),
        current_revision: Some(revision.to_string()),
    }
}

pub fn stage(name: &str, execution_id: &str, actions: Vec<ActionState>) -> StageState {
    StageState {
        name: name.to_string(),
        execution_id: Some(execution_id.to_string()),
        status: StageStatus::Succeeded,
        actions,
    }
}

/// Execution with `(revision_id, summary)` artifact revisions.
pub fn execution(execution_id: &str, revisions: &[(&str, &str)]) -> PipelineExecution {
    PipelineExecution {
        execution_id: execution_id.to_string(),
        artifact_revisions: revisions
            .iter()
            .map(|(id, summary)| ArtifactRevision {
                revision_id: Some((*id).to_string()),
                summary: Some((*summary).to_string()),
            })
            .collect(),
    }
}

fn not_found(operation: &'static str, what: &str) -> VerdeployedError {
    VerdeployedError::Transport {
        operation,
        message: format!("{what} not found"),
    }
}

pub struct FakePipelineApi {
    stages: Vec<StageState>,
    executions: HashMap<String, PipelineExecution>,
    state_calls: RefCell<usize>,
    execution_calls: RefCell<Vec<String>>,
}

impl FakePipelineApi {
    pub fn new(stages: Vec<StageState>) -> Self {
        Self {
            stages,
            executions: HashMap::new(),
            state_calls: RefCell::new(0),
            execution_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_execution(mut self, execution: PipelineExecution) -> Self {
        self.executions
            .insert(execution.execution_id.clone(), execution);
        self
    }

    pub fn state_calls(&self) -> usize {
        *self.state_calls.borrow()
    }

    /// Execution ids passed to `fetch_pipeline_execution`, in call order.
    pub fn execution_calls(&self) -> Vec<String> {
        self.execution_calls.borrow().clone()
    }
}

impl PipelineApi for FakePipelineApi {
    async fn fetch_pipeline_state(&self, _pipeline: &str) -> Result<Vec<StageState>> {
        *self.state_calls.borrow_mut() += 1;
        Ok(self.stages.clone())
    }

    async fn fetch_pipeline_execution(
        &self,
        _pipeline: &str,
        execution_id: &str,
    ) -> Result<PipelineExecution> {
        self.execution_calls
            .borrow_mut()
            .push(execution_id.to_string());
        self.executions
            .get(execution_id)
            .cloned()
            .ok_or_else(|| not_found("GetPipelineExecution", execution_id))
    }
}

#[derive(Default)]
pub struct FakeArtifactStore {
    versions: HashMap<String, HashMap<String, String>>,
    calls: RefCell<Vec<(String, String, String)>>,
}

impl FakeArtifactStore {
    /// Register a version carrying `fields` as user metadata.
    pub fn with_version(mut self, version_id: &str, fields: &[(&str, &str)]) -> Self {
        let metadata = fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.versions.insert(version_id.to_string(), metadata);
        self
    }

    /// `(bucket, key, version_id)` triples passed to `fetch_object_metadata`.
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.borrow().clone()
    }
}

impl ArtifactStore for FakeArtifactStore {
    async fn fetch_object_metadata(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> Result<HashMap<String, String>> {
        self.calls.borrow_mut().push((
            bucket.to_string(),
            key.to_string(),
            version_id.to_string(),
        ));
        self.versions
            .get(version_id)
            .cloned()
            .ok_or_else(|| not_found("HeadObject", version_id))
    }
}
