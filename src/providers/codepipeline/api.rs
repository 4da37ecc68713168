use std::collections::HashMap;

use crate::error::Result;

use super::types::{PipelineExecution, StageState};

/// Read access to CodePipeline state and execution history.
#[allow(async_fn_in_trait)]
pub trait PipelineApi {
    /// Fetch the current state of every stage, in pipeline order.
    async fn fetch_pipeline_state(&self, pipeline: &str) -> Result<Vec<StageState>>;

    /// Fetch one specific execution of the pipeline.
    async fn fetch_pipeline_execution(
        &self,
        pipeline: &str,
        execution_id: &str,
    ) -> Result<PipelineExecution>;
}

/// Read access to user metadata attached to versioned artifacts.
#[allow(async_fn_in_trait)]
pub trait ArtifactStore {
    async fn fetch_object_metadata(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> Result<HashMap<String, String>>;
}
