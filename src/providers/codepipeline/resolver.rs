use log::{debug, warn};
use serde::Serialize;

use crate::error::Result;

use super::api::PipelineApi;
use super::revision::{current_execution_id, historical_revision, Epoch};
use super::types::StageState;

/// Where a stage's revision id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevisionOrigin {
    /// Stage ran in the current epoch and inherits the Source action's revision
    CurrentEpoch,
    /// Stage last ran in an older execution whose history was queried
    Historical,
}

/// Revision resolved for a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRevision {
    pub execution_id: String,
    /// `None` when no action or artifact revision matched the S3 patterns
    pub revision_id: Option<String>,
    pub origin: RevisionOrigin,
}

/// Resolves the revision each stage is running.
///
/// Stages in the current epoch reuse the Source stage's live revision without
/// any remote call. Every other stage costs exactly one
/// `GetPipelineExecution` for its own execution id.
pub struct RevisionResolver<'a, P> {
    api: &'a P,
    pipeline: &'a str,
}

impl<'a, P: PipelineApi> RevisionResolver<'a, P> {
    pub fn new(api: &'a P, pipeline: &'a str) -> Self {
        Self { api, pipeline }
    }

    /// Resolve the revision of `stage` relative to `epoch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage has no execution id or if fetching a past
    /// execution fails.
    pub async fn resolve(&self, stage: &StageState, epoch: &Epoch) -> Result<ResolvedRevision> {
        let execution_id = current_execution_id(stage)?;

        if epoch.contains(execution_id) {
            debug!("Stage {} is in the current epoch {execution_id}", stage.name);
            return Ok(ResolvedRevision {
                execution_id: execution_id.to_string(),
                revision_id: epoch.live_revision.clone(),
                origin: RevisionOrigin::CurrentEpoch,
            });
        }

        debug!(
            "Stage {} last ran in execution {execution_id}, querying its history",
            stage.name
        );
        let revision_id = self.historical_revision(execution_id).await?;

        Ok(ResolvedRevision {
            execution_id: execution_id.to_string(),
            revision_id,
            origin: RevisionOrigin::Historical,
        })
    }

    /// Fetch a past execution and return the S3 revision it consumed.
    pub async fn historical_revision(&self, execution_id: &str) -> Result<Option<String>> {
        let execution = self
            .api
            .fetch_pipeline_execution(self.pipeline, execution_id)
            .await?;

        let revision = historical_revision(&execution).map(ToString::to_string);
        if revision.is_none() {
            warn!("Execution {execution_id} recorded no Amazon S3 artifact revision");
        }

        Ok(revision)
    }
}
