use lazy_regex::regex;
use log::{debug, warn};

use crate::error::{Result, VerdeployedError};

use super::types::{ActionState, PipelineExecution, StageState};

/// The pipeline's most recent run, as seen from the Source stage.
///
/// Computed once per report and handed to every per-stage decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Epoch {
    /// Latest execution id of the Source stage
    pub execution_id: String,
    /// Revision the Source stage's S3 action currently points at
    pub live_revision: Option<String>,
}

impl Epoch {
    /// Derive the current epoch from a pipeline state snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if no stage is named `Source` or if the Source stage
    /// has no latest execution id. Neither case allows classifying stages.
    pub fn from_stages(pipeline: &str, stages: &[StageState]) -> Result<Self> {
        let source = stages
            .iter()
            .find(|stage| stage.is_source())
            .ok_or_else(|| VerdeployedError::MissingSourceStage(pipeline.to_string()))?;

        let execution_id = current_execution_id(source)?.to_string();
        let live_revision = live_revision(&source.actions).map(ToString::to_string);

        match &live_revision {
            Some(revision) => debug!("Epoch {execution_id} is on revision {revision}"),
            None => warn!(
                "No Source action matched the S3 console URL pattern; stages in execution {execution_id} have no revision"
            ),
        }

        Ok(Self {
            execution_id,
            live_revision,
        })
    }

    pub fn contains(&self, execution_id: &str) -> bool {
        self.execution_id == execution_id
    }
}

/// Latest execution id of a stage.
pub fn current_execution_id(stage: &StageState) -> Result<&str> {
    stage
        .execution_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| VerdeployedError::MissingExecutionId(stage.name.clone()))
}

/// Whether `url` is a region-qualified S3 console link.
pub fn is_s3_console_url(url: &str) -> bool {
    regex!(r"https://.*aws\.amazon\.com/s3/home\?region=[a-zA-Z]{2,3}-[a-zA-Z]+-[0-9]+#").is_match(url)
}

/// Revision of the first action whose entity URL is an S3 console link.
///
/// Only the first matching action is considered, even if it carries no
/// current revision.
pub fn live_revision(actions: &[ActionState]) -> Option<&str> {
    actions
        .iter()
        .find(|action| action.entity_url.as_deref().is_some_and(is_s3_console_url))
        .and_then(|action| action.current_revision.as_deref())
        .filter(|revision| !revision.is_empty())
}

/// Parse the S3 version id out of an artifact revision summary.
///
/// Grammar (the prefix may appear anywhere in the summary):
///
/// ```text
/// summary := prefix ws? value
/// prefix  := "Amazon S3 version id:"
/// value   := one or more non-whitespace characters
/// ```
pub fn revision_from_summary(summary: &str) -> Option<&str> {
    regex!(r"Amazon S3 version id:\s*(\S+)")
        .captures(summary)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str())
}

/// Revision id of the first S3 artifact revision recorded by an execution.
///
/// The revision's own id is preferred; the id embedded in the summary is used
/// when CodePipeline omitted it.
pub fn historical_revision(execution: &PipelineExecution) -> Option<&str> {
    execution.artifact_revisions.iter().find_map(|revision| {
        let embedded = revision.summary.as_deref().and_then(revision_from_summary)?;
        Some(
            revision
                .revision_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .unwrap_or(embedded),
        )
    })
}
