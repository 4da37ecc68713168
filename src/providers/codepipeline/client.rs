use std::collections::HashMap;
use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_codepipeline::error::DisplayErrorContext;
use aws_sdk_codepipeline::types as pipeline_types;
use log::debug;

use crate::error::{Result, VerdeployedError};

use super::api::{ArtifactStore, PipelineApi};
use super::types::{ActionState, ArtifactRevision, PipelineExecution, StageState, StageStatus};

/// CodePipeline and S3 clients sharing one AWS configuration.
#[derive(Clone)]
pub struct AwsClients {
    codepipeline: aws_sdk_codepipeline::Client,
    s3: aws_sdk_s3::Client,
}

impl AwsClients {
    /// Load credentials from the environment and build both clients.
    ///
    /// `timeout` bounds every API operation. SDK retries are disabled; a
    /// failed call fails the report.
    pub async fn connect(region: &str, timeout: Duration) -> Self {
        debug!("Loading AWS configuration for region {region}");

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .timeout_config(TimeoutConfig::builder().operation_timeout(timeout).build())
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        Self {
            codepipeline: aws_sdk_codepipeline::Client::new(&config),
            s3: aws_sdk_s3::Client::new(&config),
        }
    }
}

fn transport_error<E: std::error::Error>(operation: &'static str, err: E) -> VerdeployedError {
    VerdeployedError::Transport {
        operation,
        message: DisplayErrorContext(err).to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(ToString::to_string)
}

fn convert_action(action: &pipeline_types::ActionState) -> ActionState {
    ActionState {
        entity_url: non_empty(action.entity_url()),
        current_revision: action
            .current_revision()
            .and_then(|revision| non_empty(Some(revision.revision_id()))),
    }
}

fn convert_stage(stage: &pipeline_types::StageState) -> StageState {
    let latest = stage.latest_execution();

    StageState {
        name: stage.stage_name().unwrap_or_default().to_string(),
        execution_id: latest.and_then(|execution| non_empty(Some(execution.pipeline_execution_id()))),
        status: latest
            .map(|execution| StageStatus::from(execution.status().as_str()))
            .unwrap_or_else(|| StageStatus::Unknown(String::new())),
        actions: stage.action_states().iter().map(convert_action).collect(),
    }
}

fn convert_execution(
    execution_id: &str,
    execution: &pipeline_types::PipelineExecution,
) -> PipelineExecution {
    PipelineExecution {
        execution_id: execution
            .pipeline_execution_id()
            .unwrap_or(execution_id)
            .to_string(),
        artifact_revisions: execution
            .artifact_revisions()
            .iter()
            .map(|revision| ArtifactRevision {
                revision_id: non_empty(revision.revision_id()),
                summary: non_empty(revision.revision_summary()),
            })
            .collect(),
    }
}

impl PipelineApi for AwsClients {
    async fn fetch_pipeline_state(&self, pipeline: &str) -> Result<Vec<StageState>> {
        let output = self
            .codepipeline
            .get_pipeline_state()
            .name(pipeline)
            .send()
            .await
            .map_err(|e| transport_error("GetPipelineState", e))?;

        Ok(output.stage_states().iter().map(convert_stage).collect())
    }

    async fn fetch_pipeline_execution(
        &self,
        pipeline: &str,
        execution_id: &str,
    ) -> Result<PipelineExecution> {
        let output = self
            .codepipeline
            .get_pipeline_execution()
            .pipeline_name(pipeline)
            .pipeline_execution_id(execution_id)
            .send()
            .await
            .map_err(|e| transport_error("GetPipelineExecution", e))?;

        let execution = output
            .pipeline_execution()
            .ok_or_else(|| VerdeployedError::EmptyExecution(execution_id.to_string()))?;

        Ok(convert_execution(execution_id, execution))
    }
}

impl ArtifactStore for AwsClients {
    async fn fetch_object_metadata(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> Result<HashMap<String, String>> {
        let output = self
            .s3
            .head_object()
            .bucket(bucket)
            .key(key)
            .version_id(version_id)
            .send()
            .await
            .map_err(|e| transport_error("HeadObject", e))?;

        Ok(output.metadata().cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdk_stage(name: &str, execution_id: &str, status: &str) -> pipeline_types::StageState {
        let execution = pipeline_types::StageExecution::builder()
            .pipeline_execution_id(execution_id)
            .status(pipeline_types::StageExecutionStatus::from(status))
            .build()
            .unwrap();
        let action = pipeline_types::ActionState::builder()
            .entity_url("https://console.aws.amazon.com/s3/home?region=us-east-1#")
            .current_revision(
                pipeline_types::ActionRevision::builder()
                    .revision_id("R1")
                    .revision_change_id("R1")
                    .created(aws_sdk_codepipeline::primitives::DateTime::from_secs(0))
                    .build()
                    .unwrap(),
            )
            .build();

        pipeline_types::StageState::builder()
            .stage_name(name)
            .latest_execution(execution)
            .action_states(action)
            .build()
    }

    #[test]
    fn test_convert_stage() {
        let stage = convert_stage(&sdk_stage("Source", "E1", "Succeeded"));

        assert_eq!(stage.name, "Source");
        assert_eq!(stage.execution_id.as_deref(), Some("E1"));
        assert_eq!(stage.status, StageStatus::Succeeded);
        assert_eq!(stage.actions.len(), 1);
        assert_eq!(stage.actions[0].current_revision.as_deref(), Some("R1"));
    }

    #[test]
    fn test_convert_stage_without_execution() {
        let sdk = pipeline_types::StageState::builder().stage_name("Deploy").build();
        let stage = convert_stage(&sdk);

        assert_eq!(stage.execution_id, None);
        assert_eq!(stage.status.to_string(), "Unknown");
        assert!(stage.actions.is_empty());
    }

    #[test]
    fn test_convert_execution_keeps_revision_order() {
        let sdk = pipeline_types::PipelineExecution::builder()
            .pipeline_execution_id("E0")
            .artifact_revisions(
                pipeline_types::ArtifactRevision::builder()
                    .revision_id("1a2b3c")
                    .revision_summary("Merge branch 'main'")
                    .build(),
            )
            .artifact_revisions(
                pipeline_types::ArtifactRevision::builder()
                    .revision_id("R0")
                    .revision_summary("Amazon S3 version id: R0")
                    .build(),
            )
            .build();

        let execution = convert_execution("E0", &sdk);

        assert_eq!(execution.execution_id, "E0");
        let ids: Vec<_> = execution
            .artifact_revisions
            .iter()
            .map(|r| r.revision_id.as_deref())
            .collect();
        assert_eq!(ids, vec![Some("1a2b3c"), Some("R0")]);
    }
}
