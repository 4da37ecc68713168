use log::info;

use crate::deployments::{DeploymentRecord, ReportAssembler};
use crate::error::Result;

use super::api::{ArtifactStore, PipelineApi};
use super::metadata::{ArtifactLocation, MetadataLookup};
use super::resolver::RevisionResolver;
use super::revision::Epoch;
use super::types::StageState;

/// CodePipeline deployment provider.
///
/// Cross-references a pipeline's stage states with its execution history and
/// the metadata of the versioned source artifact to tell which build every
/// stage is running.
pub struct CodePipelineProvider<'a, P, S> {
    api: &'a P,
    store: &'a S,
    pipeline: String,
    location: ArtifactLocation,
}

impl<'a, P: PipelineApi, S: ArtifactStore> CodePipelineProvider<'a, P, S> {
    pub fn new(api: &'a P, store: &'a S, pipeline: String, location: ArtifactLocation) -> Self {
        Self {
            api,
            store,
            pipeline,
            location,
        }
    }

    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    pub fn location(&self) -> &ArtifactLocation {
        &self.location
    }

    /// Resolve a deployment record for every stage, in pipeline order.
    ///
    /// `on_stage` is called with each stage and its position before the stage
    /// is resolved, so callers can report progress.
    ///
    /// # Errors
    ///
    /// Stops at the first failure and returns it; no partial record list is
    /// produced.
    pub async fn collect_deployments<F>(&self, mut on_stage: F) -> Result<Vec<DeploymentRecord>>
    where
        F: FnMut(&StageState, usize, usize),
    {
        info!("Fetching state of pipeline {}", self.pipeline);
        let stages = self.api.fetch_pipeline_state(&self.pipeline).await?;

        let epoch = Epoch::from_stages(&self.pipeline, &stages)?;
        info!(
            "Current epoch is execution {} across {} stages",
            epoch.execution_id,
            stages.len()
        );

        let resolver = RevisionResolver::new(self.api, &self.pipeline);
        let lookup = MetadataLookup::new(self.store, &self.location);
        let mut assembler = ReportAssembler::with_capacity(stages.len());

        for (index, stage) in stages.iter().enumerate() {
            on_stage(stage, index + 1, stages.len());

            let resolved = resolver.resolve(stage, &epoch).await?;
            let metadata = lookup.lookup(&stage.name, &resolved).await?;
            let record = assembler.push(stage, resolved, metadata);

            info!(
                "Stage {} runs version {} (execution {})",
                record.stage, record.version, record.execution_id
            );
        }

        Ok(assembler.finish())
    }
}
