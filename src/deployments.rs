use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::providers::{
    ArtifactLocation, DeploymentMetadata, ResolvedRevision, RevisionOrigin, StageState,
    StageStatus,
};

/// What one stage is actually running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentRecord {
    pub stage: String,
    pub execution_id: String,
    pub status: StageStatus,
    pub revision_id: String,
    pub version: String,
    pub commit: String,
    pub origin: RevisionOrigin,
}

/// Point-in-time reconciliation of one pipeline.
#[derive(Debug, Serialize)]
pub struct DeploymentReport {
    pub pipeline: String,
    pub region: String,
    pub bucket: String,
    pub key: String,
    pub generated_at: DateTime<Utc>,
    pub records: Vec<DeploymentRecord>,
}

impl DeploymentReport {
    pub fn new(
        pipeline: String,
        region: String,
        location: &ArtifactLocation,
        records: Vec<DeploymentRecord>,
    ) -> Self {
        Self {
            pipeline,
            region,
            bucket: location.bucket.clone(),
            key: location.key.clone(),
            generated_at: Utc::now(),
            records,
        }
    }
}

/// Folds per-stage results into records, keeping snapshot order.
#[derive(Debug, Default)]
pub struct ReportAssembler {
    records: Vec<DeploymentRecord>,
}

impl ReportAssembler {
    pub fn with_capacity(stages: usize) -> Self {
        Self {
            records: Vec::with_capacity(stages),
        }
    }

    pub fn push(
        &mut self,
        stage: &StageState,
        resolved: ResolvedRevision,
        metadata: DeploymentMetadata,
    ) -> &DeploymentRecord {
        self.records.push(DeploymentRecord {
            stage: stage.name.clone(),
            execution_id: resolved.execution_id,
            status: stage.status.clone(),
            revision_id: resolved.revision_id.unwrap_or_default(),
            version: metadata.version,
            commit: metadata.commit,
            origin: resolved.origin,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn finish(self) -> Vec<DeploymentRecord> {
        self.records
    }
}
