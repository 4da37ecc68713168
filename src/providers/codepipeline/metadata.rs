use std::collections::HashMap;

use log::debug;

use crate::error::{Result, VerdeployedError};

use super::api::ArtifactStore;
use super::resolver::ResolvedRevision;

pub const VERSION_FIELD: &str = "Version";
pub const COMMIT_FIELD: &str = "Commit";

/// Versioned S3 object whose metadata describes each deployable build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub bucket: String,
    pub key: String,
}

impl ArtifactLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Build metadata recorded on one artifact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentMetadata {
    pub version: String,
    pub commit: String,
}

/// Maps revision ids to deployment metadata via object versions.
pub struct MetadataLookup<'a, S> {
    store: &'a S,
    location: &'a ArtifactLocation,
}

impl<'a, S: ArtifactStore> MetadataLookup<'a, S> {
    pub fn new(store: &'a S, location: &'a ArtifactLocation) -> Self {
        Self { store, location }
    }

    /// Look up the metadata for the revision resolved for `stage`.
    ///
    /// # Errors
    ///
    /// - `ResolutionMiss` if no revision id was resolved for the stage
    /// - `Transport` if the object version cannot be read
    /// - `MetadataMissing` if `Version` or `Commit` is absent
    pub async fn lookup(
        &self,
        stage: &str,
        resolved: &ResolvedRevision,
    ) -> Result<DeploymentMetadata> {
        let Some(version_id) = resolved.revision_id.as_deref().filter(|id| !id.is_empty()) else {
            return Err(VerdeployedError::ResolutionMiss {
                stage: stage.to_string(),
                execution_id: resolved.execution_id.clone(),
            });
        };

        self.lookup_version(version_id).await
    }

    pub async fn lookup_version(&self, version_id: &str) -> Result<DeploymentMetadata> {
        debug!(
            "Reading metadata of s3://{}/{} at version {version_id}",
            self.location.bucket, self.location.key
        );

        let metadata = self
            .store
            .fetch_object_metadata(&self.location.bucket, &self.location.key, version_id)
            .await?;

        Ok(DeploymentMetadata {
            version: self.required_field(&metadata, version_id, VERSION_FIELD)?,
            commit: self.required_field(&metadata, version_id, COMMIT_FIELD)?,
        })
    }

    fn required_field(
        &self,
        metadata: &HashMap<String, String>,
        version_id: &str,
        field: &'static str,
    ) -> Result<String> {
        metadata_field(metadata, field)
            .map(ToString::to_string)
            .ok_or_else(|| VerdeployedError::MetadataMissing {
                bucket: self.location.bucket.clone(),
                key: self.location.key.clone(),
                version_id: version_id.to_string(),
                field,
            })
    }
}

/// Case-insensitive lookup; S3 returns user metadata keys lowercased.
fn metadata_field<'m>(metadata: &'m HashMap<String, String>, field: &str) -> Option<&'m str> {
    metadata
        .get(field)
        .or_else(|| {
            metadata
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(field))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::codepipeline::fake::FakeArtifactStore;
    use crate::providers::codepipeline::resolver::RevisionOrigin;

    fn resolved(revision_id: Option<&str>) -> ResolvedRevision {
        ResolvedRevision {
            execution_id: "E1".to_string(),
            revision_id: revision_id.map(ToString::to_string),
            origin: RevisionOrigin::CurrentEpoch,
        }
    }

    fn location() -> ArtifactLocation {
        ArtifactLocation::new("releases", "version.zip")
    }

    #[tokio::test]
    async fn test_lookup_reads_version_and_commit() {
        let store = FakeArtifactStore::default()
            .with_version("R1", &[("Version", "2.3.0"), ("Commit", "abc123")]);
        let location = location();
        let lookup = MetadataLookup::new(&store, &location);

        let metadata = lookup.lookup("Deploy", &resolved(Some("R1"))).await.unwrap();

        assert_eq!(metadata.version, "2.3.0");
        assert_eq!(metadata.commit, "abc123");
        assert_eq!(
            store.calls(),
            vec![(
                "releases".to_string(),
                "version.zip".to_string(),
                "R1".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_lookup_accepts_lowercased_keys() {
        let store = FakeArtifactStore::default()
            .with_version("R1", &[("version", "2.3.0"), ("commit", "abc123")]);
        let location = location();
        let lookup = MetadataLookup::new(&store, &location);

        let metadata = lookup.lookup_version("R1").await.unwrap();

        assert_eq!(metadata.version, "2.3.0");
        assert_eq!(metadata.commit, "abc123");
    }

    #[tokio::test]
    async fn test_lookup_without_revision_is_resolution_miss() {
        let store = FakeArtifactStore::default();
        let location = location();
        let lookup = MetadataLookup::new(&store, &location);

        let err = lookup.lookup("Deploy", &resolved(None)).await.unwrap_err();

        assert!(matches!(
            err,
            VerdeployedError::ResolutionMiss { ref stage, ref execution_id }
                if stage == "Deploy" && execution_id == "E1"
        ));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_missing_commit_names_field() {
        let store = FakeArtifactStore::default().with_version("R1", &[("Version", "2.3.0")]);
        let location = location();
        let lookup = MetadataLookup::new(&store, &location);

        let err = lookup.lookup_version("R1").await.unwrap_err();

        assert!(matches!(
            err,
            VerdeployedError::MetadataMissing { field: COMMIT_FIELD, .. }
        ));
        assert!(err.to_string().contains("'Commit'"));
    }

    #[tokio::test]
    async fn test_lookup_unknown_version_is_transport_error() {
        let store = FakeArtifactStore::default();
        let location = location();
        let lookup = MetadataLookup::new(&store, &location);

        let err = lookup.lookup_version("R404").await.unwrap_err();

        assert!(matches!(err, VerdeployedError::Transport { operation: "HeadObject", .. }));
    }
}
