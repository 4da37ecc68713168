pub(crate) mod codepipeline;

pub use codepipeline::{
    ArtifactLocation, AwsClients, CodePipelineProvider, DeploymentMetadata, ResolvedRevision,
    RevisionOrigin, StageState, StageStatus,
};
