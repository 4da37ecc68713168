mod api;
mod client;
#[cfg(test)]
pub(crate) mod fake;
mod metadata;
mod provider;
mod resolver;
mod revision;
mod types;

pub use client::AwsClients;
pub use metadata::{ArtifactLocation, DeploymentMetadata};
pub use provider::CodePipelineProvider;
pub use resolver::{ResolvedRevision, RevisionOrigin};
pub use types::{StageState, StageStatus};
