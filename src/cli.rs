use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::config::{Config, OutputFormat, Overrides, Settings};
use crate::deployments::DeploymentReport;
use crate::output::{self, PhaseProgress};
use crate::providers::{ArtifactLocation, AwsClients, CodePipelineProvider};

#[derive(Parser)]
#[command(name = "verdeployed")]
#[command(
    author,
    version,
    about = "Report which source revision every CodePipeline stage has deployed",
    long_about = None
)]
pub struct Cli {
    /// CodePipeline pipeline name
    #[arg(short, long, env = "VERDEPLOYED_PIPELINE_NAME")]
    pipeline_name: Option<String>,

    /// Bucket holding the versioned source artifact
    #[arg(short, long, env = "VERDEPLOYED_BUCKET")]
    bucket: Option<String>,

    /// Object key of the source artifact [default: version.zip]
    #[arg(short, long, env = "VERDEPLOYED_KEY")]
    key: Option<String>,

    /// AWS region [default: us-east-1]
    #[arg(short, long, env = "VERDEPLOYED_REGION")]
    region: Option<String>,

    /// Timeout for each AWS call, e.g. 30s or 1m [default: 1m]
    #[arg(short, long, env = "VERDEPLOYED_TIMEOUT")]
    timeout: Option<String>,

    /// Config file (defaults to ./verdeployed.{toml,json,yaml,yml})
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            pipeline_name: self.pipeline_name.clone(),
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            key: self.key.clone(),
            timeout: self.timeout.clone(),
            format: self.format,
            pretty: self.pretty,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let settings = Config::load(self.config.as_deref())?.resolve(self.overrides())?;

        info!(
            "Checking deployments of pipeline {} against s3://{}/{}",
            settings.pipeline_name, settings.bucket, settings.key
        );

        let clients = AwsClients::connect(&settings.region, settings.timeout).await;
        let provider = CodePipelineProvider::new(
            &clients,
            &clients,
            settings.pipeline_name.clone(),
            ArtifactLocation::new(settings.bucket.clone(), settings.key.clone()),
        );

        let progress = PhaseProgress::start(provider.pipeline());
        let result = provider
            .collect_deployments(|stage, index, total| progress.resolving(&stage.name, index, total))
            .await;
        let records = match result {
            Ok(records) => records,
            Err(e) => {
                progress.fail();
                return Err(e.into());
            }
        };
        progress.finish(records.len());

        let report = DeploymentReport::new(
            settings.pipeline_name.clone(),
            settings.region.clone(),
            provider.location(),
            records,
        );

        self.write_report(&settings, &report)
    }

    fn write_report(&self, settings: &Settings, report: &DeploymentReport) -> Result<()> {
        let rendered = match settings.format {
            OutputFormat::Json if settings.pretty => serde_json::to_string_pretty(report)?,
            OutputFormat::Json => serde_json::to_string(report)?,
            OutputFormat::Table if self.output.is_some() => output::render_report(report, false),
            OutputFormat::Table => {
                output::print_report(report);
                return Ok(());
            }
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, rendered)?;
            info!("Report written to: {}", output_path.display());
        } else {
            println!("{rendered}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags_into_overrides() {
        let cli = Cli::try_parse_from([
            "verdeployed",
            "--pipeline-name",
            "checkout",
            "--bucket",
            "releases",
            "-r",
            "eu-west-1",
            "--format",
            "json",
            "--pretty",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.pipeline_name.as_deref(), Some("checkout"));
        assert_eq!(overrides.bucket.as_deref(), Some("releases"));
        assert_eq!(overrides.region.as_deref(), Some("eu-west-1"));
        assert_eq!(overrides.format, Some(OutputFormat::Json));
        assert!(overrides.pretty);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["verdeployed", "--format", "csv"]).is_err());
    }
}
