use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CANDIDATES: [&str; 4] = [
    "verdeployed.toml",
    "verdeployed.json",
    "verdeployed.yaml",
    "verdeployed.yml",
];

/// Configuration file structure for verdeployed.
///
/// Every value can also be given on the command line or through the
/// `VERDEPLOYED_*` environment variables, which take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Pipeline to inspect
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Versioned artifact carrying build metadata
    #[serde(default)]
    pub artifact: ArtifactConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// CodePipeline pipeline name
    pub name: Option<String>,

    /// AWS region hosting the pipeline and the artifact bucket
    #[serde(default = "default_region")]
    pub region: String,

    /// Timeout applied to every AWS API call (e.g. "30s", "1m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArtifactConfig {
    /// Bucket holding the versioned source artifact
    pub bucket: Option<String>,

    /// Object key of the source artifact
    #[serde(default = "default_key")]
    pub key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: None,
            region: default_region(),
            timeout: default_timeout(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            key: default_key(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_timeout() -> String {
    "1m".to_string()
}

fn default_key() -> String {
    "version.zip".to_string()
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub pipeline_name: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub timeout: Option<String>,
    pub format: Option<OutputFormat>,
    pub pretty: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub pipeline_name: String,
    pub region: String,
    pub bucket: String,
    pub key: String,
    pub timeout: Duration,
    pub format: OutputFormat,
    pub pretty: bool,
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (must exist)
    /// 2. ./verdeployed.toml, ./verdeployed.json, ./verdeployed.yaml, ./verdeployed.yml
    /// 3. `<user config dir>/verdeployed/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let discovered = Self::discover(Path::new(".")).or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("verdeployed").join("config.toml"))
                .filter(|path| path.exists())
        });

        match discovered {
            Some(path) => {
                log::debug!("Using config file {}", path.display());
                Self::load_from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// First candidate config file present in `dir`.
    fn discover(dir: &Path) -> Option<PathBuf> {
        CANDIDATES
            .iter()
            .map(|candidate| dir.join(candidate))
            .find(|path| path.exists())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Merge command-line overrides over the file values and validate.
    pub fn resolve(self, overrides: Overrides) -> Result<Settings> {
        let pipeline_name = overrides
            .pipeline_name
            .or(self.pipeline.name)
            .filter(|name| !name.trim().is_empty())
            .context("A pipeline name is required (--pipeline-name or VERDEPLOYED_PIPELINE_NAME)")?;

        let bucket = overrides
            .bucket
            .or(self.artifact.bucket)
            .filter(|bucket| !bucket.trim().is_empty())
            .context("An artifact bucket is required (--bucket or VERDEPLOYED_BUCKET)")?;

        let key = overrides.key.unwrap_or(self.artifact.key);
        if key.is_empty() {
            bail!("The artifact key cannot be empty");
        }

        let timeout = overrides.timeout.unwrap_or(self.pipeline.timeout);
        let timeout = parse_timeout(&timeout)
            .with_context(|| format!("Invalid timeout: '{timeout}'"))?;

        Ok(Settings {
            pipeline_name,
            region: overrides.region.unwrap_or(self.pipeline.region),
            bucket,
            key,
            timeout,
            format: overrides.format.unwrap_or(self.output.format),
            pretty: overrides.pretty || self.output.pretty,
        })
    }
}

/// Parse a timeout such as "90", "30s", "1m", "1m30s" or "2h".
///
/// A bare number is read as seconds.
pub fn parse_timeout(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        bail!("timeout cannot be empty");
    }

    if let Ok(seconds) = input.parse::<u64>() {
        return non_zero(Duration::from_secs(seconds));
    }

    let mut total: u64 = 0;
    let mut digits = String::new();

    for c in input.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let multiplier = match c {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            other => bail!("unknown unit '{other}' (expected s, m or h)"),
        };
        if digits.is_empty() {
            bail!("unit '{c}' must follow a number");
        }

        let value: u64 = digits.parse()?;
        total = total.saturating_add(value.saturating_mul(multiplier));
        digits.clear();
    }

    if !digits.is_empty() {
        bail!("trailing number '{digits}' has no unit");
    }

    non_zero(Duration::from_secs(total))
}

fn non_zero(duration: Duration) -> Result<Duration> {
    if duration.is_zero() {
        bail!("timeout must be greater than zero");
    }
    Ok(duration)
}
