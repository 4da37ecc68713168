mod progress;
mod report;
mod styling;
mod tables;

pub use progress::PhaseProgress;
pub use report::{print_report, render_report};
use styling::{dim, magenta_bold};

/// Prints the `verdeployed` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🚀 verdeployed"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Deployed revisions per pipeline stage")
    );
}
