use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_red, bright_yellow};

/// Progress tracking for the resolution phase
pub struct PhaseProgress {
    pb: ProgressBar,
}

impl PhaseProgress {
    pub fn start(pipeline: &str) -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        let pb = create_spinner(
            bright_yellow(format!("Fetching state of pipeline {pipeline}")).to_string(),
        );
        Self { pb }
    }

    pub fn resolving(&self, stage: &str, index: usize, total: usize) {
        self.pb.set_message(
            bright_yellow(format!("Resolving stage {index}/{total}: {stage}")).to_string(),
        );
    }

    pub fn finish(self, stages: usize) {
        self.pb.finish_with_message(
            bright_green(format!("Resolved {stages} stages ✓")).to_string(),
        );
        eprintln!();
    }

    /// Stops the spinner and leaves the last stage message visible.
    pub fn fail(self) {
        self.pb.abandon();
        eprintln!("  {}", bright_red("Resolution aborted ✗"));
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
