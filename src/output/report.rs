use std::fmt::Write;

use comfy_table::Cell;

use crate::deployments::DeploymentReport;

use super::styling::{bright, dim};
use super::tables::{create_table, cyan_header, status_cell, version_cell};

const COLUMNS: [&str; 5] = ["Stage", "Status", "Version", "Commit", "ExecutionID"];

/// Prints the deployment table for a report to stdout.
///
/// One row per stage in pipeline order. Status is color coded (green
/// succeeded, yellow in progress, red failed or stopped) and versions inherited
/// from the current execution are shown bold.
pub fn print_report(report: &DeploymentReport) {
    println!("{}", render_report(report, true));
}

/// Renders the report. With `styled` false no terminal escapes are written,
/// which is what file output wants.
pub fn render_report(report: &DeploymentReport, styled: bool) -> String {
    let mut output = String::new();

    let title = format!("Pipeline {} ({})", report.pipeline, report.region);
    let source = format!("Artifact s3://{}/{}", report.bucket, report.key);
    if styled {
        let _ = writeln!(output, "{} {}", bright("📦"), bright(title).underlined());
        let _ = writeln!(output, "{}", dim(source));
    } else {
        let _ = writeln!(output, "{title}");
        let _ = writeln!(output, "{source}");
    }

    let mut table = create_table();
    if !styled {
        table.force_no_tty();
    }
    table.set_header(cyan_header(&COLUMNS));

    for record in &report.records {
        table.add_row(vec![
            Cell::new(&record.stage),
            status_cell(&record.status),
            version_cell(&record.version, record.origin),
            Cell::new(&record.commit),
            Cell::new(&record.execution_id),
        ]);
    }

    let _ = write!(output, "{table}");
    output
}
