use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::providers::{RevisionOrigin, StageStatus};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn status_cell(status: &StageStatus) -> Cell {
    let cell = Cell::new(status.to_string());
    match status {
        StageStatus::Succeeded => cell.fg(TableColor::Green),
        StageStatus::InProgress => cell.fg(TableColor::Yellow),
        StageStatus::Failed | StageStatus::Stopped => cell.fg(TableColor::Red),
        StageStatus::Superseded | StageStatus::Unknown(_) => cell.fg(TableColor::DarkGrey),
    }
}

/// Versions inherited from the current epoch are shown bold.
pub fn version_cell(version: &str, origin: RevisionOrigin) -> Cell {
    let cell = Cell::new(version);
    match origin {
        RevisionOrigin::CurrentEpoch => cell.add_attribute(comfy_table::Attribute::Bold),
        RevisionOrigin::Historical => cell,
    }
}
