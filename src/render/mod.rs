/// LaTeX emitters.  Every renderer is a pure function returning the whole
/// table as one string, one LaTeX statement per line, no trailing newline.
pub mod flat;
pub mod pivot;

use clap::ValueEnum;
use serde::Deserialize;

use crate::config::TableConfig;
use crate::data::model::ExperimentRow;

/// Row terminator shared by every tabular line.
pub(crate) const ROW_END: &str = " \\\\";

/// Which table shape to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// One line per input row.
    Flat,
    /// Pivot; highlighting follows `PivotOptions::highlight` (on by default).
    #[default]
    Pivot,
    /// Pivot with raw values and no highlighting.
    PivotPlain,
}

/// Render `rows` in the given layout with the options from `config`.
pub fn render(layout: Layout, rows: &[ExperimentRow], config: &TableConfig) -> String {
    match layout {
        Layout::Flat => flat::render_flat(rows, &config.flat),
        Layout::Pivot => pivot::render_pivot(rows, &config.pivot),
        Layout::PivotPlain => pivot::render_pivot_plain(rows, &config.pivot),
    }
}
