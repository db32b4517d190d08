use serde::Deserialize;

use super::ROW_END;
use crate::data::decimal::to_fixed3;
use crate::data::filter::apply_order;
use crate::data::model::{ExperimentRow, PivotRecord};
use crate::pivot::build_pivot;
use crate::rank::{RankMarks, rank_row};

/// Preamble defining the highlight macros used by the highlighted variant.
const HIGHLIGHT_PREAMBLE: [&str; 4] = [
    "% LaTeX command definitions",
    "\\newcommand{\\bestresult}[1]{{\\textbf{\\textcolor{red}{#1}}}}",
    "\\newcommand{\\secondresult}[1]{{\\underline{\\textcolor{blue}{#1}}}}",
    "",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PivotOptions {
    /// Omitted from the output when empty.
    pub caption: Option<String>,
    pub label: String,
    /// Wrap the tabular in `\resizebox{\columnwidth}{!}{...}`.
    pub resize_to_column: bool,
    pub model_order: Option<Vec<String>>,
    pub dataset_order: Option<Vec<String>>,
    /// Mark best/second-best cells per row and print numbers with 3 decimals.
    pub highlight: bool,
}

impl Default for PivotOptions {
    fn default() -> Self {
        Self {
            caption: None,
            label: "tab:results-pivot".to_string(),
            resize_to_column: false,
            model_order: None,
            dataset_order: None,
            highlight: true,
        }
    }
}

pub fn render_pivot_plain(rows: &[ExperimentRow], opts: &PivotOptions) -> String {
    render_pivot(rows, &PivotOptions { highlight: false, ..opts.clone() })
}

/// Pivot table: a `Models`/`Metrics` header pair, then for every dataset its
/// output-length rows plus the `avg` row under one `\multirow` label, with a
/// `\midrule` between datasets.
pub fn render_pivot(rows: &[ExperimentRow], opts: &PivotOptions) -> String {
    let pivot = build_pivot(rows);
    let models = apply_order(&pivot.models, opts.model_order.as_deref());
    let datasets = apply_order(&pivot.datasets, opts.dataset_order.as_deref());

    let mut lines: Vec<String> = Vec::new();
    if opts.highlight {
        lines.extend(HIGHLIGHT_PREAMBLE.iter().map(|s| s.to_string()));
    }

    lines.push("\\begin{table}[]".into());
    lines.push("\\centering".into());
    if let Some(caption) = opts.caption.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("\\caption{{{caption}}}"));
    }
    lines.push(format!("\\label{{{}}}", opts.label));
    if opts.resize_to_column {
        lines.push("\\resizebox{\\columnwidth}{!}{%".into());
    }

    let col_spec = if opts.highlight {
        format!("cc{}", "|cc".repeat(models.len()))
    } else {
        "c".repeat(2 + models.len() * 2)
    };
    lines.push(format!("\\begin{{tabular}}{{{col_spec}}}"));
    lines.push("\\toprule".into());

    let mut header_models = vec!["\\multicolumn{2}{c}{Models}".to_string()];
    header_models.extend(models.iter().map(|m| format!("\\multicolumn{{2}}{{c}}{{{m}}}")));
    lines.push(format!("{}{ROW_END}", header_models.join(" & ")));

    let mut header_metrics = vec!["\\multicolumn{2}{c}{Metrics}".to_string()];
    for _ in &models {
        header_metrics.push("MSE".into());
        header_metrics.push("MAE".into());
    }
    lines.push(format!("{}{ROW_END}", header_metrics.join(" & ")));

    for (dataset_idx, dataset) in datasets.iter().enumerate() {
        if dataset_idx > 0 {
            lines.push("\\midrule".into());
        }
        // detail rows plus the avg row
        let row_span = pivot
            .output_lens_by_dataset
            .get(dataset)
            .map_or(0, Vec::len)
            + 1;
        for (i, rec) in pivot.records_for(dataset).enumerate() {
            let left = if i == 0 {
                format!("\\multirow{{{row_span}}}{{*}}{{{dataset}}} & {}", rec.output_len)
            } else {
                format!(" & {}", rec.output_len)
            };
            let cells = format_cells(rec, &models, opts.highlight);
            lines.push(format!("{left} & {}{ROW_END}", cells.join(" & ")));
        }
    }

    lines.push("\\bottomrule".into());
    lines.push("\\end{tabular}".into());
    if opts.resize_to_column {
        lines.push("}%".into());
    }
    lines.push("\\end{table}".into());
    lines.join("\n")
}

/// Cells of one record in `models` order, MSE then MAE per model.
fn format_cells(rec: &PivotRecord, models: &[String], highlight: bool) -> Vec<String> {
    let values: Vec<Option<f64>> = models
        .iter()
        .flat_map(|m| {
            let pair = rec.metric(m);
            [pair.mse, pair.mae]
        })
        .collect();
    let marks = if highlight {
        rank_row(&values)
    } else {
        RankMarks::default()
    };

    values
        .iter()
        .enumerate()
        .map(|(idx, v)| match v {
            None => String::new(),
            Some(v) if !highlight => v.to_string(),
            Some(v) if marks.is_best(idx) => format!("\\bestresult{{{}}}", to_fixed3(*v)),
            Some(v) if marks.is_second(idx) => format!("\\secondresult{{{}}}", to_fixed3(*v)),
            Some(v) => to_fixed3(*v),
        })
        .collect()
}
