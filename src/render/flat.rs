use serde::Deserialize;

use super::ROW_END;
use crate::data::loader::COLUMNS;
use crate::data::model::ExperimentRow;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlatOptions {
    pub caption: String,
    pub label: String,
}

impl Default for FlatOptions {
    fn default() -> Self {
        Self {
            caption: "Experiment results".to_string(),
            label: "tab:exp-results".to_string(),
        }
    }
}

/// Index (0 = output_len, 1 = mse, 2 = mae) of the smallest and the
/// second-smallest numeric field.  Ties keep column order.
fn row_min_second(row: &ExperimentRow) -> (usize, usize) {
    let mut entries = [(0, row.output_len), (1, row.mse), (2, row.mae)];
    entries.sort_by(|a, b| a.1.total_cmp(&b.1));
    (entries[0].0, entries[1].0)
}

/// One line per row, in input order, with the row's smallest numeric field
/// in bold and the second-smallest underlined.
pub fn render_flat(rows: &[ExperimentRow], opts: &FlatOptions) -> String {
    let mut lines: Vec<String> = vec![
        "\\begin{table}[ht]".into(),
        "\\centering".into(),
        "\\begin{tabular}{l l r r r}".into(),
        "\\toprule".into(),
        format!("{}{ROW_END}", COLUMNS.join(" & ")),
        "\\midrule".into(),
    ];

    for row in rows {
        let (min_idx, second_idx) = row_min_second(row);
        let fmt = |idx: usize, val: f64| {
            if idx == min_idx {
                format!("\\textbf{{{val}}}")
            } else if idx == second_idx {
                format!("\\underline{{{val}}}")
            } else {
                val.to_string()
            }
        };
        lines.push(format!(
            "{} & {} & {} & {} & {}{ROW_END}",
            row.model,
            row.dataset,
            fmt(0, row.output_len),
            fmt(1, row.mse),
            fmt(2, row.mae),
        ));
    }

    lines.push("\\bottomrule".into());
    lines.push("\\end{tabular}".into());
    lines.push(format!("\\caption{{{}}}", opts.caption));
    lines.push(format!("\\label{{{}}}", opts.label));
    lines.push("\\end{table}".into());
    lines.join("\n")
}
