use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::data::decimal::round3;
use crate::data::model::{ExperimentRow, MetricPair, OutputLen, PivotRecord, PivotResult};

// ---------------------------------------------------------------------------
// Pivot builder: flat rows → dataset × output_len × model
// ---------------------------------------------------------------------------

/// Group flat rows into one record per (dataset, output_len) with a column
/// pair per model, followed by one `avg` record per dataset.
///
/// If several rows share a (dataset, output_len, model) key the last one
/// fills the detail cell, while every one of them counts towards the average.
pub fn build_pivot(rows: &[ExperimentRow]) -> PivotResult {
    let models: Vec<String> = rows
        .iter()
        .map(|r| r.model.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let datasets: Vec<String> = rows
        .iter()
        .map(|r| r.dataset.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut output_lens_by_dataset: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for d in &datasets {
        let mut lens: Vec<f64> = rows
            .iter()
            .filter(|r| &r.dataset == d)
            .map(|r| r.output_len)
            .collect();
        lens.sort_by(|a, b| a.total_cmp(b));
        lens.dedup();
        output_lens_by_dataset.insert(d.clone(), lens);
    }

    let mut lookup: HashMap<(&str, u64, &str), &ExperimentRow> = HashMap::with_capacity(rows.len());
    for r in rows {
        lookup.insert((r.dataset.as_str(), len_key(r.output_len), r.model.as_str()), r);
    }

    let mut records = Vec::new();
    for d in &datasets {
        let lens = output_lens_by_dataset.get(d).map(Vec::as_slice).unwrap_or_default();
        for &ol in lens {
            let metrics = models
                .iter()
                .map(|m| {
                    let pair = lookup
                        .get(&(d.as_str(), len_key(ol), m.as_str()))
                        .map(|r| MetricPair::from_row(r))
                        .unwrap_or_default();
                    (m.clone(), pair)
                })
                .collect();
            records.push(PivotRecord {
                dataset: d.clone(),
                output_len: OutputLen::Len(ol),
                metrics,
            });
        }

        let metrics = models
            .iter()
            .map(|m| {
                let group: Vec<&ExperimentRow> = rows
                    .iter()
                    .filter(|r| &r.dataset == d && &r.model == m)
                    .collect();
                let pair = MetricPair {
                    mse: mean(group.iter().map(|r| r.mse)),
                    mae: mean(group.iter().map(|r| r.mae)),
                };
                (m.clone(), pair)
            })
            .collect();
        records.push(PivotRecord {
            dataset: d.clone(),
            output_len: OutputLen::Avg,
            metrics,
        });
    }

    PivotResult {
        models,
        datasets,
        output_lens_by_dataset,
        records,
    }
}

/// Hash key for an output length; `0.0` and `-0.0` share a key.
fn len_key(v: f64) -> u64 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

/// Mean of the finite values rounded to 3 decimals, `None` if there are none.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let nums: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    if nums.is_empty() {
        return None;
    }
    let avg = nums.iter().sum::<f64>() / nums.len() as f64;
    Some(round3(avg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(model: &str, dataset: &str, ol: f64, mse: f64, mae: f64) -> ExperimentRow {
        ExperimentRow::new(model, dataset, ol, mse, mae).unwrap()
    }

    fn pair(mse: f64, mae: f64) -> MetricPair {
        MetricPair {
            mse: Some(mse),
            mae: Some(mae),
        }
    }

    #[test]
    fn two_models_single_length() {
        let rows = vec![row("A", "D1", 96.0, 0.5, 0.6), row("B", "D1", 96.0, 0.3, 0.9)];
        let p = build_pivot(&rows);

        assert_eq!(p.models, vec!["A", "B"]);
        assert_eq!(p.datasets, vec!["D1"]);
        assert_eq!(p.records.len(), 2);

        let detail = &p.records[0];
        assert_eq!(detail.output_len, OutputLen::Len(96.0));
        assert_eq!(detail.metric("A"), pair(0.5, 0.6));
        assert_eq!(detail.metric("B"), pair(0.3, 0.9));

        let avg = &p.records[1];
        assert_eq!(avg.output_len, OutputLen::Avg);
        assert_eq!(avg.metric("A"), pair(0.5, 0.6));
        assert_eq!(avg.metric("B"), pair(0.3, 0.9));
    }

    #[test]
    fn names_and_lengths_are_sorted_and_unique() {
        let rows = vec![
            row("B", "D2", 720.0, 1.0, 1.0),
            row("A", "D2", 96.0, 1.0, 1.0),
            row("B", "D1", 336.0, 1.0, 1.0),
            row("A", "D2", 720.0, 1.0, 1.0),
            row("C", "D2", 96.0, 1.0, 1.0),
            row("A", "D1", 192.0, 1.0, 1.0),
        ];
        let p = build_pivot(&rows);
        assert_eq!(p.models, vec!["A", "B", "C"]);
        assert_eq!(p.datasets, vec!["D1", "D2"]);
        assert_eq!(p.output_lens_by_dataset["D1"], vec![192.0, 336.0]);
        assert_eq!(p.output_lens_by_dataset["D2"], vec![96.0, 720.0]);
        for lens in p.output_lens_by_dataset.values() {
            assert!(lens.windows(2).all(|w| w[0] < w[1]));
        }

        let keys: Vec<(String, OutputLen)> = p
            .records
            .iter()
            .map(|r| (r.dataset.clone(), r.output_len))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("D1".to_string(), OutputLen::Len(192.0)),
                ("D1".to_string(), OutputLen::Len(336.0)),
                ("D1".to_string(), OutputLen::Avg),
                ("D2".to_string(), OutputLen::Len(96.0)),
                ("D2".to_string(), OutputLen::Len(720.0)),
                ("D2".to_string(), OutputLen::Avg),
            ]
        );
    }

    #[test]
    fn missing_model_is_absent_everywhere() {
        let rows = vec![
            row("A", "D1", 96.0, 0.5, 0.6),
            row("C", "D2", 96.0, 0.1, 0.2),
        ];
        let p = build_pivot(&rows);
        for rec in p.records_for("D1") {
            assert_eq!(rec.metric("C"), MetricPair::default());
            assert!(rec.metrics.contains_key("C"));
        }
    }

    #[test]
    fn average_rounds_to_three_decimals() {
        let rows = vec![
            row("A", "D1", 96.0, 0.1, 0.2),
            row("A", "D1", 192.0, 0.2, 0.3),
            row("A", "D1", 336.0, 0.2, 0.3),
        ];
        let p = build_pivot(&rows);
        let avg = p.records_for("D1").last().unwrap();
        assert_eq!(avg.output_len, OutputLen::Avg);
        assert_eq!(avg.metric("A"), pair(0.167, 0.267));
    }

    #[test]
    fn average_rounds_exact_binary_value() {
        let rows = vec![
            row("A", "D1", 96.0, 1.0005, 1.2345),
            row("A", "D1", 192.0, 1.0005, 1.2345),
            row("B", "D1", 96.0, 1.234, 0.0625),
            row("B", "D1", 192.0, 1.235, 0.0625),
        ];
        let p = build_pivot(&rows);
        let avg = p.records_for("D1").last().unwrap();
        // 1.0005 and 1.2345 are stored just below the halfway point.
        assert_eq!(avg.metric("A"), pair(1.0, 1.234));
        // (1.234 + 1.235) / 2 evaluates to 1.2345000000000002; 0.0625 is an
        // exact tie and rounds up.
        assert_eq!(avg.metric("B"), pair(1.235, 0.063));
    }

    #[test]
    fn partial_model_coverage_averages_what_exists() {
        let rows = vec![
            row("A", "D1", 96.0, 1.0, 2.0),
            row("A", "D1", 192.0, 3.0, 4.0),
            row("B", "D1", 96.0, 5.0, 6.0),
        ];
        let p = build_pivot(&rows);
        let recs: Vec<&PivotRecord> = p.records_for("D1").collect();
        assert_eq!(recs[1].metric("B"), MetricPair::default());
        assert_eq!(recs[2].metric("A"), pair(2.0, 3.0));
        assert_eq!(recs[2].metric("B"), pair(5.0, 6.0));
    }

    #[test]
    fn empty_input_gives_empty_pivot() {
        assert_eq!(build_pivot(&[]), PivotResult::default());
    }
}
