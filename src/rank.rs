use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Rank marker: best / second-best positions in a row of cells
// ---------------------------------------------------------------------------

/// Positions holding the smallest value and the next distinct value above it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankMarks {
    pub best: BTreeSet<usize>,
    pub second: BTreeSet<usize>,
}

impl RankMarks {
    pub fn is_best(&self, idx: usize) -> bool {
        self.best.contains(&idx)
    }

    pub fn is_second(&self, idx: usize) -> bool {
        self.second.contains(&idx)
    }
}

/// Rank the finite cells of `values`, lower is better.
///
/// All cells tied at the minimum are best.  All cells holding the smallest
/// value strictly above the minimum are second.  Absent and non-finite cells
/// are never marked.
pub fn rank_row(values: &[Option<f64>]) -> RankMarks {
    let mut nums: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(idx, v)| v.filter(|x| x.is_finite()).map(|x| (idx, x)))
        .collect();
    if nums.is_empty() {
        return RankMarks::default();
    }
    nums.sort_by(|a, b| a.1.total_cmp(&b.1));

    let min = nums[0].1;
    let next = nums.iter().map(|&(_, v)| v).find(|&v| v > min);

    let best = nums.iter().filter(|&&(_, v)| v == min).map(|&(i, _)| i).collect();
    let second = match next {
        Some(next) => nums.iter().filter(|&&(_, v)| v == next).map(|&(i, _)| i).collect(),
        None => BTreeSet::new(),
    };
    RankMarks { best, second }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(v: &[usize]) -> BTreeSet<usize> {
        v.iter().copied().collect()
    }

    fn some(v: &[f64]) -> Vec<Option<f64>> {
        v.iter().copied().map(Some).collect()
    }

    #[test]
    fn distinct_values() {
        let marks = rank_row(&some(&[0.5, 0.6, 0.3, 0.9]));
        assert_eq!(marks.best, set(&[2]));
        assert_eq!(marks.second, set(&[0]));
    }

    #[test]
    fn all_tied_has_no_second() {
        let marks = rank_row(&some(&[1.0, 1.0]));
        assert_eq!(marks.best, set(&[0, 1]));
        assert!(marks.second.is_empty());
    }

    #[test]
    fn single_value_has_no_second() {
        let marks = rank_row(&[None, Some(0.4), None]);
        assert_eq!(marks.best, set(&[1]));
        assert!(marks.second.is_empty());
    }

    #[test]
    fn tied_minimum_still_finds_next_distinct_value() {
        let marks = rank_row(&some(&[0.2, 0.2, 0.7, 0.4, 0.4]));
        assert_eq!(marks.best, set(&[0, 1]));
        assert_eq!(marks.second, set(&[3, 4]));
    }

    #[test]
    fn absent_and_non_finite_are_ignored() {
        let marks = rank_row(&[None, Some(f64::NAN), Some(0.0), Some(f64::NEG_INFINITY), Some(0.1)]);
        assert_eq!(marks.best, set(&[2]));
        assert_eq!(marks.second, set(&[4]));
    }

    #[test]
    fn nothing_to_rank() {
        assert_eq!(rank_row(&[]), RankMarks::default());
        assert_eq!(rank_row(&[None, Some(f64::NAN)]), RankMarks::default());
    }

    #[test]
    fn marks_hold_min_and_next_min_over_sample_rows() {
        let rows: [&[f64]; 5] = [
            &[3.0, 1.0, 2.0],
            &[5.5, 5.5, 5.5, 4.0],
            &[-1.0, 0.0, -1.0, 7.0],
            &[9.0],
            &[0.25, 0.125, 0.125, 0.25, 1.0],
        ];
        for row in rows {
            let marks = rank_row(&some(row));
            let min = row.iter().copied().fold(f64::INFINITY, f64::min);
            assert!(!marks.best.is_empty());
            assert!(marks.best.iter().all(|&i| row[i] == min));

            let next = row.iter().copied().filter(|&v| v > min).fold(f64::INFINITY, f64::min);
            if next.is_finite() {
                assert!(!marks.second.is_empty());
                assert!(marks.second.iter().all(|&i| row[i] == next));
            } else {
                assert!(marks.second.is_empty());
            }
            assert!(marks.best.is_disjoint(&marks.second));
        }
    }
}
