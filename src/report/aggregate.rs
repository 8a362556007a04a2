use crate::data::model::{Cohort, StudentRecord};
use crate::data::schema::NumericField;

// ---------------------------------------------------------------------------
// Column statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean of the numeric entries of one column; 0 when there are none.
pub fn mean(cohort: &Cohort, field: NumericField) -> f64 {
    mean_of(cohort.values(field)).unwrap_or(0.0)
}

/// Mean of the present values, `None` if nothing is present.
pub fn mean_of(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Number of records satisfying `predicate`.
pub fn count_where(cohort: &Cohort, predicate: impl Fn(&StudentRecord) -> bool) -> usize {
    cohort.records.iter().filter(|r| predicate(*r)).count()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bucket {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub buckets: Vec<Bucket>,
    pub bin_width: f64,
}

impl Histogram {
    /// Tallest bucket, for scaling annotations.
    pub fn max_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Equal-width buckets spanning the observed range. The last bucket is
/// closed so the maximum is counted. Returns `None` for no values.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    // One distinct value: a single unit-wide bucket around it.
    if (max - min).abs() < f64::EPSILON || bins <= 1 {
        let (start, end) = if (max - min).abs() < f64::EPSILON {
            (min - 0.5, min + 0.5)
        } else {
            (min, max)
        };
        return Some(Histogram {
            buckets: vec![Bucket { start, end, count: values.len() }],
            bin_width: end - start,
        });
    }

    let width = (max - min) / bins as f64;
    let mut buckets: Vec<Bucket> = (0..bins)
        .map(|i| Bucket {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for &v in values {
        let i = (((v - min) / width) as usize).min(bins - 1);
        buckets[i].count += 1;
    }

    Some(Histogram { buckets, bin_width: width })
}

// ---------------------------------------------------------------------------
// Cohort headline numbers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortSummary {
    pub total: usize,
    pub needs_assistance: usize,
    pub award_holders: usize,
}

impl CohortSummary {
    pub fn from_cohort(cohort: &Cohort) -> Self {
        CohortSummary {
            total: cohort.len(),
            needs_assistance: count_where(cohort, StudentRecord::needs_assistance),
            award_holders: count_where(cohort, StudentRecord::has_scholarship_or_grant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, RawTable};
    use pretty_assertions::assert_eq;

    fn cohort_with(column: &str, cells: Vec<CellValue>) -> Cohort {
        let rows = cells.into_iter().map(|c| vec![c]).collect();
        Cohort::from_table(RawTable::new(vec![column.to_string()], rows))
    }

    #[test]
    fn mean_ignores_non_numeric_entries() {
        let cohort = cohort_with(
            "智育",
            vec![
                CellValue::Float(80.0),
                CellValue::Text("缺考".into()),
                CellValue::Null,
                CellValue::Text("90".into()),
            ],
        );
        assert_eq!(mean(&cohort, NumericField::Intellectual), 85.0);
    }

    #[test]
    fn mean_of_entirely_non_numeric_column_is_zero() {
        let cohort = cohort_with(
            "智育",
            vec![CellValue::Text("优".into()), CellValue::Text("良".into())],
        );
        assert_eq!(mean(&cohort, NumericField::Intellectual), 0.0);
        assert_eq!(mean(&cohort, NumericField::Total), 0.0);
    }

    #[test]
    fn counts_matching_records() {
        let cohort = cohort_with(
            "有无需要学院协助解决的困难",
            vec![
                CellValue::Text("无".into()),
                CellValue::Text("学业困难".into()),
                CellValue::Null,
                CellValue::Text("家庭经济困难".into()),
            ],
        );
        assert_eq!(count_where(&cohort, StudentRecord::needs_assistance), 2);
        assert_eq!(CohortSummary::from_cohort(&cohort).total, 4);
    }

    #[test]
    fn summary_counts_zero_and_false_as_needing_help() {
        let cohort = cohort_with(
            "有无需要学院协助解决的困难",
            vec![
                CellValue::Integer(0),
                CellValue::Bool(false),
                CellValue::Text("无".into()),
            ],
        );
        assert_eq!(CohortSummary::from_cohort(&cohort).needs_assistance, 2);
    }

    #[test]
    fn histogram_buckets_every_value() {
        let values = [60.0, 70.0, 75.0, 80.0, 85.0, 90.0, 100.0];
        let h = histogram(&values, 4).unwrap();
        assert_eq!(h.buckets.len(), 4);
        assert_eq!(h.bin_width, 10.0);
        assert_eq!(
            h.buckets.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![1, 2, 2, 2]
        );
        assert_eq!(h.buckets.iter().map(|b| b.count).sum::<usize>(), values.len());
    }

    #[test]
    fn histogram_of_single_value() {
        let h = histogram(&[85.0, 85.0], 20).unwrap();
        assert_eq!(h.buckets, vec![Bucket { start: 84.5, end: 85.5, count: 2 }]);
        assert!(histogram(&[], 20).is_none());
    }
}
