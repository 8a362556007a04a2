use std::ops::RangeInclusive;

use crate::config::DashboardConfig;

// ---------------------------------------------------------------------------
// Trend series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

/// Ordered per-period values. Periods without a value are left out, so the
/// series may be shorter than the full period set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    /// Keep the periods that have a value, in order.
    pub fn from_periods<'a>(periods: impl IntoIterator<Item = (&'a str, Option<f64>)>) -> Self {
        let points = periods
            .into_iter()
            .filter_map(|(label, value)| {
                value.map(|value| TrendPoint { label: label.to_string(), value })
            })
            .collect();
        TrendSeries { points }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// A fitted series with one projected period appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The series the line was fitted to (the input or the fallback).
    pub observed: TrendSeries,
    /// True when `observed` is the fallback series.
    pub placeholder: bool,
    /// Fitted line evaluated at each observed position.
    pub fitted: Vec<f64>,
    pub projected: TrendPoint,
    pub slope: f64,
}

impl Projection {
    /// Observed points followed by the projected one.
    pub fn points(&self) -> Vec<TrendPoint> {
        let mut points = self.observed.points.clone();
        points.push(self.projected.clone());
        points
    }
}

/// Fits a straight line to a per-period series and extends it one period.
#[derive(Debug, Clone)]
pub struct TrendProjector {
    fallback: TrendSeries,
    range: RangeInclusive<f64>,
}

impl TrendProjector {
    pub fn new(fallback: TrendSeries, range: RangeInclusive<f64>) -> Self {
        Self { fallback, range }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        let fallback = TrendSeries::from_periods(
            config
                .fallback_periods
                .iter()
                .map(String::as_str)
                .zip(config.fallback_gpa.iter().copied().map(Some)),
        );
        let [lo, hi] = config.gpa_range;
        Self::new(fallback, lo..=hi)
    }

    /// Project one period ahead. Series with fewer than two values are
    /// replaced by the fallback series.
    pub fn project(&self, series: &TrendSeries) -> Projection {
        if let Some(projection) = fit(series, &self.range) {
            return projection;
        }
        log::debug!(
            "Only {} grade point(s) present, projecting the fallback series",
            series.len()
        );
        let mut projection = fit(&self.fallback, &self.range)
            .unwrap_or_else(|| flat(&self.fallback));
        projection.placeholder = true;
        projection
    }
}

fn fit(series: &TrendSeries, range: &RangeInclusive<f64>) -> Option<Projection> {
    let values = series.values();
    if values.len() < 2 {
        return None;
    }

    let (slope, intercept) = linear_regression(&values);
    let fitted = (0..values.len())
        .map(|i| slope * i as f64 + intercept)
        .collect();

    let n = values.len();
    let next = (slope * n as f64 + intercept).clamp(*range.start(), *range.end());

    Some(Projection {
        observed: series.clone(),
        placeholder: false,
        fitted,
        projected: TrendPoint {
            label: format!("第{}学期(预测)", n + 1),
            value: next,
        },
        slope,
    })
}

/// Degenerate projection for a fallback that cannot be fitted either.
fn flat(series: &TrendSeries) -> Projection {
    let last = series.points.last().map(|p| p.value).unwrap_or(0.0);
    Projection {
        observed: series.clone(),
        placeholder: true,
        fitted: series.values(),
        projected: TrendPoint {
            label: format!("第{}学期(预测)", series.len() + 1),
            value: last,
        },
        slope: 0.0,
    }
}

/// Least-squares fit of y = slope·x + intercept over x = 0, 1, ….
fn linear_regression(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;

    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        numerator += (x - mean_x) * (y - mean_y);
        denominator += (x - mean_x).powi(2);
    }

    let slope = if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    };

    (slope, mean_y - slope * mean_x)
}
