use crate::data::schema::NumericField;

// ---------------------------------------------------------------------------
// Metric table
// ---------------------------------------------------------------------------

/// Static display domain of one radar axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSpec {
    pub field: NumericField,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

/// Radar axes in display order. Bounds are fixed; they are never fitted to data.
pub const METRICS: [MetricSpec; 5] = [
    MetricSpec { field: NumericField::Moral, label: "德育", min: 12.0, max: 15.0 },
    MetricSpec { field: NumericField::Intellectual, label: "智育", min: 50.0, max: 100.0 },
    MetricSpec { field: NumericField::Fitness, label: "体测", min: 60.0, max: 120.0 },
    MetricSpec { field: NumericField::Bonus, label: "附加分", min: -1.0, max: 6.0 },
    MetricSpec { field: NumericField::Total, label: "总分", min: 50.0, max: 110.0 },
];

impl MetricSpec {
    pub fn normalize(&self, value: Option<f64>) -> f64 {
        normalize(value, self.min, self.max)
    }
}

/// Map `value` onto 0–100 within `[min, max]`, clamping outliers.
/// Missing values map to 0.
pub fn normalize(value: Option<f64>, min: f64, max: f64) -> f64 {
    let Some(v) = value.filter(|v| !v.is_nan()) else {
        return 0.0;
    };
    if max <= min {
        return if v >= max { 100.0 } else { 0.0 };
    }
    ((v - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_map_to_ends_of_scale() {
        for spec in METRICS {
            assert_eq!(spec.normalize(Some(spec.min)), 0.0);
            assert_eq!(spec.normalize(Some(spec.min - 10.0)), 0.0);
            assert_eq!(spec.normalize(Some(spec.max)), 100.0);
            assert_eq!(spec.normalize(Some(spec.max + 10.0)), 100.0);
        }
    }

    #[test]
    fn missing_is_zero() {
        assert_eq!(normalize(None, 50.0, 110.0), 0.0);
        assert_eq!(normalize(Some(f64::NAN), -1.0, 6.0), 0.0);
    }

    #[test]
    fn monotonic_between_bounds() {
        let mut previous = 0.0;
        for step in 0..=60 {
            let v = normalize(Some(50.0 + step as f64), 50.0, 110.0);
            assert!(v >= previous, "{v} < {previous} at step {step}");
            previous = v;
        }
        assert_eq!(normalize(Some(80.0), 50.0, 110.0), 50.0);
        assert_eq!(normalize(Some(2.5), -1.0, 6.0), 50.0);
    }

    #[test]
    fn degenerate_domain_is_a_step() {
        assert_eq!(normalize(Some(4.0), 5.0, 5.0), 0.0);
        assert_eq!(normalize(Some(5.0), 5.0, 5.0), 100.0);
    }
}
