/// Aggregated confidence statistics for one row
///
/// All four metrics are absent together when no token carried a confidence
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfidenceStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

impl ConfidenceStats {
    /// Compute min/max/mean/median over the present values
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut min = values[0];
        let mut max = values[0];
        let mut sum = 0.0;
        for &value in values {
            if value < min {
                min = value;
            }
            if value > max {
                max = value;
            }
            sum += value;
        }

        Self {
            min: Some(min),
            max: Some(max),
            mean: Some(sum / values.len() as f64),
            median: Some(median(values)),
        }
    }

    /// Extract present confidence values from an iterator and aggregate them
    pub fn from_confidences(values: impl Iterator<Item = Option<f64>>) -> Self {
        let present: Vec<f64> = values.flatten().collect();
        Self::from_values(&present)
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_none()
    }
}

/// Median with the exact tie-break downstream output parity depends on:
/// odd count takes the middle order statistic, even count averages the two
/// middle ones (no interpolation).
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}
