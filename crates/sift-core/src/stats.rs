//! Response-time statistics.

use serde::{Deserialize, Serialize};

/// Descriptive statistics over the measured response times of a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimeStats {
    /// Number of measured samples
    pub count: u64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Arithmetic mean
    pub average: f64,
    /// Middle value; mean of the two middle values for even counts
    pub median: f64,
}

impl ResponseTimeStats {
    /// Summarizes the strictly positive values in `samples`.
    ///
    /// Zero, negative and non-finite values mean "not measured" and are
    /// excluded. Returns `None` if nothing remains.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mut measured: Vec<f64> = samples
            .iter()
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();
        measured.sort_by(f64::total_cmp);

        let median = median(&measured)?;
        let min = measured[0];
        let max = measured[measured.len() - 1];
        let sum: f64 = measured.iter().sum();

        Some(Self {
            count: measured.len() as u64,
            min,
            max,
            average: sum / measured.len() as f64,
            median,
        })
    }
}

/// Median of an already sorted slice, or `None` if it is empty.
#[must_use]
pub fn median(sorted: &[f64]) -> Option<f64> {
    let len = sorted.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    if len % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
