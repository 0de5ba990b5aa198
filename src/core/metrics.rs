//! Elapsed-time samples for the two landing stages.

use serde::Serialize;

/// Arithmetic mean of `samples`, or `0.0` when there are none.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Append-only sequence of elapsed times in seconds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageSamples {
    samples: Vec<f64>,
}

impl StageSamples {
    /// Append one measurement.
    pub fn record(&mut self, secs: f64) {
        self.samples.push(secs);
    }

    /// Number of measurements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean in seconds; `0.0` when empty.
    #[must_use]
    pub fn mean(&self) -> f64 {
        mean(&self.samples)
    }

    /// Smallest measurement.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::min)
    }

    /// Largest measurement.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }

    /// Raw measurements in recording order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }
}

/// Samples for both stages of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageMetrics {
    /// Time from connecting to the tower until the runway stage finished.
    pub connect_to_landed: StageSamples,
    /// Time spent in the gate stage, from gate entry to departure.
    pub landed_to_departed: StageSamples,
}
