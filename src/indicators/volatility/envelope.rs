//! Gaussian kernel regression used as the envelope center

use std::sync::Arc;

use crate::common::math;

pub const KERNEL_BANDWIDTH: f64 = 8.0;
pub const KERNEL_SIZE: usize = 500;

/// Nadaraya-Watson style estimator over the most recent closes.
///
/// Weights are relative to the newest bar, so the sum is rebuilt every bar.
/// The table is computed once and shared read-only between clones.
#[derive(Debug, Clone)]
pub struct KernelEstimator {
    bandwidth: f64,
    weights: Arc<[f64]>,
}

impl KernelEstimator {
    pub fn new(bandwidth: f64, size: usize) -> Self {
        let weights: Arc<[f64]> = (0..size)
            .map(|i| math::gaussian_weight(i, bandwidth))
            .collect();
        Self { bandwidth, weights }
    }

    /// Weighted average of `closes` given newest first.
    ///
    /// Only the first `weights.len()` closes are used, normalized by the
    /// weights actually consumed. Returns `None` for an empty input.
    pub fn estimate<I>(&self, closes: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut weighted = 0.0;
        let mut total = 0.0;
        let mut used = 0usize;
        for (close, weight) in closes.into_iter().zip(self.weights.iter()) {
            weighted += close * weight;
            total += weight;
            used += 1;
        }
        if used == 0 {
            return None;
        }
        Some(weighted / total.max(1e-12))
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

impl Default for KernelEstimator {
    fn default() -> Self {
        Self::new(KERNEL_BANDWIDTH, KERNEL_SIZE)
    }
}
