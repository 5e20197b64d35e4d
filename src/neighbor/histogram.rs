//! Histograms of pair distances.
//!
//! Binning follows numpy's `histogram` conventions: `bins` equal-width bins
//! over `[lo, hi]`, half-open except the last which includes `hi`; values
//! outside the range (and NaNs) are dropped. Densities are normalized so that
//! `Σ density_k · width = 1` over the in-range values.

use serde::Serialize;

use crate::error::MeshError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub lo: f64,
    pub hi: f64,
    pub counts: Vec<u64>,
    pub density: Vec<f64>,
}

impl Histogram {
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn width(&self) -> f64 {
        (self.hi - self.lo) / self.bins() as f64
    }

    /// `bins + 1` bin edges.
    pub fn edges(&self) -> Vec<f64> {
        let w = self.width();
        (0..=self.bins()).map(|k| self.lo + w * k as f64).collect()
    }

    /// Bin midpoints.
    pub fn centers(&self) -> Vec<f64> {
        let edges = self.edges();
        edges.windows(2).map(|e| 0.5 * (e[0] + e[1])).collect()
    }

    /// Number of values that landed in range.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

fn validate(bins: usize, lo: f64, hi: f64) -> Result<(), MeshError> {
    if bins == 0 {
        return Err(MeshError::InvalidConfig("histogram bin count must be > 0".to_string()));
    }
    if !(lo.is_finite() && hi.is_finite() && hi > lo) {
        return Err(MeshError::InvalidConfig(format!(
            "histogram range must be finite with max > min (got {lo}..{hi})"
        )));
    }
    Ok(())
}

/// Density histogram of `values` over `[lo, hi]`.
///
/// If no value falls in range, all densities are zero.
pub fn density_histogram(
    values: impl IntoIterator<Item = f64>,
    bins: usize,
    lo: f64,
    hi: f64,
) -> Result<Histogram, MeshError> {
    validate(bins, lo, hi)?;

    let span = hi - lo;
    let width = span / bins as f64;
    let edge = |k: usize| lo + width * k as f64;
    let mut counts = vec![0u64; bins];
    for v in values {
        if !(v >= lo && v <= hi) {
            continue;
        }
        let mut idx = ((((v - lo) / span) * bins as f64) as usize).min(bins - 1);
        // Rounding in the scaled index can disagree with the reported edges.
        if v < edge(idx) {
            idx -= 1;
        } else if idx != bins - 1 && v >= edge(idx + 1) {
            idx += 1;
        }
        counts[idx] += 1;
    }

    let total: u64 = counts.iter().sum();
    let density = if total == 0 {
        log::warn!("No distances fall inside histogram range [{lo}, {hi}].");
        vec![0.0; bins]
    } else {
        counts
            .iter()
            .map(|&c| c as f64 / (total as f64 * width))
            .collect()
    };

    Ok(Histogram {
        lo,
        hi,
        counts,
        density,
    })
}

/// Raw counts in `bins` bins of width `radius / bins` starting at 0.
///
/// A value `d` lands in bin `floor(d / width)`; values at or beyond `radius`
/// are not counted. Densities are left empty.
pub fn cutoff_counts(
    values: impl IntoIterator<Item = f64>,
    radius: f64,
    bins: usize,
) -> Result<Histogram, MeshError> {
    validate(bins, 0.0, radius)?;
    let mut counts = vec![0u64; bins];
    accumulate_cutoff(&mut counts, values, radius);
    Ok(Histogram {
        lo: 0.0,
        hi: radius,
        counts,
        density: Vec::new(),
    })
}

/// Add `values` into existing cutoff `counts` (same binning as [`cutoff_counts`]).
pub fn accumulate_cutoff(counts: &mut [u64], values: impl IntoIterator<Item = f64>, radius: f64) {
    let bins = counts.len();
    if bins == 0 {
        return;
    }
    let width = radius / bins as f64;
    for d in values {
        if !(d >= 0.0) {
            continue;
        }
        let idx = (d / width) as usize;
        if idx < bins {
            counts[idx] += 1;
        }
    }
}
