//! Pair-distance counts with a cutoff radius, for large populations.
//!
//! Used for sub-strand populations where a full distance matrix would not fit
//! in memory: every unordered pair is scanned with a running minimum that
//! starts at `radius + 1`, and only the bin counts are kept.

use rayon::prelude::*;

use crate::error::MeshError;
use crate::neighbor::distance::{PackedPoints, min_distance_capped};
use crate::neighbor::histogram::{Histogram, accumulate_cutoff, cutoff_counts};

pub fn cutoff_pair_histogram(
    sets: &[PackedPoints],
    radius: f64,
    bins: usize,
    parallel: bool,
) -> Result<Histogram, MeshError> {
    // Validates the settings and gives us an empty histogram to fill.
    let mut hist = cutoff_counts(std::iter::empty(), radius, bins)?;

    let n = sets.len();
    let cap = radius + 1.0;
    let row_counts = |mut acc: Vec<u64>, i: usize| -> Vec<u64> {
        log::trace!("cutoff row {i}/{n}");
        let row = ((i + 1)..n).map(|j| min_distance_capped(&sets[i], &sets[j], cap));
        accumulate_cutoff(&mut acc, row, radius);
        acc
    };

    let counts = if parallel {
        (0..n)
            .into_par_iter()
            .fold(|| vec![0u64; bins], row_counts)
            .reduce(|| vec![0u64; bins], |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            })
    } else {
        (0..n).fold(vec![0u64; bins], row_counts)
    };

    hist.counts = counts;
    Ok(hist)
}
