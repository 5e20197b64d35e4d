//! Formatted terminal output.
//!
//! Formatting lives in one place so the numeric code stays clean and output
//! changes are localized.

use std::path::{Path, PathBuf};

use crate::app::pipeline::{NeighborRun, StrandRun};
use crate::domain::{NeighborConfig, StrandConfig, StrandNeighborConfig};
use crate::neighbor::Histogram;
use crate::report::{DistanceStats, MeshStats, closest_curves};

/// Rows shown in the closest-curves table.
const TOP_CLOSEST: usize = 10;

pub fn format_mesh_summary(dir: &Path, files: &[(PathBuf, usize)], stats: &MeshStats) -> String {
    let mut out = String::new();

    out.push_str("=== cntmesh - fiber mesh summary ===\n");
    out.push_str(&format!("Mesh: {}\n", dir.display()));
    out.push_str(&format!("Files: {} | curves: {}\n", files.len(), stats.curves));
    for (path, n) in files {
        let name = path.file_name().map(|s| s.to_string_lossy()).unwrap_or_default();
        out.push_str(&format!("  {name:<20} {n:>6}\n"));
    }

    out.push_str(&format!(
        "Rough nodes per curve: [{}, {}] | fine nodes: {}\n",
        stats.rough_nodes_min, stats.rough_nodes_max, stats.fine_nodes
    ));
    if let Some(s) = &stats.arc_length {
        out.push_str(&format!("Arc length: {}\n", fmt_stats(s)));
    }

    out.push_str("\nInterpolation check (fine spacing):\n");
    match &stats.fine_spacing {
        Some(s) => {
            out.push_str(&format!("- pooled: {}\n", fmt_stats(s)));
            out.push_str(&format!("- max per-curve std/mean: {:.3e}\n", stats.fine_spacing_cv_max));
        }
        None => out.push_str("- (no curve has 2 fine points)\n"),
    }

    out.push_str("\nDrop order (mean y per curve):\n");
    if let (Some(first), Some(last)) = (stats.mean_y.first(), stats.mean_y.last()) {
        out.push_str(&format!("- first={first:.4} last={last:.4}\n"));
    }
    out.push_str(&format!(
        "- inversions: {} of {}\n",
        stats.drop_inversions,
        stats.mean_y.len().saturating_sub(1)
    ));

    out
}

pub fn format_neighbor_report(run: &NeighborRun, config: &NeighborConfig, loaded: usize) -> String {
    let mut out = String::new();

    out.push_str("=== cntmesh - nearest-neighbor distances ===\n");
    out.push_str(&format!(
        "Curves: {} of {loaded} | resolution: {} | parallel: {}\n",
        run.matrix.len(),
        config.resolution,
        config.parallel
    ));

    out.push_str(&format!("Pair distances: {}\n", fmt_opt_stats(run.pair_stats.as_ref())));
    out.push_str(&format!("Nearest neighbor: {}\n", fmt_opt_stats(run.nearest_stats.as_ref())));

    let closest = closest_curves(&run.nearest, TOP_CLOSEST);
    if !closest.is_empty() {
        out.push_str("\nClosest curves:\n");
        out.push_str(&format!("{:>8} {:>8} {:>12}\n", "curve", "nearest", "distance"));
        out.push_str(&format!("{:-<8} {:-<8} {:-<12}\n", "", "", ""));
        for (i, d) in closest {
            let j = run.nearest_index[i].map(|j| j.to_string()).unwrap_or_default();
            out.push_str(&format!("{i:>8} {j:>8} {d:>12.4}\n"));
        }
    }

    out.push('\n');
    out.push_str(&format_histogram_line(&run.histogram));
    out
}

pub fn format_strand_report(run: &StrandRun, config: &StrandConfig, written: &[PathBuf]) -> String {
    let mut out = String::new();

    out.push_str("=== cntmesh - single CNT expansion ===\n");
    out.push_str(&format!(
        "Fiber diameter: {} | cnt diameter: {} | cnts per fiber: {}\n",
        config.fiber_diameter,
        config.cnt_diameter,
        run.pattern.len()
    ));
    out.push_str(&format!(
        "Curves: {} | strands: {} | samples per strand: {}\n",
        run.curves,
        run.strands.total_strands(),
        run.strands.clouds().first().map_or(0, |c| c.samples())
    ));
    if run.flagged_curves > 0 {
        out.push_str(&format!(
            "Frame fallbacks on {} curve(s) (see log for details)\n",
            run.flagged_curves
        ));
    }
    if let Some(n) = config.transport.renormalize_every {
        out.push_str(&format!("Re-orthonormalized every {n} samples\n"));
    }

    if !written.is_empty() {
        out.push_str("\nWrote:\n");
        for path in written {
            out.push_str(&format!("- {}\n", path.display()));
        }
    }
    out
}

pub fn format_strand_neighbor_report(hist: &Histogram, strands: usize, config: &StrandNeighborConfig) -> String {
    let mut out = String::new();

    out.push_str("=== cntmesh - single CNT neighbor counts ===\n");
    out.push_str(&format!(
        "Strands: {strands} | cutoff radius: {} | bins: {}\n",
        config.radius, config.bins
    ));
    out.push_str(&format!("Pairs within cutoff: {}\n\n", hist.total()));

    out.push_str(&format!("{:>12} {:>10}\n", "distance", "count"));
    out.push_str(&format!("{:-<12} {:-<10}\n", "", ""));
    for (center, count) in hist.centers().into_iter().zip(&hist.counts) {
        out.push_str(&format!("{center:>12.4} {count:>10}\n"));
    }
    out
}

fn format_histogram_line(hist: &Histogram) -> String {
    let peak = hist
        .density
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .filter(|&(_, &d)| d > 0.0)
        .map(|(k, _)| k);

    let mut out = format!(
        "Histogram: {} bins over [{}, {}] | in range: {}",
        hist.bins(),
        hist.lo,
        hist.hi,
        hist.total()
    );
    if let Some(k) = peak {
        out.push_str(&format!(" | peak at {:.4}", hist.centers()[k]));
    }
    out.push('\n');
    out
}

fn fmt_stats(s: &DistanceStats) -> String {
    format!(
        "n={} min={:.4} max={:.4} mean={:.4} std={:.4}",
        s.count, s.min, s.max, s.mean, s.std
    )
}

fn fmt_opt_stats(s: Option<&DistanceStats>) -> String {
    s.map(fmt_stats).unwrap_or_else(|| "(none)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_line_reports_peak() {
        let hist = Histogram {
            lo: 0.0,
            hi: 2.0,
            counts: vec![1, 3],
            density: vec![0.25, 0.75],
        };
        assert_eq!(
            format_histogram_line(&hist),
            "Histogram: 2 bins over [0, 2] | in range: 4 | peak at 1.5000\n"
        );
    }

    #[test]
    fn stats_line() {
        let s = DistanceStats {
            count: 2,
            min: 1.0,
            max: 3.0,
            mean: 2.0,
            std: 1.0,
        };
        assert_eq!(fmt_stats(&s), "n=2 min=1.0000 max=3.0000 mean=2.0000 std=1.0000");
        assert_eq!(fmt_opt_stats(None), "(none)");
    }
}
