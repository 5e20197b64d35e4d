//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid, deterministic output (golden tests).
//!
//! Plot elements:
//! - histogram density at bin centers: `o`, joined by `-`
//! - per-curve nearest-neighbor distance: `o`

use crate::neighbor::Histogram;

/// Density of a histogram over its configured range.
pub fn render_histogram_plot(hist: &Histogram, width: usize, height: usize) -> String {
    let points: Vec<(f64, f64)> = hist
        .centers()
        .into_iter()
        .zip(hist.density.iter().copied())
        .collect();
    let y_max = points.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    render_plot(
        &points,
        true,
        (hist.lo, hist.hi),
        (0.0, y_max),
        ("distance", "density"),
        width,
        height,
    )
}

/// Nearest-neighbor distance against curve index; curves without a neighbor are skipped.
pub fn render_nearest_plot(nearest: &[Option<f64>], width: usize, height: usize) -> String {
    let points: Vec<(f64, f64)> = nearest
        .iter()
        .enumerate()
        .filter_map(|(i, d)| d.map(|d| (i as f64, d)))
        .collect();
    let x_max = (nearest.len().max(2) - 1) as f64;
    let (y_min, y_max) = y_range(&points).unwrap_or((0.0, 1.0));

    render_plot(
        &points,
        false,
        (0.0, x_max),
        (y_min, y_max),
        ("curve", "nearest"),
        width,
        height,
    )
}

fn render_plot(
    points: &[(f64, f64)],
    connect: bool,
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
    (x_label, y_label): (&str, &str),
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let cells: Vec<(usize, usize)> = points
        .iter()
        .map(|&(x, y)| (map_x(x, x_min, x_max, width), map_y(y, y_min, y_max, height)))
        .collect();

    // Lines first so markers overlay them.
    if connect {
        for w in cells.windows(2) {
            draw_line(&mut grid, w[0], w[1], '-');
        }
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {x_label}=[{x_min:.3}, {x_max:.3}] | {y_label}=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn y_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        Some((min_y - 0.5, min_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], (x0, y0): (usize, usize), (x1, y1): (usize, usize), ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
