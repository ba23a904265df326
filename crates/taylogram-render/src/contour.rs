//! Iso-line extraction for the RMS background: a nice-step level locator
//! plus marching squares over a uniform scalar grid.
//!
//! The grid is sampled in (theta, radius) data space; callers project the
//! resulting polylines into screen space.

use crate::model::Point;
use std::collections::HashMap;
use taylogram_core::geom::point;

/// A uniformly sampled scalar field over `[x0, x1] x [y0, y1]`.
/// `values[ix][iy]`, `n + 1` samples per axis.
pub struct ScalarGrid {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub values: Vec<Vec<f64>>,
}

impl ScalarGrid {
    /// Samples `f(x, y)` on an `(n + 1) x (n + 1)` lattice.
    pub fn sample(x0: f64, x1: f64, y0: f64, y1: f64, n: usize, f: impl Fn(f64, f64) -> f64) -> Self {
        let n = n.max(2);
        let values = (0..=n)
            .map(|ix| {
                let x = x0 + (x1 - x0) * ix as f64 / n as f64;
                (0..=n)
                    .map(|iy| {
                        let y = y0 + (y1 - y0) * iy as f64 / n as f64;
                        f(x, y)
                    })
                    .collect()
            })
            .collect();
        Self {
            x0,
            x1,
            y0,
            y1,
            values,
        }
    }

    pub fn min_max(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for col in &self.values {
            for &v in col {
                if v.is_finite() {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }
        (min, max)
    }

    fn x_at(&self, ix: f64) -> f64 {
        let n = (self.values.len() - 1) as f64;
        self.x0 + (self.x1 - self.x0) * ix / n
    }

    fn y_at(&self, iy: f64) -> f64 {
        let n = (self.values[0].len() - 1) as f64;
        self.y0 + (self.y1 - self.y0) * iy / n
    }
}

/// Rounds a raw step up to a "nice" one (1/2/2.5/5 times a power of ten).
fn nice_step(raw: f64) -> f64 {
    if !(raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let factor = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 2.5 {
        2.5
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Evenly spaced round values covering `[min, max]`, endpoints included
/// when they land on the step. Target count is advisory.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(max > min) {
        return Vec::new();
    }
    let step = nice_step((max - min) / target.max(1) as f64);
    let mut ticks = Vec::new();
    let mut v = (min / step).ceil() * step;
    // Guard against drift putting the first tick just below min.
    if v < min {
        v += step;
    }
    while v <= max + step * 1e-9 {
        ticks.push((v / step).round() * step);
        v += step;
    }
    ticks
}

/// Contour levels strictly inside the field range, matplotlib-style: the
/// nice ticks over `[min, max]` with the endpoints dropped.
pub fn nice_levels(min: f64, max: f64, target: usize) -> Vec<f64> {
    let eps = (max - min).abs() * 1e-9;
    nice_ticks(min, max, target + 1)
        .into_iter()
        .filter(|v| *v > min + eps && *v < max - eps)
        .collect()
}

fn interp(a: f64, b: f64, level: f64) -> f64 {
    let d = b - a;
    if d.abs() < f64::EPSILON {
        0.5
    } else {
        ((level - a) / d).clamp(0.0, 1.0)
    }
}

/// Extracts the iso-lines of `grid` at `level` as chained polylines in data
/// coordinates.
pub fn extract_iso_lines(grid: &ScalarGrid, level: f64) -> Vec<Vec<Point>> {
    let nx = grid.values.len() - 1;
    let ny = grid.values[0].len() - 1;
    let mut segments: Vec<(Point, Point)> = Vec::new();

    for ix in 0..nx {
        for iy in 0..ny {
            let v00 = grid.values[ix][iy];
            let v10 = grid.values[ix + 1][iy];
            let v11 = grid.values[ix + 1][iy + 1];
            let v01 = grid.values[ix][iy + 1];

            let mut case = 0u8;
            if v00 > level {
                case |= 1;
            }
            if v10 > level {
                case |= 2;
            }
            if v11 > level {
                case |= 4;
            }
            if v01 > level {
                case |= 8;
            }
            if case == 0 || case == 15 {
                continue;
            }

            let fx = ix as f64;
            let fy = iy as f64;
            // Crossing points on the four cell edges, in lattice units.
            let bottom = point(fx + interp(v00, v10, level), fy);
            let right = point(fx + 1.0, fy + interp(v10, v11, level));
            let top = point(fx + interp(v01, v11, level), fy + 1.0);
            let left = point(fx, fy + interp(v00, v01, level));

            let mut push = |a: Point, b: Point| {
                segments.push((
                    point(grid.x_at(a.x), grid.y_at(a.y)),
                    point(grid.x_at(b.x), grid.y_at(b.y)),
                ));
            };

            match case {
                1 | 14 => push(left, bottom),
                2 | 13 => push(bottom, right),
                3 | 12 => push(left, right),
                4 | 11 => push(right, top),
                6 | 9 => push(bottom, top),
                7 | 8 => push(left, top),
                5 | 10 => {
                    // Saddle: disambiguate with the cell center.
                    let center = (v00 + v10 + v11 + v01) / 4.0;
                    let flip = (center > level) == (case == 5);
                    if flip {
                        push(left, top);
                        push(bottom, right);
                    } else {
                        push(left, bottom);
                        push(right, top);
                    }
                }
                _ => unreachable!(),
            }
        }
    }

    chain_segments(segments)
}

fn key(p: Point, scale: f64) -> (i64, i64) {
    ((p.x * scale).round() as i64, (p.y * scale).round() as i64)
}

/// Joins raw marching-squares segments into polylines by walking shared
/// endpoints.
fn chain_segments(segments: Vec<(Point, Point)>) -> Vec<Vec<Point>> {
    // Quantization fine enough that distinct crossings never merge.
    let scale = 1e7;
    let mut adjacency: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, (a, b)) in segments.iter().enumerate() {
        adjacency.entry(key(*a, scale)).or_default().push(i);
        adjacency.entry(key(*b, scale)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut lines = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (a, b) = segments[start];
        let mut line = vec![a, b];

        // Extend forward from the tail, then backward from the head.
        for _pass in 0..2 {
            loop {
                let Some(&tail) = line.last() else { break };
                let Some(candidates) = adjacency.get(&key(tail, scale)) else {
                    break;
                };
                let next = candidates.iter().copied().find(|&i| !used[i]);
                let Some(i) = next else { break };
                used[i] = true;
                let (a, b) = segments[i];
                if key(a, scale) == key(tail, scale) {
                    line.push(b);
                } else {
                    line.push(a);
                }
            }
            line.reverse();
        }
        lines.push(line);
    }
    lines
}
