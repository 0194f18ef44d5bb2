//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks of a fit in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Series drawn by `render_time_plot`, in priority order:
//! - reference opt time: `-`
//! - simplified opt time: `*`
//! - reference max time: `=`
//! - simplified max time: `+`

use crate::domain::{
    CandidateParameters, OriginalConstants, SimpleConstants, TimeModelInput, validate_clock,
};
use crate::error::AppError;
use crate::models::{original_time, simple_time};

/// What to plot and how large.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotSpec {
    pub time_ms: f64,
    pub increment_ms: f64,
    pub max_ply: u32,
    pub width: usize,
    pub height: usize,
}

impl PlotSpec {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_clock(self.time_ms, self.increment_ms)
    }
}

/// One polyline on the chart.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub label: &'static str,
    pub glyph: char,
    pub points: Vec<(f64, f64)>,
}

/// Plot both formulas over `0..=max_ply` at a fixed clock.
pub fn render_time_plot(
    params: &CandidateParameters,
    original: &OriginalConstants,
    simple: &SimpleConstants,
    spec: &PlotSpec,
) -> String {
    let max_ply = spec.max_ply.max(1);
    let mut orig_opt = Vec::with_capacity(max_ply as usize + 1);
    let mut simp_opt = Vec::with_capacity(max_ply as usize + 1);
    let mut orig_max = Vec::with_capacity(max_ply as usize + 1);
    let mut simp_max = Vec::with_capacity(max_ply as usize + 1);

    for ply in 0..=max_ply {
        let input = TimeModelInput::new(spec.time_ms, spec.increment_ms, ply);
        let o = original_time(original, &input);
        let s = simple_time(params, simple, &input);
        let x = ply as f64;
        orig_opt.push((x, o.opt_time));
        simp_opt.push((x, s.opt_time));
        orig_max.push((x, o.max_time));
        simp_max.push((x, s.max_time));
    }

    let series = [
        PlotSeries {
            label: "orig opt",
            glyph: '-',
            points: orig_opt,
        },
        PlotSeries {
            label: "simp opt",
            glyph: '*',
            points: simp_opt,
        },
        PlotSeries {
            label: "orig max",
            glyph: '=',
            points: orig_max,
        },
        PlotSeries {
            label: "simp max",
            glyph: '+',
            points: simp_max,
        },
    ];

    let mut out = format!(
        "Time={}s, Inc={}ms | {}\n",
        spec.time_ms / 1000.0,
        spec.increment_ms,
        legend(&series)
    );
    out.push_str(&render_plot(&series, 0.0, max_ply as f64, spec.width, spec.height));
    out
}

fn legend(series: &[PlotSeries]) -> String {
    series
        .iter()
        .map(|s| format!("{} {}", s.glyph, s.label))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Render series onto a fixed grid. Earlier series win overlapping cells.
pub fn render_plot(
    series: &[PlotSeries],
    x_min: f64,
    x_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(series).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for s in series {
        draw_curve(&mut grid, &s.points, s.glyph, x_min, x_max, y_min, y_max);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: ply=[{x_min:.0}, {x_max:.0}] | time=[{y_min:.1}, {y_max:.1}]ms\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn y_range(series: &[PlotSeries]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in series.iter().flat_map(|s| s.points.iter()) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
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
    let span = (x_max - x_min).max(1e-12);
    let u = ((x - x_min) / span).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    glyph: char,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if curve.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let xx = map_x(x, x_min, x_max, width);
        let yy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, xx, yy, glyph),
            None if grid[yy][xx] == ' ' => grid[yy][xx] = glyph,
            None => {}
        }
        prev = Some((xx, yy));
    }
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let series = [
            PlotSeries {
                label: "low",
                glyph: '-',
                points: vec![(0.0, 0.0), (10.0, 0.0)],
            },
            PlotSeries {
                label: "high",
                glyph: '*',
                points: vec![(0.0, 10.0), (10.0, 10.0)],
            },
        ];
        let txt = render_plot(&series, 0.0, 10.0, 10, 5);
        let expected = concat!(
            "Plot: ply=[0, 10] | time=[-0.5, 10.5]ms\n",
            "**********\n",
            "          \n",
            "          \n",
            "          \n",
            "----------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn earlier_series_wins_overlap() {
        let diagonal = vec![(0.0, 0.0), (10.0, 10.0)];
        let series = [
            PlotSeries {
                label: "a",
                glyph: '-',
                points: diagonal.clone(),
            },
            PlotSeries {
                label: "b",
                glyph: '*',
                points: diagonal,
            },
        ];
        let txt = render_plot(&series, 0.0, 10.0, 10, 5);
        assert!(!txt.lines().skip(1).any(|l| l.contains('*')), "{txt}");
    }

    #[test]
    fn time_plot_has_requested_shape_and_all_series() {
        let spec = PlotSpec {
            time_ms: 60_000.0,
            increment_ms: 0.0,
            max_ply: 120,
            width: 60,
            height: 20,
        };
        // Steep simplified curve so all four series land on distinct cells.
        let params = CandidateParameters {
            c_base: 0.05,
            c_ply_mult: 0.02,
            c_ply_pow: 1.0,
            ..CandidateParameters::default()
        };
        let txt = render_time_plot(
            &params,
            &OriginalConstants::default(),
            &SimpleConstants::default(),
            &spec,
        );
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 2 + 20);
        assert!(lines[0].starts_with("Time=60s, Inc=0ms | - orig opt"), "{}", lines[0]);
        assert!(lines[1].starts_with("Plot: ply=[0, 120]"), "{}", lines[1]);
        let body = lines[2..].join("\n");
        for glyph in ['-', '*', '=', '+'] {
            assert!(body.contains(glyph), "missing {glyph}:\n{txt}");
        }
        assert!(lines[2..].iter().all(|l| l.chars().count() == 60));
    }

    #[test]
    fn plot_spec_rejects_negative_increment() {
        let spec = PlotSpec {
            time_ms: 60_000.0,
            increment_ms: -1e6,
            max_ply: 150,
            width: 100,
            height: 25,
        };
        assert_eq!(spec.validate().unwrap_err().exit_code(), 2);

        let ok = PlotSpec {
            increment_ms: 0.0,
            ..spec
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn flat_series_does_not_panic() {
        let series = [PlotSeries {
            label: "flat",
            glyph: '-',
            points: vec![(0.0, 5.0), (3.0, 5.0)],
        }];
        let txt = render_plot(&series, 0.0, 3.0, 10, 5);
        assert_eq!(txt.lines().count(), 6);
    }
}
