//! Reference and simplified time allocation.
//!
//! Both formulas start from the same budget:
//!
//! ```text
//! time_left = max(1, time + inc * (mtg - 1) - MOVE_OVERHEAD_MS * (2 + mtg))
//! ```
//!
//! The floor keeps `log10(time_left)` finite for degenerate clocks.

use crate::domain::{
    CandidateParameters, OriginalConstants, SimpleConstants, TimeAllocation, TimeModelInput,
};

/// Per-move overhead reserved out of the remaining clock.
pub const MOVE_OVERHEAD_MS: f64 = 10.0;

/// Budget left after reserving overhead for `mtg` moves, floored at 1ms.
pub fn effective_time_left(time_ms: f64, increment_ms: f64, mtg: f64) -> f64 {
    (time_ms + increment_ms * (mtg - 1.0) - MOVE_OVERHEAD_MS * (2.0 + mtg)).max(1.0)
}

/// The engine's reference allocation.
pub fn original_time(c: &OriginalConstants, input: &TimeModelInput) -> TimeAllocation {
    let time = input.time_ms;
    let ply = input.ply as f64;

    let time_left = effective_time_left(time, input.increment(), c.mtg);
    let log_time = (time_left / 1000.0).log10();

    let opt_constant =
        (c.opt_value3 / 100.0).min(c.opt_value1 / 100.0 + c.opt_value2 / 1000.0 * log_time);

    let ply_growth = (ply + c.optscale_value2).powf(c.optscale_value3);
    let opt_scale = (c.optscale_value4 * time / time_left)
        .min(c.optscale_value1 / 100.0 + ply_growth * opt_constant);

    let max_constant = c.max_value3.max(c.max_value1 + c.max_value2 * log_time);
    let max_scale = c.maxscale_value2.min(max_constant + ply / c.maxscale_value1);

    let bonus = if ply < c.bonus_ply {
        1.0 + (c.bonus_ply - ply).log10() * c.bonus_value1
    } else {
        1.0
    };

    let opt_time = opt_scale * bonus * time_left;
    let max_time = (time * c.max_time).min(max_scale * opt_time);

    TimeAllocation { opt_time, max_time }
}

/// The 7-parameter allocation being fitted.
pub fn simple_time(
    params: &CandidateParameters,
    c: &SimpleConstants,
    input: &TimeModelInput,
) -> TimeAllocation {
    let time = input.time_ms;
    let ply = input.ply as f64;

    let time_left = effective_time_left(time, input.increment(), c.mtg);

    let opt_frac = params.c_base + params.c_ply_mult * ply.powf(params.c_ply_pow);

    let bonus = if ply < params.bonus_ply {
        1.0 + (params.bonus_ply - ply) * params.bonus_val
    } else {
        1.0
    };

    let opt_time = opt_frac * bonus * time_left;

    let max_factor = params.max_base + ply * params.max_ply_mult;
    let max_time = (time * c.max_time_fraction).min(opt_time * max_factor);

    TimeAllocation { opt_time, max_time }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParamBounds;
    use crate::fit::InputGrid;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    /// Inputs beyond the fitting grid: tiny clocks, huge increments, late plies.
    fn edge_inputs() -> Vec<TimeModelInput> {
        let mut out = Vec::new();
        for &t in &[1.0, 50.0, 299.0, 300.0, 301.0, 1_000.0, 3_600_000.0] {
            for &inc in &[0.0, 1.0, 20_000.0] {
                for &ply in &[0, 1, 11, 12, 29, 30, 500] {
                    out.push(TimeModelInput::new(t, inc, ply));
                }
            }
        }
        out
    }

    #[test]
    fn original_golden_values_at_one_minute() {
        let c = OriginalConstants::default();
        let a = original_time(&c, &TimeModelInput::new(60_000.0, 0.0, 0));
        assert!(close(a.opt_time, 2355.44615782925), "opt={}", a.opt_time);
        assert!(close(a.max_time, 12109.348697400173), "max={}", a.max_time);

        let a = original_time(&c, &TimeModelInput::new(60_000.0, 0.0, 40));
        assert!(close(a.opt_time, 3391.480119730627), "opt={}", a.opt_time);
        assert!(close(a.max_time, 17435.599295535154), "max={}", a.max_time);
    }

    #[test]
    fn original_hits_hard_cap_with_large_increment() {
        let c = OriginalConstants::default();
        let a = original_time(&c, &TimeModelInput::new(1_000.0, 5_000.0, 0));
        assert!(close(a.opt_time, 384.54213662347684), "opt={}", a.opt_time);
        assert!(close(a.max_time, 881.0), "max={}", a.max_time);
    }

    #[test]
    fn original_floors_time_left_on_tiny_clock() {
        let c = OriginalConstants::default();
        let a = original_time(&c, &TimeModelInput::new(100.0, 0.0, 3));
        assert!(a.opt_time.is_finite() && a.max_time.is_finite());
        assert!(close(a.opt_time, 0.03980309855823293), "opt={}", a.opt_time);
        assert!(close(a.max_time, 0.11714006930435343), "max={}", a.max_time);
    }

    #[test]
    fn missing_increment_matches_zero_increment() {
        let c = OriginalConstants::default();
        let with_none = TimeModelInput {
            time_ms: 10_000.0,
            increment_ms: None,
            ply: 7,
        };
        assert_eq!(
            original_time(&c, &with_none),
            original_time(&c, &TimeModelInput::new(10_000.0, 0.0, 7))
        );
    }

    #[test]
    fn original_respects_caps_everywhere() {
        let c = OriginalConstants::default();
        let grid = InputGrid::default();
        for input in grid.points().chain(edge_inputs()) {
            let a = original_time(&c, &input);
            assert!(a.opt_time >= 0.0, "{input:?} -> {a:?}");
            assert!(a.max_time <= input.time_ms * 0.881, "{input:?} -> {a:?}");
        }
    }

    #[test]
    fn simple_golden_values_for_default_start() {
        let p = CandidateParameters::default();
        let c = SimpleConstants::default();
        let a = simple_time(&p, &c, &TimeModelInput::new(60_000.0, 0.0, 0));
        assert!(close(a.opt_time, 1413.696), "opt={}", a.opt_time);
        assert!(close(a.max_time, 7068.48), "max={}", a.max_time);

        let a = simple_time(&p, &c, &TimeModelInput::new(60_000.0, 0.0, 40));
        assert!(close(a.opt_time, 3598.231668368732), "opt={}", a.opt_time);
        assert!(close(a.max_time, 17991.15834184366), "max={}", a.max_time);
    }

    #[test]
    fn simple_respects_caps_at_bound_corners() {
        let bounds = ParamBounds::default();
        let c = SimpleConstants::default();
        let lows = CandidateParameters::from_array(bounds.0.map(|b| b.min));
        let highs = CandidateParameters::from_array(bounds.0.map(|b| b.max));
        let inputs: Vec<TimeModelInput> =
            InputGrid::default().points().chain(edge_inputs()).collect();

        for p in [CandidateParameters::default(), lows, highs] {
            for input in &inputs {
                let a = simple_time(&p, &c, input);
                assert!(a.opt_time >= 0.0, "{p:?} {input:?} -> {a:?}");
                assert!(a.max_time <= input.time_ms * 0.8, "{p:?} {input:?} -> {a:?}");
            }
        }
    }

    #[test]
    fn simple_bonus_vanishes_past_bonus_ply() {
        let p = CandidateParameters::default();
        let c = SimpleConstants::default();
        let at = simple_time(&p, &c, &TimeModelInput::new(60_000.0, 0.0, 12));
        let no_bonus = CandidateParameters {
            bonus_val: 0.0,
            ..p
        };
        let reference = simple_time(&no_bonus, &c, &TimeModelInput::new(60_000.0, 0.0, 12));
        assert_eq!(at, reference);
    }
}
