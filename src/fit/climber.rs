//! Randomized single-coordinate hill climbing.
//!
//! Each iteration:
//! 1. copy the current parameters
//! 2. pick one coordinate and a direction from a `MoveSource`
//! 3. step the coordinate by its fixed step size and clamp it into bounds
//! 4. rescore, and keep the candidate only if its score is strictly lower
//!
//! There is no annealing, no restart and no convergence test: the loop runs for
//! exactly `iterations` steps and may stall in a local minimum.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::domain::{CandidateParameters, PARAM_COUNT, ParamBounds, StepSizes};
use crate::fit::Objective;

/// Sign of a perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Down => -1.0,
            Direction::Up => 1.0,
        }
    }
}

/// One proposed perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub index: usize,
    pub direction: Direction,
}

impl Move {
    pub fn new(index: usize, direction: Direction) -> Self {
        Self { index, direction }
    }
}

/// Supplies the coordinate/sign stream for the climber.
pub trait MoveSource {
    /// Next move over `coords` coordinates. `index` must be `< coords`.
    fn next_move(&mut self, coords: usize) -> Move;
}

/// Uniform coordinate and uniform sign drawn from an RNG.
#[derive(Debug, Clone)]
pub struct RngMoves<R> {
    rng: R,
}

impl<R: Rng> RngMoves<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngMoves<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MoveSource for RngMoves<R> {
    fn next_move(&mut self, coords: usize) -> Move {
        let index = self.rng.gen_range(0..coords);
        let direction = if self.rng.gen_bool(0.5) {
            Direction::Up
        } else {
            Direction::Down
        };
        Move { index, direction }
    }
}

/// A fixed, repeating move sequence.
#[derive(Debug, Clone)]
pub struct ScriptedMoves {
    moves: Vec<Move>,
    pos: usize,
}

impl ScriptedMoves {
    /// # Panics
    /// Panics if `moves` is empty.
    pub fn new(moves: Vec<Move>) -> Self {
        assert!(!moves.is_empty(), "ScriptedMoves needs at least one move");
        Self { moves, pos: 0 }
    }
}

impl MoveSource for ScriptedMoves {
    fn next_move(&mut self, coords: usize) -> Move {
        let mv = self.moves[self.pos % self.moves.len()];
        self.pos += 1;
        Move {
            index: mv.index % coords,
            direction: mv.direction,
        }
    }
}

/// Loop controls.
#[derive(Debug, Clone, Copy)]
pub struct ClimbOptions {
    pub iterations: usize,
    /// Emit an `info` progress event every N iterations (0 disables).
    pub progress_every: usize,
}

/// What happened in one iteration.
#[derive(Debug, Clone, Copy)]
pub struct IterationRecord {
    pub iteration: usize,
    pub mv: Move,
    pub candidate_score: f64,
    pub accepted: bool,
    /// Best score after this iteration.
    pub best_score: f64,
}

/// Final state of a climb.
#[derive(Debug, Clone)]
pub struct ClimbResult {
    pub params: CandidateParameters,
    pub score: f64,
    pub initial_score: f64,
    pub accepted: usize,
    pub iterations: usize,
}

/// Run the climb from `start`.
pub fn hill_climb<M: MoveSource>(
    objective: &Objective,
    bounds: &ParamBounds,
    steps: &StepSizes,
    start: CandidateParameters,
    options: ClimbOptions,
    moves: &mut M,
) -> ClimbResult {
    hill_climb_observed(objective, bounds, steps, start, options, moves, |_| {})
}

/// Run the climb, calling `observe` after every iteration.
pub fn hill_climb_observed<M, F>(
    objective: &Objective,
    bounds: &ParamBounds,
    steps: &StepSizes,
    start: CandidateParameters,
    options: ClimbOptions,
    moves: &mut M,
    mut observe: F,
) -> ClimbResult
where
    M: MoveSource,
    F: FnMut(&IterationRecord),
{
    let mut current = start;
    bounds.clamp_all(&mut current);
    let initial_score = objective.score(&current);
    let mut current_score = initial_score;
    let mut accepted = 0usize;

    for iteration in 0..options.iterations {
        let mv = moves.next_move(PARAM_COUNT);

        let mut candidate = current;
        let stepped = candidate.get(mv.index) + mv.direction.sign() * steps.0[mv.index];
        candidate.set(mv.index, stepped);
        bounds.clamp_coordinate(&mut candidate, mv.index);

        let candidate_score = objective.score(&candidate);
        let improved = candidate_score < current_score;
        if improved {
            debug!(iteration, coord = mv.index, score = candidate_score, "accepted");
            current = candidate;
            current_score = candidate_score;
            accepted += 1;
        }

        observe(&IterationRecord {
            iteration,
            mv,
            candidate_score,
            accepted: improved,
            best_score: current_score,
        });

        if options.progress_every > 0 && iteration % options.progress_every == 0 {
            info!("Iter {iteration}: Error {current_score:.5}");
        }
    }

    ClimbResult {
        params: current,
        score: current_score,
        initial_score,
        accepted,
        iterations: options.iterations,
    }
}
