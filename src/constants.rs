//! Turn constants and step indexing.
//!
//! A turn is modelled as five layers:
//! - step [`INITIAL_STEP`] = 0: empty hand, single pass-through action (first roll)
//! - steps 1..=[`LAST_ROLL_STEP`]: one state per sorted 5-dice multiset (|R_{5,6}| = 252)
//! - step [`TERMINAL_STEP`] = 4: absorbing state reached after scoring

/// Dice rolled per turn.
pub const NUM_DICE: usize = 5;

/// Lowest die face.
pub const MIN_FACE: u8 = 1;

/// Highest die face.
pub const MAX_FACE: u8 = 6;

/// Number of distinct sorted 5-dice multisets from {1..6}: C(10,5) = 252.
pub const NUM_DICE_SETS: usize = 252;

/// Step of the single initial state (nothing rolled yet).
pub const INITIAL_STEP: u8 = 0;

/// Step at which the hand must be scored.
pub const LAST_ROLL_STEP: u8 = 3;

/// Step of the single absorbing state.
pub const TERMINAL_STEP: u8 = 4;

/// Number of layers in the turn graph (steps 0..=4).
pub const NUM_STEPS: usize = TERMINAL_STEP as usize + 1;

/// Total states: 1 initial + 3 × 252 + 1 terminal.
pub const NUM_STATES: usize = 2 + LAST_ROLL_STEP as usize * NUM_DICE_SETS;

/// Number of final (scoring) actions offered at step 3.
pub const NUM_CATEGORIES: usize = 13;

pub const FULL_REWARD: i32 = 25;
pub const SMALL_STRAIGHT_REWARD: i32 = 30;
pub const LARGE_STRAIGHT_REWARD: i32 = 40;
pub const YATHZEE_REWARD: i32 = 50;

/// Runs of four consecutive faces that make a small straight.
pub const SMALL_STRAIGHTS: [[u8; 4]; 3] = [[1, 2, 3, 4], [2, 3, 4, 5], [3, 4, 5, 6]];

/// Runs of five consecutive faces that make a large straight.
pub const LARGE_STRAIGHTS: [[u8; 5]; 2] = [[1, 2, 3, 4, 5], [2, 3, 4, 5, 6]];

/// Safety bound on episode length. The layered graph ends every episode in
/// at most 4 transitions; this only guards against a broken topology.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Discount factor used by the driver.
pub const DEFAULT_GAMMA: f64 = 0.8;

/// TD learning rate used by the driver.
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Exploration rate for on-policy ε-greedy control.
pub const DEFAULT_EPSILON: f64 = 0.25;

/// Episodes per algorithm run used by the driver.
pub const DEFAULT_ITERATIONS: usize = 100_000;

/// Whether `step` holds full 5-dice hands.
#[inline(always)]
pub fn is_roll_step(step: u8) -> bool {
    (1..=LAST_ROLL_STEP).contains(&step)
}
