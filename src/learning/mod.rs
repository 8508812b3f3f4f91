//! Model-free learning over a [`Turn`](crate::policy::Turn).
//!
//! Every algorithm takes the base turn by reference, clones it, and returns
//! the annotated clone. The base graph is never mutated, so several runs can
//! start from one build.
//!
//! | Algorithm | Function | Estimates | Policy update |
//! |-----------|----------|-----------|---------------|
//! | MC prediction | [`mc_predictions`] | V(s) | none |
//! | MC exploring starts | [`mc_exploring_starts`] | Q(s, a) | greedy |
//! | MC on-policy control | [`mc_on_policy_control`] | Q(s, a) | ε-greedy |
//! | TD(0) | [`td0`] | V(s) | none |
//! | SARSA | [`sarsa`] | Q(s, a) | none |

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{MdpError, Result};

pub mod episode;
pub mod monte_carlo;
pub mod temporal_difference;

pub use episode::{discounted_return, generate_episode, EpisodeStep};
pub use monte_carlo::{mc_exploring_starts, mc_on_policy_control, mc_predictions};
pub use temporal_difference::{sarsa, td0};

/// Hyperparameters shared by all algorithms. Each algorithm reads only the
/// fields it needs (α is TD-only, ε is on-policy-control-only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Discount factor γ in [0, 1].
    pub gamma: f64,
    /// Learning rate α in (0, 1].
    pub alpha: f64,
    /// Exploration rate ε in [0, 1].
    pub epsilon: f64,
    /// Number of episodes.
    pub n_iter: usize,
    /// Monte Carlo: update only the first occurrence of each key per episode.
    pub first_visit: bool,
    /// Per-episode transition cap.
    pub max_steps: usize,
    pub seed: u64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            alpha: DEFAULT_ALPHA,
            epsilon: DEFAULT_EPSILON,
            n_iter: DEFAULT_ITERATIONS,
            first_visit: true,
            max_steps: DEFAULT_MAX_STEPS,
            seed: DEFAULT_SEED,
        }
    }
}

impl LearningConfig {
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_iterations(mut self, n_iter: usize) -> Self {
        self.n_iter = n_iter;
        self
    }

    pub fn with_first_visit(mut self, first_visit: bool) -> Self {
        self.first_visit = first_visit;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject out-of-range hyperparameters.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(MdpError::InvalidParameter {
                name: "gamma",
                value: self.gamma,
            });
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(MdpError::InvalidParameter {
                name: "alpha",
                value: self.alpha,
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(MdpError::InvalidParameter {
                name: "epsilon",
                value: self.epsilon,
            });
        }
        if self.max_steps == 0 {
            return Err(MdpError::InvalidParameter {
                name: "max_steps",
                value: 0.0,
            });
        }
        Ok(())
    }
}
