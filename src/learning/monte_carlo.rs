//! Monte Carlo prediction and control.
//!
//! Estimates are running means of sampled discounted returns, accumulated per
//! composite identity key so they stay valid across graph copies.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::episode::{
    discounted_return, generate_episode, select_random_state, select_random_state_action,
    EpisodeStep,
};
use super::LearningConfig;
use crate::error::Result;
use crate::graph::State;
use crate::policy::Turn;
use crate::types::{ActionKey, StateId, StateKey};

/// Running sum and count of returns for one key.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReturnStats {
    pub sum: f64,
    pub count: u64,
}

impl ReturnStats {
    pub fn push(&mut self, ret: f64) {
        self.sum += ret;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

type StateActionKey = (StateKey, ActionKey);

/// Monte Carlo prediction of V(s).
///
/// Episodes start at a uniformly random state and pick actions uniformly.
pub fn mc_predictions(base: &Turn, config: &LearningConfig) -> Result<Turn> {
    config.validate()?;
    let start = Instant::now();
    let mut turn = base.clone();
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut returns: HashMap<StateKey, ReturnStats> = HashMap::new();

    for _ in 0..config.n_iter {
        let origin = select_random_state(&turn, &mut rng);
        let episode = generate_episode(&turn, origin, None, false, config.max_steps, &mut rng);

        let mut seen = HashSet::new();
        for t in 0..episode.len() {
            let id = episode[t].state;
            if config.first_visit && !seen.insert(id) {
                continue;
            }
            let ret = discounted_return(&turn, &episode, t, config.gamma);
            let stats = returns.entry(turn.state(id).key().clone()).or_default();
            stats.push(ret);
            let mean = stats.mean();
            turn.state_mut(id).set_value(mean);
        }
    }

    log::info!(
        "MC prediction: {} episodes in {:.2?}, V(initial) = {:.4}",
        config.n_iter,
        start.elapsed(),
        turn.initial_state().value()
    );
    Ok(turn)
}

/// Monte Carlo control with exploring starts.
///
/// Each episode starts from a random (state, action) pair and then follows the
/// policy; visited states become greedy in their current Q estimates.
pub fn mc_exploring_starts(base: &Turn, config: &LearningConfig) -> Result<Turn> {
    config.validate()?;
    let start = Instant::now();
    let mut turn = base.clone();
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut returns: HashMap<StateActionKey, ReturnStats> = HashMap::new();

    for _ in 0..config.n_iter {
        let Some(first) = select_random_state_action(&turn, false, &mut rng) else {
            break;
        };
        let episode = generate_episode(
            &turn,
            first.state,
            Some(first.index),
            true,
            config.max_steps,
            &mut rng,
        );
        evaluate_action_values(&mut turn, &episode, config, &mut returns);
        improve_policy(&mut turn, &episode, 0.0);
    }

    log::info!(
        "MC exploring starts: {} episodes in {:.2?}",
        config.n_iter,
        start.elapsed()
    );
    Ok(turn)
}

/// On-policy first-visit (or every-visit) ε-greedy Monte Carlo control.
pub fn mc_on_policy_control(base: &Turn, config: &LearningConfig) -> Result<Turn> {
    config.validate()?;
    let start = Instant::now();
    let mut turn = base.clone();
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut returns: HashMap<StateActionKey, ReturnStats> = HashMap::new();

    for _ in 0..config.n_iter {
        let origin = select_random_state(&turn, &mut rng);
        let episode = generate_episode(&turn, origin, None, true, config.max_steps, &mut rng);
        evaluate_action_values(&mut turn, &episode, config, &mut returns);
        improve_policy(&mut turn, &episode, config.epsilon);
    }

    log::info!(
        "MC on-policy control (epsilon = {}): {} episodes in {:.2?}",
        config.epsilon,
        config.n_iter,
        start.elapsed()
    );
    Ok(turn)
}

fn evaluate_action_values(
    turn: &mut Turn,
    episode: &[EpisodeStep],
    config: &LearningConfig,
    returns: &mut HashMap<StateActionKey, ReturnStats>,
) {
    let mut seen = HashSet::new();
    for t in 0..episode.len() {
        let id = episode[t].action;
        if config.first_visit && !seen.insert(id) {
            continue;
        }
        let ret = discounted_return(turn, episode, t, config.gamma);
        let key = (
            turn.state(id.state).key().clone(),
            turn.action(id).key().clone(),
        );
        let stats = returns.entry(key).or_default();
        stats.push(ret);
        let mean = stats.mean();
        turn.action_mut(id).set_value(mean);
    }
}

fn improve_policy(turn: &mut Turn, episode: &[EpisodeStep], epsilon: f64) {
    let visited: HashSet<StateId> = episode.iter().map(|step| step.state).collect();
    for id in visited {
        epsilon_greedy_update(turn.state_mut(id), epsilon);
    }
}

/// Reassign `state`'s action probabilities ε-greedily over its current
/// action values.
///
/// Each of the |B| tied best actions gets (1 − ε)/|B| + ε/|A|, every other
/// action ε/|A|. With ε = 0 this is the greedy policy with ties split evenly.
pub fn epsilon_greedy_update(state: &mut State, epsilon: f64) {
    let n = state.actions().len();
    if n == 0 {
        return;
    }
    let mut is_best = vec![false; n];
    let best = state.best_action_indices();
    for &i in &best {
        is_best[i] = true;
    }
    let explore = epsilon / n as f64;
    let exploit = (1.0 - epsilon) / best.len() as f64;
    for (action, best) in state.actions_mut().iter_mut().zip(is_best) {
        action.set_probability(if best { exploit + explore } else { explore });
    }
}
