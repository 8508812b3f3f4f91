//! Episode sampling.
//!
//! An episode starts at some state, optionally with a forced first action,
//! and follows actions until the terminal state or the step cap. Actions are
//! drawn from the current policy (`use_policy`) or uniformly; successors are
//! always drawn uniformly from the chosen action's successor set.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

use crate::graph::State;
use crate::policy::Turn;
use crate::types::{ActionId, StateId};

/// One (state, action) pair of a trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpisodeStep {
    pub state: StateId,
    pub action: ActionId,
}

/// Any state of the turn, terminal included.
pub fn select_random_state<R: Rng + ?Sized>(turn: &Turn, rng: &mut R) -> StateId {
    StateId(rng.random_range(0..turn.num_states()))
}

/// Index of an action of `state`: weighted by probability when `use_policy`,
/// uniform otherwise. `None` when the state has no actions.
pub fn select_action<R: Rng + ?Sized>(state: &State, use_policy: bool, rng: &mut R) -> Option<usize> {
    let n = state.actions().len();
    if n == 0 {
        return None;
    }
    if use_policy {
        // Degenerate weights (all zero) fall through to a uniform draw
        if let Ok(dist) = WeightedIndex::new(state.action_probabilities()) {
            return Some(dist.sample(rng));
        }
    }
    Some(rng.random_range(0..n))
}

/// A random non-terminal state with one of its actions.
///
/// With `use_policy` the action follows the policy. Otherwise it is uniform
/// among the actions that still have positive probability, so a greedy policy
/// never starts an episode with an action it has ruled out.
pub fn select_random_state_action<R: Rng + ?Sized>(
    turn: &Turn,
    use_policy: bool,
    rng: &mut R,
) -> Option<ActionId> {
    let candidates: Vec<&State> = turn
        .states()
        .iter()
        .filter(|s| !s.actions().is_empty())
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let state = candidates[rng.random_range(0..candidates.len())];

    let index = if use_policy {
        select_action(state, true, rng)?
    } else {
        let live: Vec<usize> = state
            .actions()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.probability() > 0.0)
            .map(|(i, _)| i)
            .collect();
        if live.is_empty() {
            rng.random_range(0..state.actions().len())
        } else {
            live[rng.random_range(0..live.len())]
        }
    };
    Some(ActionId::new(state.id(), index))
}

/// Sample one trajectory from `origin`.
///
/// `first_action` (an action index of `origin`) is taken unconditionally as
/// the first step. Stops at the terminal state or after `max_steps`
/// transitions.
pub fn generate_episode<R: Rng + ?Sized>(
    turn: &Turn,
    origin: StateId,
    first_action: Option<usize>,
    use_policy: bool,
    max_steps: usize,
    rng: &mut R,
) -> Vec<EpisodeStep> {
    let mut episode = Vec::new();
    let mut current = origin;
    let mut forced = first_action;

    while !turn.state(current).is_terminal() {
        if episode.len() >= max_steps {
            log::warn!(
                "Episode from {} hit the step cap ({max_steps})",
                turn.state(origin).key()
            );
            break;
        }
        let state = turn.state(current);
        let index = match forced.take() {
            Some(index) => index,
            None => match select_action(state, use_policy, rng) {
                Some(index) => index,
                None => break,
            },
        };
        let action = ActionId::new(current, index);
        episode.push(EpisodeStep {
            state: current,
            action,
        });
        match turn.sample_successor(action, rng) {
            Some(next) => current = next,
            None => break,
        }
    }
    episode
}

/// Forward discounted return from position `t`:
/// G_t = Σ_k γ^k · r_{t+k}, where r is the reward of the action taken.
pub fn discounted_return(turn: &Turn, episode: &[EpisodeStep], t: usize, gamma: f64) -> f64 {
    let mut ret = 0.0;
    let mut discount = 1.0;
    for step in &episode[t..] {
        ret += discount * turn.action(step.action).reward();
        discount *= gamma;
    }
    ret
}
