//! Online temporal-difference learning: TD(0) for V(s) and SARSA for Q(s, a).
//!
//! Both follow the current policy step by step without storing episodes.

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::episode::{select_action, select_random_state, select_random_state_action};
use super::LearningConfig;
use crate::error::Result;
use crate::policy::Turn;
use crate::types::ActionId;

/// `estimate + α · (reward + γ · next_estimate − estimate)`
#[inline]
pub fn td_update(estimate: f64, reward: f64, gamma: f64, next_estimate: f64, alpha: f64) -> f64 {
    estimate + alpha * (reward + gamma * next_estimate - estimate)
}

/// TD(0) prediction of V(s) under the current policy.
///
/// State values of the copy are zeroed first; the terminal state stays at 0.
pub fn td0(base: &Turn, config: &LearningConfig) -> Result<Turn> {
    config.validate()?;
    let start = Instant::now();
    let mut turn = base.clone();
    turn.reset_state_values();
    let mut rng = SmallRng::seed_from_u64(config.seed);

    for _ in 0..config.n_iter {
        let mut current = select_random_state(&turn, &mut rng);
        let mut steps = 0;
        while !turn.state(current).is_terminal() && steps < config.max_steps {
            let Some(index) = select_action(turn.state(current), true, &mut rng) else {
                break;
            };
            let action = ActionId::new(current, index);
            let Some(next) = turn.sample_successor(action, &mut rng) else {
                break;
            };
            let value = td_update(
                turn.state(current).value(),
                turn.action(action).reward(),
                config.gamma,
                turn.state(next).value(),
                config.alpha,
            );
            turn.state_mut(current).set_value(value);
            current = next;
            steps += 1;
        }
    }

    log::info!(
        "TD(0): {} episodes in {:.2?}, V(initial) = {:.4}",
        config.n_iter,
        start.elapsed(),
        turn.initial_state().value()
    );
    Ok(turn)
}

/// SARSA: on-policy TD control of Q(s, a).
///
/// Starts from a policy-sampled (state, action) pair and bootstraps on the
/// next action actually chosen; Q of the terminal state counts as 0.
pub fn sarsa(base: &Turn, config: &LearningConfig) -> Result<Turn> {
    config.validate()?;
    let start = Instant::now();
    let mut turn = base.clone();
    let mut rng = SmallRng::seed_from_u64(config.seed);

    for _ in 0..config.n_iter {
        let Some(mut action) = select_random_state_action(&turn, true, &mut rng) else {
            break;
        };
        let mut steps = 0;
        while steps < config.max_steps {
            let Some(next) = turn.sample_successor(action, &mut rng) else {
                break;
            };
            let next_action = if turn.state(next).is_terminal() {
                None
            } else {
                select_action(turn.state(next), true, &mut rng).map(|i| ActionId::new(next, i))
            };
            let next_q = next_action.map_or(0.0, |a| turn.action(a).value());
            let value = td_update(
                turn.action(action).value(),
                turn.action(action).reward(),
                config.gamma,
                next_q,
                config.alpha,
            );
            turn.action_mut(action).set_value(value);
            steps += 1;

            match next_action {
                Some(a) => action = a,
                None => break,
            }
        }
    }

    log::info!(
        "SARSA: {} episodes in {:.2?}",
        config.n_iter,
        start.elapsed()
    );
    Ok(turn)
}
