//! Integration tests for episode sampling and the learning algorithms:
//! termination, isolation between runs, seeded determinism and convergence.

use std::sync::OnceLock;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use yatzy_rl::constants::*;
use yatzy_rl::learning::episode::select_random_state;
use yatzy_rl::learning::{
    generate_episode, mc_exploring_starts, mc_on_policy_control, mc_predictions, sarsa, td0,
    LearningConfig,
};
use yatzy_rl::policy::Turn;
use yatzy_rl::types::PolicyMode;

type Learner = fn(&Turn, &LearningConfig) -> yatzy_rl::Result<Turn>;

static BASE: OnceLock<Turn> = OnceLock::new();

fn base() -> &'static Turn {
    BASE.get_or_init(|| Turn::new(PolicyMode::Uniform).unwrap())
}

fn all_values(turn: &Turn) -> Vec<f64> {
    turn.states()
        .iter()
        .flat_map(|s| std::iter::once(s.value()).chain(s.action_values()))
        .collect()
}

fn all_probabilities(turn: &Turn) -> Vec<f64> {
    turn.states()
        .iter()
        .flat_map(|s| s.action_probabilities())
        .collect()
}

#[test]
fn episodes_terminate_within_four_transitions() {
    let turn = base();
    let mut rng = SmallRng::seed_from_u64(123);
    for use_policy in [false, true] {
        for _ in 0..2_000 {
            let origin = select_random_state(turn, &mut rng);
            let episode = generate_episode(turn, origin, None, use_policy, DEFAULT_MAX_STEPS, &mut rng);
            assert!(episode.len() <= 4);
            if turn.state(origin).is_terminal() {
                assert!(episode.is_empty());
                continue;
            }
            let last = episode.last().unwrap();
            assert!(turn.action(last.action).is_final());
        }
    }
}

#[test]
fn runs_do_not_alias_the_base_graph() {
    let turn = base();
    let before_values = all_values(turn);
    let before_probs = all_probabilities(turn);
    let config = LearningConfig::default().with_iterations(3_000);

    let mc = mc_on_policy_control(turn, &config).unwrap();
    let td = td0(turn, &config).unwrap();

    assert_eq!(all_values(turn), before_values);
    assert_eq!(all_probabilities(turn), before_probs);
    assert!(before_values.iter().all(|&v| v == 0.0));

    // Learning into one copy leaves an earlier result untouched
    let mc_values = all_values(&mc);
    let _ = sarsa(&mc, &config).unwrap();
    assert_eq!(all_values(&mc), mc_values);
    assert_ne!(all_values(&td), mc_values);
}

#[test]
fn equal_seeds_give_equal_results() {
    let turn = base();
    let config = LearningConfig::default().with_iterations(2_000).with_seed(99);
    let learners: [Learner; 5] = [mc_predictions, mc_exploring_starts, mc_on_policy_control, td0, sarsa];
    for learner in learners {
        let a = learner(turn, &config).unwrap();
        let b = learner(turn, &config).unwrap();
        assert_eq!(all_values(&a), all_values(&b));
        assert_eq!(all_probabilities(&a), all_probabilities(&b));
    }
}

#[test]
fn exploring_starts_policy_is_greedy_where_visited() {
    let turn = base();
    let config = LearningConfig::default().with_iterations(20_000);
    let learned = mc_exploring_starts(turn, &config).unwrap();

    for state in learned.states_at_step(3) {
        let best = state.best_action_indices();
        let probs = state.action_probabilities();
        let changed = probs.iter().any(|&p| p != probs[0]);
        if changed {
            for (i, &p) in probs.iter().enumerate() {
                if best.contains(&i) {
                    assert!((p - 1.0 / best.len() as f64).abs() < 1e-12);
                } else {
                    assert_eq!(p, 0.0);
                }
            }
        }
    }
}

#[test]
fn monte_carlo_estimate_stabilizes() {
    let turn = base();
    let spread = |n_iter: usize| {
        let estimates: Vec<f64> = (0..8u64)
            .map(|seed| {
                let config = LearningConfig::default()
                    .with_iterations(n_iter)
                    .with_seed(seed);
                mc_predictions(turn, &config).unwrap().initial_state().value()
            })
            .collect();
        let mean = estimates.iter().sum::<f64>() / estimates.len() as f64;
        estimates.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / estimates.len() as f64
    };

    let coarse = spread(1_500);
    let fine = spread(60_000);
    assert!(fine < coarse, "variance did not shrink: {coarse} -> {fine}");

    let config = LearningConfig::default().with_iterations(40_000);
    let value = mc_predictions(turn, &config).unwrap().initial_state().value();
    assert!(value > 0.0 && value < YATHZEE_REWARD as f64);
}

#[test]
fn random_initial_policy_is_supported() {
    let turn = Turn::with_seed(PolicyMode::Random, 5).unwrap();
    let config = LearningConfig::default().with_iterations(2_000);
    let learned = mc_on_policy_control(&turn, &config).unwrap();
    for state in learned.states() {
        if !state.actions().is_empty() {
            let sum: f64 = state.action_probabilities().iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }
}
