use std::time::Instant;

use clap::Parser;
use serde::Serialize;

use yatzy_rl::dice_mechanics::sort_dice_set;
use yatzy_rl::env_config::{default_seed, init_logging, init_rayon_threads};
use yatzy_rl::learning::{
    mc_exploring_starts, mc_on_policy_control, mc_predictions, sarsa, td0, LearningConfig,
};
use yatzy_rl::policy::Turn;
use yatzy_rl::types::{PolicyMode, StateKey};
use yatzy_rl::Result;

/// Learn values for a single Yatzy turn with five tabular RL algorithms.
#[derive(Parser)]
#[command(name = "yatzy-learn")]
struct Cli {
    /// Initial policy: uniform or random
    #[arg(long, default_value = "uniform")]
    policy: PolicyMode,
    /// Episodes per algorithm
    #[arg(long, default_value_t = 100_000)]
    iterations: usize,
    /// Discount factor
    #[arg(long, default_value_t = 0.8)]
    gamma: f64,
    /// Learning rate (TD methods)
    #[arg(long, default_value_t = 0.5)]
    alpha: f64,
    /// Exploration rate (on-policy control)
    #[arg(long, default_value_t = 0.25)]
    epsilon: f64,
    /// RNG seed (default: YATZY_RL_SEED or 42)
    #[arg(long)]
    seed: Option<u64>,
    /// Monte Carlo every-visit updates instead of first-visit
    #[arg(long)]
    every_visit: bool,
    /// First-roll hand whose best keep is reported, e.g. 2,3,4,5,5
    #[arg(long, default_value = "2,3,4,5,5", value_parser = parse_hand)]
    hand: Hand,
    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Debug)]
struct Hand(Vec<u8>);

fn parse_hand(s: &str) -> std::result::Result<Hand, String> {
    let mut dice = s
        .split(',')
        .map(|d| d.trim().parse::<u8>().map_err(|e| format!("{d:?}: {e}")))
        .collect::<std::result::Result<Vec<u8>, String>>()?;
    sort_dice_set(&mut dice);
    Ok(Hand(dice))
}

#[derive(Serialize)]
struct AlgorithmSummary {
    algorithm: &'static str,
    initial_state_value: f64,
    initial_roll_value: f64,
    hand_best_actions: Vec<String>,
    hand_action_probabilities: Vec<f64>,
}

#[derive(Serialize)]
struct Summary {
    policy: PolicyMode,
    num_states: usize,
    num_actions: usize,
    config: LearningConfig,
    hand: StateKey,
    results: Vec<AlgorithmSummary>,
}

type Learner = fn(&Turn, &LearningConfig) -> Result<Turn>;

const ALGORITHMS: [(&str, Learner); 5] = [
    ("mc_predictions", mc_predictions),
    ("mc_exploring_starts", mc_exploring_starts),
    ("mc_on_policy_control", mc_on_policy_control),
    ("td0", td0),
    ("sarsa", sarsa),
];

fn summarize(name: &'static str, turn: &Turn, hand: &StateKey) -> AlgorithmSummary {
    let initial = turn.initial_state();
    let (hand_best_actions, hand_action_probabilities) = match turn.get_state(hand) {
        Some(state) => {
            let best = state
                .best_action_indices()
                .into_iter()
                .filter_map(|i| state.action(i))
                .map(|a| a.key().to_string())
                .collect();
            (best, state.action_probabilities())
        }
        None => (Vec::new(), Vec::new()),
    };
    AlgorithmSummary {
        algorithm: name,
        initial_state_value: initial.value(),
        initial_roll_value: initial.action(0).map_or(0.0, |a| a.value()),
        hand_best_actions,
        hand_action_probabilities,
    }
}

fn run(cli: Cli) -> Result<()> {
    init_rayon_threads();
    let config = LearningConfig::default()
        .with_iterations(cli.iterations)
        .with_gamma(cli.gamma)
        .with_alpha(cli.alpha)
        .with_epsilon(cli.epsilon)
        .with_first_visit(!cli.every_visit)
        .with_seed(cli.seed.unwrap_or_else(default_seed));
    config.validate()?;
    let hand = StateKey::new(1, cli.hand.0)?;

    let turn = Turn::with_seed(cli.policy, config.seed)?;
    log::info!("Number of states: {}", turn.num_states());
    log::info!("Number of actions: {}", turn.num_actions());

    let total = Instant::now();
    let mut results = Vec::with_capacity(ALGORITHMS.len());
    for (name, learner) in ALGORITHMS {
        let learned = learner(&turn, &config)?;
        results.push(summarize(name, &learned, &hand));
    }
    log::info!("All algorithms finished in {:.2?}", total.elapsed());

    if cli.json {
        let summary = Summary {
            policy: cli.policy,
            num_states: turn.num_states(),
            num_actions: turn.num_actions(),
            config,
            hand,
            results,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize summary: {e}"),
        }
        return Ok(());
    }

    println!(
        "{:<22} {:>10} {:>10}  best action for {}",
        "algorithm", "V(s0)", "Q(s0,a0)", hand
    );
    for r in &results {
        println!(
            "{:<22} {:>10.4} {:>10.4}  {}",
            r.algorithm,
            r.initial_state_value,
            r.initial_roll_value,
            r.hand_best_actions.join(" | ")
        );
    }
    Ok(())
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
