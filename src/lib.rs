//! # Yatzy RL: a single Yatzy turn as a finite MDP
//!
//! Enumerates every decision point of one Yatzy turn (five six-sided dice,
//! up to three rolls, one scoring category) as an explicit layered graph, and
//! learns state and action values over it with tabular Monte Carlo and
//! temporal-difference methods.
//!
//! ## Graph layout
//!
//! | Step | States | Actions | Successors |
//! |------|--------|---------|------------|
//! | 0 | 1 (empty hand) | roll all five dice | every step-1 hand |
//! | 1, 2 | 252 sorted hands each | keep a sub-multiset, reroll the rest | next-step hands containing the kept dice; keeping all five jumps to step 3 |
//! | 3 | 252 | score one of 13 categories | terminal |
//! | 4 | 1 (terminal) | none | |
//!
//! 758 states in total. Rewards live on the step-3 scoring actions only.
//! Successors of an action are equally likely over distinct sorted outcomes.
//!
//! ## Modules
//!
//! | Concern | Module |
//! |---------|--------|
//! | Dice canonicalization and enumeration | [`dice_mechanics`] |
//! | Category rewards | [`game_mechanics`] |
//! | States and actions | [`graph`] |
//! | State/action enumeration | [`enumeration`] |
//! | Successor computation | [`transitions`] |
//! | Graph container and policy initialization | [`policy`] |
//! | Episode sampling and the five learners | [`learning`] |
//!
//! ## Usage
//!
//! Build the [`policy::Turn`] once; every learner clones it and returns the
//! annotated clone, leaving the base graph untouched.
//!
//! ```no_run
//! use yatzy_rl::learning::{mc_predictions, LearningConfig};
//! use yatzy_rl::policy::Turn;
//! use yatzy_rl::types::PolicyMode;
//!
//! let turn = Turn::new(PolicyMode::Uniform)?;
//! let learned = mc_predictions(&turn, &LearningConfig::default())?;
//! println!("V(initial) = {:.3}", learned.initial_state().value());
//! # Ok::<(), yatzy_rl::MdpError>(())
//! ```

#![allow(clippy::needless_range_loop)]

pub mod constants;
pub mod dice_mechanics;
pub mod enumeration;
pub mod env_config;
pub mod error;
pub mod game_mechanics;
pub mod graph;
pub mod learning;
pub mod policy;
pub mod transitions;
pub mod types;

pub use error::{MdpError, Result};
