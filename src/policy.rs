//! The turn graph container.
//!
//! [`Turn`] owns every state of one Yatzy turn, indexes them by
//! (step, sorted dice), and initialises the action-selection policy. It is
//! built once and eagerly; learners take a clone and annotate that copy.

use std::collections::HashMap;
use std::ops::Range;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::constants::*;
use crate::enumeration::enumerate_states;
use crate::error::{MdpError, Result};
use crate::graph::{Action, State};
use crate::transitions::{resolve_successors, RerollTable};
use crate::types::{ActionId, PolicyMode, StateId, StateKey};

#[derive(Clone, Debug)]
pub struct Turn {
    states: Vec<State>,
    index: HashMap<StateKey, StateId>,
    step_ranges: Vec<Range<usize>>,
    policy_mode: PolicyMode,
    seed: u64,
}

impl Turn {
    /// Build the full graph with the default seed.
    pub fn new(policy_mode: PolicyMode) -> Result<Self> {
        Self::with_seed(policy_mode, DEFAULT_SEED)
    }

    /// Build from a policy mode name (`"uniform"` or `"random"`).
    pub fn from_mode_name(name: &str) -> Result<Self> {
        Self::new(name.parse()?)
    }

    /// Build the full graph; `seed` drives `PolicyMode::Random` initialisation.
    pub fn with_seed(policy_mode: PolicyMode, seed: u64) -> Result<Self> {
        let start = Instant::now();
        let states = enumerate_states()?;

        let mut index = HashMap::with_capacity(states.len());
        let mut step_ranges = vec![0..0; NUM_STEPS];
        for state in &states {
            if index.insert(state.key().clone(), state.id()).is_some() {
                return Err(MdpError::DuplicateState(state.key().clone()));
            }
            let range = &mut step_ranges[state.step() as usize];
            if range.is_empty() {
                *range = state.id().0..state.id().0 + 1;
            } else {
                range.end = state.id().0 + 1;
            }
        }

        let mut turn = Self {
            states,
            index,
            step_ranges,
            policy_mode,
            seed,
        };
        turn.execute()?;

        log::info!(
            "Built turn graph: {} states, {} actions ({} policy) in {:.2?}",
            turn.num_states(),
            turn.num_actions(),
            turn.policy_mode,
            start.elapsed()
        );
        Ok(turn)
    }

    /// Link every action to its successors, then initialise each state's
    /// action probabilities under the current policy mode.
    ///
    /// Successors are computed for the whole graph before anything is written,
    /// so a failure leaves the turn untouched.
    pub fn execute(&mut self) -> Result<()> {
        let table = RerollTable::new();
        let index = &self.index;

        // Parallel computation: collect results then scatter back
        let successors: Vec<Vec<Vec<StateId>>> = self
            .states
            .par_iter()
            .map(|state| {
                state
                    .actions()
                    .iter()
                    .map(|action| resolve_successors(action, &table, index))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for (state, action_successors) in self.states.iter_mut().zip(successors) {
            for (action, succ) in state.actions_mut().iter_mut().zip(action_successors) {
                action.set_successors(succ);
            }
            state.init_probabilities(self.policy_mode, &mut rng);
        }
        log::debug!("Populated transitions under {} policy", self.policy_mode);
        Ok(())
    }

    pub fn policy_mode(&self) -> PolicyMode {
        self.policy_mode
    }

    /// Switch policy mode: re-populates transitions and re-normalises
    /// probabilities. Topology is unchanged.
    pub fn set_policy_mode(&mut self, policy_mode: PolicyMode) -> Result<()> {
        let previous = self.policy_mode;
        self.policy_mode = policy_mode;
        self.execute().inspect_err(|_| self.policy_mode = previous)
    }

    /// All states in one flat sequence, ordered by step.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// States of one step (empty for steps past the terminal one).
    pub fn states_at_step(&self, step: u8) -> &[State] {
        match self.step_ranges.get(step as usize) {
            Some(range) => &self.states[range.clone()],
            None => &[],
        }
    }

    /// Panics if `id` does not come from this turn.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    pub(crate) fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.0]
    }

    pub fn state_id(&self, key: &StateKey) -> Option<StateId> {
        self.index.get(key).copied()
    }

    pub fn get_state(&self, key: &StateKey) -> Option<&State> {
        self.state_id(key).map(|id| self.state(id))
    }

    pub fn initial_state(&self) -> &State {
        &self.states[0]
    }

    pub fn terminal_state(&self) -> &State {
        &self.states[self.states.len() - 1]
    }

    /// Panics if `id` does not come from this turn.
    pub fn action(&self, id: ActionId) -> &Action {
        &self.states[id.state.0].actions()[id.index]
    }

    pub(crate) fn action_mut(&mut self, id: ActionId) -> &mut Action {
        &mut self.states[id.state.0].actions_mut()[id.index]
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_actions(&self) -> usize {
        self.states.iter().map(|s| s.actions().len()).sum()
    }

    /// Draw one successor of `id`, uniformly over its successor set.
    pub fn sample_successor<R: Rng + ?Sized>(&self, id: ActionId, rng: &mut R) -> Option<StateId> {
        self.action(id).successors().choose(rng).copied()
    }

    /// Zero every state value estimate. Action values are kept.
    pub fn reset_state_values(&mut self) {
        for state in &mut self.states {
            state.set_value(0.0);
        }
    }

    /// Zero every state and action value estimate.
    pub fn reset_values(&mut self) {
        self.reset_state_values();
        for state in &mut self.states {
            for action in state.actions_mut() {
                action.set_value(0.0);
            }
        }
    }
}
