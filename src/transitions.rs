//! Successor computation for every action.
//!
//! - Choice keeping k < 5 dice from step s: every canonical completion of the
//!   5 − k rerolled dice, merged with the kept dice, at step s + 1.
//! - Choice keeping all 5 dice: the step-3 state holding exactly those dice.
//! - Final action: the terminal state.
//!
//! Successors are looked up in the existing graph, never rebuilt. Each
//! distinct canonical outcome gets the same weight; outcomes are not weighted
//! by how many face-level rolls collapse into them.

use std::collections::HashMap;

use crate::constants::*;
use crate::dice_mechanics::{enumerate_dice_sets, merge_dice};
use crate::error::{MdpError, Result};
use crate::graph::{Action, ActionKind};
use crate::types::{StateId, StateKey};

/// Canonical rolls of 0..=5 dice, indexed by dice count.
pub struct RerollTable {
    rolls: Vec<Vec<Vec<u8>>>,
}

impl Default for RerollTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RerollTable {
    pub fn new() -> Self {
        Self {
            rolls: (0..=NUM_DICE).map(enumerate_dice_sets).collect(),
        }
    }

    /// Every sorted outcome of rolling `n_dice` dice.
    pub fn rolls(&self, n_dice: usize) -> &[Vec<u8>] {
        &self.rolls[n_dice]
    }
}

/// Keys of the states `action` can lead to, sorted and deduplicated.
pub fn successor_keys(action: &Action, table: &RerollTable) -> Vec<StateKey> {
    if let ActionKind::Final { .. } = action.kind() {
        return vec![StateKey::terminal()];
    }

    let keep = action.keep();
    if action.n_keep() == NUM_DICE {
        return vec![StateKey {
            step: LAST_ROLL_STEP,
            dice: keep.to_vec(),
        }];
    }

    let next_step = action.from_step() + 1;
    let mut keys: Vec<StateKey> = table
        .rolls(NUM_DICE - action.n_keep())
        .iter()
        .map(|rolled| StateKey {
            step: next_step,
            dice: merge_dice(keep, rolled),
        })
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Resolve successor keys to state ids.
pub fn resolve_successors(
    action: &Action,
    table: &RerollTable,
    index: &HashMap<StateKey, StateId>,
) -> Result<Vec<StateId>> {
    successor_keys(action, table)
        .into_iter()
        .map(|key| match index.get(&key) {
            Some(&id) => Ok(id),
            None => Err(MdpError::MissingSuccessor {
                action: action.key().clone(),
                key,
            }),
        })
        .collect()
}
