//! State and action enumeration for the turn graph.
//!
//! [`enumerate_states`] lays the graph out step by step:
//!
//! | Step | States | Actions per state |
//! |------|--------|-------------------|
//! | 0 | 1 (empty hand) | 1 pass-through roll |
//! | 1, 2 | 252 each | one per distinct kept sub-multiset (0–5 dice) |
//! | 3 | 252 | 13 scoring categories |
//! | 4 | 1 (terminal) | none |
//!
//! Every non-terminal state gets its actions as soon as it is built. State ids
//! are positions in the returned vector, so steps occupy contiguous ranges.

use crate::constants::*;
use crate::dice_mechanics::{enumerate_dice_sets, enumerate_keeps};
use crate::error::{MdpError, Result};
use crate::game_mechanics::score_final_hand;
use crate::graph::{Action, State};
use crate::types::{StateId, StateKey};

/// All states of a turn, steps 0 through 4, with actions attached.
pub fn enumerate_states() -> Result<Vec<State>> {
    let mut states = Vec::with_capacity(NUM_STATES);
    for step in INITIAL_STEP..=TERMINAL_STEP {
        let layer = enumerate_step_states(step, states.len())?;
        states.extend(layer);
    }
    Ok(states)
}

/// States of a single step, with ids starting at `first_id`.
///
/// Steps 0 and 4 hold one state with an empty hand; steps 1–3 hold every
/// sorted 5-dice hand.
pub fn enumerate_step_states(step: u8, first_id: usize) -> Result<Vec<State>> {
    let hands = if is_roll_step(step) {
        enumerate_dice_sets(NUM_DICE)
    } else if step == INITIAL_STEP || step == TERMINAL_STEP {
        vec![Vec::new()]
    } else {
        return Err(MdpError::InvalidStep(step));
    };

    hands
        .into_iter()
        .enumerate()
        .map(|(offset, dice)| {
            let key = StateKey::new(step, dice)?;
            let mut state = State::new(StateId(first_id + offset), key);
            if !state.is_terminal() {
                let actions = enumerate_actions(&state)?;
                state.set_actions(actions)?;
            }
            Ok(state)
        })
        .collect()
}

/// Legal actions from `state`.
pub fn enumerate_actions(state: &State) -> Result<Vec<Action>> {
    match state.step() {
        INITIAL_STEP => Ok(vec![Action::choice(state, Vec::new())?]),
        LAST_ROLL_STEP => enumerate_final_actions(state),
        TERMINAL_STEP => Err(MdpError::TerminalState(state.key().clone())),
        _ => {
            let hand = state.dice();
            let mut actions = Vec::new();
            for n_keep in 0..=hand.len() {
                for keep in enumerate_keeps(hand, n_keep) {
                    actions.push(Action::choice(state, keep)?);
                }
            }
            Ok(actions)
        }
    }
}

/// One scoring action per category returned by the reward evaluators.
pub fn enumerate_final_actions(state: &State) -> Result<Vec<Action>> {
    score_final_hand(state.dice())
        .into_iter()
        .map(|score| Action::scoring(state, score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice_mechanics::num_distinct_keeps;

    #[test]
    fn test_layer_sizes() {
        assert_eq!(enumerate_step_states(0, 0).unwrap().len(), 1);
        for step in 1..=3 {
            assert_eq!(enumerate_step_states(step, 0).unwrap().len(), NUM_DICE_SETS);
        }
        assert_eq!(enumerate_step_states(4, 0).unwrap().len(), 1);
        assert!(enumerate_step_states(7, 0).is_err());
    }

    #[test]
    fn test_state_ids_are_positions() {
        let states = enumerate_states().unwrap();
        assert_eq!(states.len(), NUM_STATES);
        for (i, s) in states.iter().enumerate() {
            assert_eq!(s.id(), StateId(i));
        }
        assert_eq!(states[0].key(), &StateKey::initial());
        assert_eq!(states[NUM_STATES - 1].key(), &StateKey::terminal());
    }

    #[test]
    fn test_action_counts_per_step() {
        let initial = &enumerate_step_states(0, 0).unwrap()[0];
        assert_eq!(initial.actions().len(), 1);
        assert_eq!(initial.actions()[0].n_keep(), 0);

        for state in enumerate_step_states(1, 1).unwrap() {
            assert_eq!(state.actions().len(), num_distinct_keeps(state.dice()));
        }
        for state in enumerate_step_states(3, 1).unwrap() {
            assert_eq!(state.actions().len(), NUM_CATEGORIES);
            assert!(state.actions().iter().all(|a| a.is_final()));
        }
        let terminal = &enumerate_step_states(4, 0).unwrap()[0];
        assert!(terminal.actions().is_empty());
        assert!(matches!(
            enumerate_actions(terminal),
            Err(MdpError::TerminalState(_))
        ));
    }

    #[test]
    fn test_distinct_hand_has_32_choices() {
        let state = State::new(StateId(0), StateKey::new(2, vec![1, 2, 3, 4, 6]).unwrap());
        let actions = enumerate_actions(&state).unwrap();
        assert_eq!(actions.len(), 32);
        assert_eq!(actions.first().unwrap().n_keep(), 0);
        assert_eq!(actions.last().unwrap().keep(), &[1, 2, 3, 4, 6]);
    }
}
