//! States and actions of the turn graph.
//!
//! A [`State`] owns its outgoing [`Action`]s; actions refer back to their
//! origin and forward to successors by [`StateId`], so the whole graph is a
//! flat arena that clones into an independent copy.
//!
//! After construction only two annotations change: value estimates (on both
//! states and actions) and action selection probabilities.

use std::collections::HashSet;

use rand::Rng;

use crate::constants::*;
use crate::dice_mechanics::count_faces;
use crate::error::{MdpError, Result};
use crate::types::{check_dice, ActionKey, CategoryScore, Category, PolicyMode, StateId, StateKey};

/// Non-final choices carry no reward; final choices carry the category reward
/// fixed when the graph is built.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionKind {
    /// Keep some dice and reroll the rest (steps 0–2).
    Choice,
    /// Score the hand in a category and end the turn (step 3).
    Final { category: Category, reward: i32 },
}

#[derive(Clone, Debug)]
pub struct Action {
    from: StateId,
    from_step: u8,
    key: ActionKey,
    kind: ActionKind,
    probability: f64,
    value: f64,
    successors: Vec<StateId>,
}

impl Action {
    /// Keep `keep` from `origin`'s hand and reroll the other dice.
    ///
    /// `keep` must be a canonical sub-multiset of the origin hand, and the
    /// origin must be at step 0–2 (step 0 only allows keeping nothing).
    pub fn choice(origin: &State, keep: Vec<u8>) -> Result<Self> {
        let step = origin.step();
        if step >= LAST_ROLL_STEP {
            return Err(MdpError::MalformedActions {
                state: origin.key().clone(),
                reason: format!("keep/reroll choices are only legal before step {LAST_ROLL_STEP}"),
            });
        }
        check_dice(&keep)?;
        if !is_sub_multiset(&keep, origin.dice()) {
            return Err(MdpError::MalformedActions {
                state: origin.key().clone(),
                reason: format!("kept dice {keep:?} are not part of the hand"),
            });
        }
        Ok(Self::new(origin, ActionKey::choice(keep), ActionKind::Choice))
    }

    /// Score `origin`'s hand with a precomputed category result.
    pub fn scoring(origin: &State, score: CategoryScore) -> Result<Self> {
        if origin.step() != LAST_ROLL_STEP {
            return Err(MdpError::MalformedActions {
                state: origin.key().clone(),
                reason: format!("scoring actions are only legal at step {LAST_ROLL_STEP}"),
            });
        }
        let key = ActionKey::scoring(origin.dice().to_vec(), score.category);
        Ok(Self::new(
            origin,
            key,
            ActionKind::Final {
                category: score.category,
                reward: score.reward,
            },
        ))
    }

    fn new(origin: &State, key: ActionKey, kind: ActionKind) -> Self {
        Self {
            from: origin.id(),
            from_step: origin.step(),
            key,
            kind,
            probability: 1.0,
            value: 0.0,
            successors: Vec::new(),
        }
    }

    pub fn key(&self) -> &ActionKey {
        &self.key
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Origin state.
    pub fn from(&self) -> StateId {
        self.from
    }

    pub fn from_step(&self) -> u8 {
        self.from_step
    }

    pub fn n_keep(&self) -> usize {
        self.key.n_keep
    }

    pub fn keep(&self) -> &[u8] {
        &self.key.keep
    }

    pub fn is_final(&self) -> bool {
        matches!(self.kind, ActionKind::Final { .. })
    }

    pub fn category(&self) -> Option<Category> {
        match self.kind {
            ActionKind::Final { category, .. } => Some(category),
            ActionKind::Choice => None,
        }
    }

    pub fn reward(&self) -> f64 {
        match self.kind {
            ActionKind::Final { reward, .. } => reward as f64,
            ActionKind::Choice => 0.0,
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn set_probability(&mut self, probability: f64) {
        self.probability = probability;
    }

    /// Action-value estimate Q(s, a).
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn successors(&self) -> &[StateId] {
        &self.successors
    }

    /// Sampling weight of each successor: uniform over distinct canonical outcomes.
    pub fn successor_weights(&self) -> Vec<f64> {
        let n = self.successors.len();
        vec![1.0 / n as f64; n]
    }

    pub(crate) fn set_successors(&mut self, successors: Vec<StateId>) {
        self.successors = successors;
    }
}

#[derive(Clone, Debug)]
pub struct State {
    id: StateId,
    key: StateKey,
    value: f64,
    actions: Vec<Action>,
}

impl State {
    pub fn new(id: StateId, key: StateKey) -> Self {
        Self {
            id,
            key,
            value: 0.0,
            actions: Vec::new(),
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn key(&self) -> &StateKey {
        &self.key
    }

    pub fn step(&self) -> u8 {
        self.key.step
    }

    pub fn dice(&self) -> &[u8] {
        &self.key.dice
    }

    pub fn is_terminal(&self) -> bool {
        self.key.is_terminal()
    }

    /// State-value estimate V(s).
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub(crate) fn actions_mut(&mut self) -> &mut [Action] {
        &mut self.actions
    }

    /// Attach outgoing actions.
    ///
    /// Rejects actions built for another state, duplicate action keys, and any
    /// action on the terminal state.
    pub fn set_actions(&mut self, actions: Vec<Action>) -> Result<()> {
        if self.is_terminal() && !actions.is_empty() {
            return Err(MdpError::TerminalState(self.key.clone()));
        }
        let mut seen = HashSet::with_capacity(actions.len());
        for action in &actions {
            if action.from != self.id || action.from_step != self.step() {
                return Err(MdpError::MalformedActions {
                    state: self.key.clone(),
                    reason: format!("action {} was built for another state", action.key),
                });
            }
            if !seen.insert(&action.key) {
                return Err(MdpError::MalformedActions {
                    state: self.key.clone(),
                    reason: format!("duplicate action {}", action.key),
                });
            }
        }
        self.actions = actions;
        Ok(())
    }

    pub fn action_probabilities(&self) -> Vec<f64> {
        self.actions.iter().map(Action::probability).collect()
    }

    pub fn action_values(&self) -> Vec<f64> {
        self.actions.iter().map(Action::value).collect()
    }

    /// Initialise action probabilities under `mode`. No-op without actions.
    pub fn init_probabilities<R: Rng>(&mut self, mode: PolicyMode, rng: &mut R) {
        let n = self.actions.len();
        if n == 0 {
            return;
        }
        let weights: Vec<f64> = match mode {
            PolicyMode::Uniform => vec![1.0; n],
            PolicyMode::Random => (0..n).map(|_| rng.random::<f64>()).collect(),
        };
        let total: f64 = weights.iter().sum();
        for (action, w) in self.actions.iter_mut().zip(weights) {
            action.probability = if total > 0.0 { w / total } else { 1.0 / n as f64 };
        }
    }

    /// Indices of the actions whose value equals the maximum (ties kept).
    pub fn best_action_indices(&self) -> Vec<usize> {
        let best = self
            .actions
            .iter()
            .map(Action::value)
            .fold(f64::NEG_INFINITY, f64::max);
        self.actions
            .iter()
            .enumerate()
            .filter(|(_, a)| a.value == best)
            .map(|(i, _)| i)
            .collect()
    }
}

fn is_sub_multiset(part: &[u8], whole: &[u8]) -> bool {
    let have = count_faces(whole);
    let need = count_faces(part);
    need.iter().zip(have.iter()).all(|(n, h)| n <= h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn state(id: usize, step: u8, dice: Vec<u8>) -> State {
        State::new(StateId(id), StateKey::new(step, dice).unwrap())
    }

    #[test]
    fn test_choice_validation() {
        let s = state(0, 1, vec![1, 1, 2, 3, 4]);
        assert!(Action::choice(&s, vec![1, 1]).is_ok());
        assert!(Action::choice(&s, vec![1, 1, 1]).is_err());
        assert!(Action::choice(&s, vec![2, 1]).is_err());

        let last = state(1, 3, vec![1, 1, 2, 3, 4]);
        assert!(Action::choice(&last, vec![]).is_err());
    }

    #[test]
    fn test_scoring_only_at_last_step() {
        let score = CategoryScore {
            category: Category::Chance,
            reward: 11,
        };
        let s = state(0, 2, vec![1, 1, 2, 3, 4]);
        assert!(Action::scoring(&s, score).is_err());

        let last = state(1, 3, vec![1, 1, 2, 3, 4]);
        let a = Action::scoring(&last, score).unwrap();
        assert!(a.is_final());
        assert_eq!(a.reward(), 11.0);
        assert_eq!(a.category(), Some(Category::Chance));
        assert_eq!(a.n_keep(), 5);
    }

    #[test]
    fn test_set_actions_rejects_foreign_and_duplicate() {
        let mut s = state(0, 1, vec![1, 2, 3, 4, 5]);
        let other = state(1, 1, vec![1, 2, 3, 4, 6]);

        let foreign = Action::choice(&other, vec![1]).unwrap();
        assert!(matches!(
            s.set_actions(vec![foreign]),
            Err(MdpError::MalformedActions { .. })
        ));

        let a = Action::choice(&s, vec![1]).unwrap();
        let b = Action::choice(&s, vec![1]).unwrap();
        assert!(s.set_actions(vec![a, b]).is_err());
        assert!(s.actions().is_empty());
    }

    #[test]
    fn test_init_probabilities_sum_to_one() {
        let mut s = state(0, 1, vec![1, 2, 3, 4, 5]);
        let actions = vec![
            Action::choice(&s, vec![]).unwrap(),
            Action::choice(&s, vec![1]).unwrap(),
            Action::choice(&s, vec![1, 2]).unwrap(),
        ];
        s.set_actions(actions).unwrap();

        let mut rng = SmallRng::seed_from_u64(42);
        s.init_probabilities(PolicyMode::Uniform, &mut rng);
        for p in s.action_probabilities() {
            assert!((p - 1.0 / 3.0).abs() < 1e-12);
        }

        s.init_probabilities(PolicyMode::Random, &mut rng);
        let sum: f64 = s.action_probabilities().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_action_ties() {
        let mut s = state(0, 1, vec![1, 2, 3, 4, 5]);
        let actions = vec![
            Action::choice(&s, vec![]).unwrap(),
            Action::choice(&s, vec![1]).unwrap(),
            Action::choice(&s, vec![2]).unwrap(),
        ];
        s.set_actions(actions).unwrap();
        assert_eq!(s.best_action_indices(), vec![0, 1, 2]);

        s.actions_mut()[1].set_value(2.0);
        s.actions_mut()[2].set_value(2.0);
        assert_eq!(s.best_action_indices(), vec![1, 2]);
    }
}
