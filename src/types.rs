//! Identity keys, arena ids and small enums shared by the graph and the learners.
//!
//! States and actions are identified by explicit composite keys rather than by
//! where they live in memory, so a cloned [`crate::policy::Turn`] keeps the same
//! keys and accumulators keyed on them stay valid across copies:
//!
//! - state key = (step, canonical dice)
//! - action key = (keep count, canonical kept dice, category for final actions)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{MdpError, Result};

/// Index of a state inside a [`crate::policy::Turn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub usize);

/// Index of an action: owning state plus position in its action list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionId {
    pub state: StateId,
    pub index: usize,
}

impl ActionId {
    pub fn new(state: StateId, index: usize) -> Self {
        Self { state, index }
    }
}

/// Identity of a state: turn step and sorted dice.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey {
    pub step: u8,
    pub dice: Vec<u8>,
}

impl StateKey {
    /// Validated constructor.
    ///
    /// Steps 0 and 4 carry an empty hand, steps 1–3 a full 5-dice hand; dice
    /// must be faces in 1..=6 in non-decreasing order.
    pub fn new(step: u8, dice: Vec<u8>) -> Result<Self> {
        if step > TERMINAL_STEP {
            return Err(MdpError::InvalidStep(step));
        }
        check_dice(&dice)?;
        let expected = if is_roll_step(step) { NUM_DICE } else { 0 };
        if dice.len() != expected {
            return Err(MdpError::WrongHandSize {
                step,
                expected,
                actual: dice.len(),
            });
        }
        Ok(Self { step, dice })
    }

    pub fn initial() -> Self {
        Self {
            step: INITIAL_STEP,
            dice: Vec::new(),
        }
    }

    pub fn terminal() -> Self {
        Self {
            step: TERMINAL_STEP,
            dice: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.step == TERMINAL_STEP
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} {}", self.step, DiceDisplay(&self.dice))
    }
}

/// Identity of an action within its state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionKey {
    pub n_keep: usize,
    pub keep: Vec<u8>,
    pub category: Option<Category>,
}

impl ActionKey {
    pub fn choice(keep: Vec<u8>) -> Self {
        Self {
            n_keep: keep.len(),
            keep,
            category: None,
        }
    }

    pub fn scoring(keep: Vec<u8>, category: Category) -> Self {
        Self {
            n_keep: keep.len(),
            keep,
            category: Some(category),
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            Some(category) => write!(f, "{} {}", category, DiceDisplay(&self.keep)),
            None => write!(f, "keep {} {}", self.n_keep, DiceDisplay(&self.keep)),
        }
    }
}

struct DiceDisplay<'a>(&'a [u8]);

impl fmt::Display for DiceDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, ")")
    }
}

/// Check that `dice` is a canonical hand of at most five valid faces.
pub fn check_dice(dice: &[u8]) -> Result<()> {
    if dice.len() > NUM_DICE {
        return Err(MdpError::TooManyDice(dice.len()));
    }
    if let Some(&bad) = dice.iter().find(|&&d| !(MIN_FACE..=MAX_FACE).contains(&d)) {
        return Err(MdpError::InvalidFace(bad));
    }
    if dice.windows(2).any(|w| w[0] > w[1]) {
        return Err(MdpError::NonCanonicalDice(dice.to_vec()));
    }
    Ok(())
}

/// Scoring category of a final action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Sum of the dice showing the given face.
    Count(u8),
    /// Sum of all dice when some face appears at least this many times.
    Kind(u8),
    Full,
    SmallStraight,
    LargeStraight,
    Yathzee,
    Chance,
}

/// All final-action categories in the order they are offered.
pub const ALL_CATEGORIES: [Category; NUM_CATEGORIES] = [
    Category::Count(1),
    Category::Count(2),
    Category::Count(3),
    Category::Count(4),
    Category::Count(5),
    Category::Count(6),
    Category::Kind(3),
    Category::Kind(4),
    Category::Full,
    Category::SmallStraight,
    Category::LargeStraight,
    Category::Yathzee,
    Category::Chance,
];

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Count(face) => write!(f, "Count_{face}"),
            Category::Kind(k) => write!(f, "Kind_{k}"),
            Category::Full => write!(f, "Full"),
            Category::SmallStraight => write!(f, "Small_Straight"),
            Category::LargeStraight => write!(f, "Large_Straight"),
            Category::Yathzee => write!(f, "Yathzee"),
            Category::Chance => write!(f, "Chance"),
        }
    }
}

/// One evaluator result: a category and the reward it pays for a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryScore {
    pub category: Category,
    pub reward: i32,
}

/// How action probabilities are initialised when the graph is executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Equal probability across all legal actions.
    #[default]
    Uniform,
    /// Random weights normalised to sum to 1.
    Random,
}

impl FromStr for PolicyMode {
    type Err = MdpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uniform" => Ok(PolicyMode::Uniform),
            "random" => Ok(PolicyMode::Random),
            other => Err(MdpError::InvalidPolicyMode(other.to_string())),
        }
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyMode::Uniform => write!(f, "uniform"),
            PolicyMode::Random => write!(f, "random"),
        }
    }
}
