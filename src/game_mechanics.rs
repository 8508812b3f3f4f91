//! Scoring rules for the final (step 3) decision.
//!
//! Six evaluators map a completed 5-dice hand to one or more
//! [`CategoryScore`]s. [`score_final_hand`] runs all of them in
//! [`REWARD_EVALUATORS`] order and returns the 13 scoring options.
//!
//! The straight checks are independent: a hand containing 1-2-3-4-5 pays both
//! the small (30) and the large (40) straight.

use std::collections::BTreeSet;

use crate::constants::*;
use crate::dice_mechanics::{count_faces, max_multiplicity};
use crate::types::{Category, CategoryScore};

/// A reward evaluator over a sorted 5-dice hand.
pub type RewardEvaluator = fn(&[u8]) -> Vec<CategoryScore>;

/// Evaluators in the order their categories are offered.
pub const REWARD_EVALUATORS: [RewardEvaluator; 6] = [
    score_counts,
    score_kinds,
    score_full,
    score_straights,
    score_yathzee,
    score_chance,
];

/// Count_v for v in 1..=6: sum of the dice showing v.
pub fn score_counts(dice: &[u8]) -> Vec<CategoryScore> {
    let face_count = count_faces(dice);
    (MIN_FACE..=MAX_FACE)
        .map(|face| CategoryScore {
            category: Category::Count(face),
            reward: face as i32 * face_count[face as usize] as i32,
        })
        .collect()
}

/// Kind_3 and Kind_4: sum of all dice if some face appears at least k times.
pub fn score_kinds(dice: &[u8]) -> Vec<CategoryScore> {
    let most = max_multiplicity(dice);
    let sum = dice_sum(dice);
    [3u8, 4]
        .into_iter()
        .map(|k| CategoryScore {
            category: Category::Kind(k),
            reward: if most >= k as usize { sum } else { 0 },
        })
        .collect()
}

/// Full: 25 for exactly two distinct faces where the rarer one appears at least twice.
pub fn score_full(dice: &[u8]) -> Vec<CategoryScore> {
    let face_count = count_faces(dice);
    let present: Vec<usize> = face_count[1..].iter().copied().filter(|&c| c > 0).collect();
    let is_full = present.len() == 2 && present.iter().all(|&c| c >= 2);
    vec![CategoryScore {
        category: Category::Full,
        reward: if is_full { FULL_REWARD } else { 0 },
    }]
}

/// Small_Straight (30) and Large_Straight (40), checked independently.
pub fn score_straights(dice: &[u8]) -> Vec<CategoryScore> {
    let faces: BTreeSet<u8> = dice.iter().copied().collect();
    let small = SMALL_STRAIGHTS
        .iter()
        .any(|run| run.iter().all(|f| faces.contains(f)));
    let large = LARGE_STRAIGHTS
        .iter()
        .any(|run| run.iter().all(|f| faces.contains(f)));
    vec![
        CategoryScore {
            category: Category::SmallStraight,
            reward: if small { SMALL_STRAIGHT_REWARD } else { 0 },
        },
        CategoryScore {
            category: Category::LargeStraight,
            reward: if large { LARGE_STRAIGHT_REWARD } else { 0 },
        },
    ]
}

/// Yathzee: 50 if all five dice match.
pub fn score_yathzee(dice: &[u8]) -> Vec<CategoryScore> {
    let faces: BTreeSet<u8> = dice.iter().copied().collect();
    vec![CategoryScore {
        category: Category::Yathzee,
        reward: if faces.len() == 1 { YATHZEE_REWARD } else { 0 },
    }]
}

/// Chance: sum of all dice.
pub fn score_chance(dice: &[u8]) -> Vec<CategoryScore> {
    vec![CategoryScore {
        category: Category::Chance,
        reward: dice_sum(dice),
    }]
}

/// All 13 scoring options for a completed hand.
pub fn score_final_hand(dice: &[u8]) -> Vec<CategoryScore> {
    REWARD_EVALUATORS
        .iter()
        .flat_map(|evaluate| evaluate(dice))
        .collect()
}

/// Reward paid by `category` for `dice`.
pub fn category_reward(dice: &[u8], category: Category) -> i32 {
    score_final_hand(dice)
        .into_iter()
        .find(|s| s.category == category)
        .map_or(0, |s| s.reward)
}

fn dice_sum(dice: &[u8]) -> i32 {
    dice.iter().map(|&d| d as i32).sum()
}
