//! Property-based tests for dice canonicalization and the reward evaluators.

use proptest::prelude::*;

use yatzy_rl::constants::*;
use yatzy_rl::dice_mechanics::{
    count_faces, enumerate_keeps, merge_dice, num_distinct_keeps, sort_dice_set,
};
use yatzy_rl::game_mechanics::{category_reward, score_final_hand};
use yatzy_rl::types::{Category, StateKey, ALL_CATEGORIES};

/// Strategy: a sorted 5-dice hand.
fn hand_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1..=6u8, NUM_DICE).prop_map(|mut dice| {
        sort_dice_set(&mut dice);
        dice
    })
}

fn category_strategy() -> impl Strategy<Value = Category> {
    (0..NUM_CATEGORIES).prop_map(|i| ALL_CATEGORIES[i])
}

proptest! {
    // 1. Rewards are never negative
    #[test]
    fn reward_non_negative(dice in hand_strategy(), cat in category_strategy()) {
        let reward = category_reward(&dice, cat);
        prop_assert!(reward >= 0, "reward={reward} for dice={dice:?} cat={cat}");
    }

    // 2. Every hand is offered exactly the 13 categories, in order
    #[test]
    fn thirteen_categories(dice in hand_strategy()) {
        let scores = score_final_hand(&dice);
        let categories: Vec<Category> = scores.iter().map(|s| s.category).collect();
        prop_assert_eq!(categories, ALL_CATEGORIES.to_vec());
    }

    // 3. Rewards depend only on the multiset, not the order
    #[test]
    fn reward_order_invariant(dice in prop::collection::vec(1..=6u8, NUM_DICE)) {
        let mut sorted = dice.clone();
        sort_dice_set(&mut sorted);
        prop_assert_eq!(score_final_hand(&dice), score_final_hand(&sorted));
    }

    // 4. Chance is the dice sum and the counts partition it
    #[test]
    fn chance_is_sum_of_counts(dice in hand_strategy()) {
        let sum: i32 = dice.iter().map(|&d| d as i32).sum();
        prop_assert_eq!(category_reward(&dice, Category::Chance), sum);
        let counts: i32 = (1..=6u8).map(|f| category_reward(&dice, Category::Count(f))).sum();
        prop_assert_eq!(counts, sum);
    }

    // 5. Five identical dice always score 50 for Yathzee
    #[test]
    fn yathzee_five_of_a_kind(face in 1..=6u8) {
        let dice = vec![face; NUM_DICE];
        prop_assert_eq!(category_reward(&dice, Category::Yathzee), YATHZEE_REWARD);
        prop_assert_eq!(category_reward(&dice, Category::Kind(4)), 5 * face as i32);
    }

    // 6. A four of a kind is also a three of a kind
    #[test]
    fn kind_four_implies_kind_three(dice in hand_strategy()) {
        if category_reward(&dice, Category::Kind(4)) > 0 {
            prop_assert!(category_reward(&dice, Category::Kind(3)) > 0);
        }
    }

    // 7. A large straight always contains a small straight
    #[test]
    fn large_straight_implies_small(dice in hand_strategy()) {
        if category_reward(&dice, Category::LargeStraight) > 0 {
            prop_assert_eq!(category_reward(&dice, Category::SmallStraight), SMALL_STRAIGHT_REWARD);
        }
    }

    // 8. Distinct keeps across all sizes match the (count + 1) product
    #[test]
    fn keep_count_matches_product(dice in hand_strategy()) {
        let total: usize = (0..=NUM_DICE).map(|k| enumerate_keeps(&dice, k).len()).sum();
        prop_assert_eq!(total, num_distinct_keeps(&dice));
    }

    // 9. Every keep is a sorted sub-multiset of the hand
    #[test]
    fn keeps_are_sorted_sub_multisets(dice in hand_strategy(), n_keep in 0..=NUM_DICE) {
        let have = count_faces(&dice);
        for keep in enumerate_keeps(&dice, n_keep) {
            prop_assert_eq!(keep.len(), n_keep);
            prop_assert!(keep.windows(2).all(|w| w[0] <= w[1]));
            let need = count_faces(&keep);
            prop_assert!(need.iter().zip(have.iter()).all(|(n, h)| n <= h));
        }
    }

    // 10. Merging a keep with a roll yields a valid canonical hand
    #[test]
    fn merge_is_canonical(
        dice in hand_strategy(),
        n_keep in 0..=NUM_DICE,
        rolled in prop::collection::vec(1..=6u8, NUM_DICE),
    ) {
        for keep in enumerate_keeps(&dice, n_keep) {
            let merged = merge_dice(&keep, &rolled[..NUM_DICE - n_keep]);
            prop_assert!(StateKey::new(2, merged).is_ok());
        }
    }
}

#[test]
fn both_straights_pay_for_one_to_five() {
    let dice = [1, 2, 3, 4, 5];
    assert_eq!(category_reward(&dice, Category::SmallStraight), 30);
    assert_eq!(category_reward(&dice, Category::LargeStraight), 40);
}
