//! Dice canonicalization and combinatorial enumeration.
//!
//! Every hand is stored sorted ascending, so permutations collapse to one
//! multiset. Enumeration builds each position with a value no smaller than the
//! previous one, which yields every multiset exactly once without a dedup pass.

use std::collections::BTreeSet;

use crate::constants::*;

/// Count occurrences of each face (1-6).
/// face_count[0] is unused; face_count[f] = count of face f.
pub fn count_faces(dice: &[u8]) -> [usize; 7] {
    let mut face_count = [0usize; 7];
    for &d in dice {
        face_count[d as usize] += 1;
    }
    face_count
}

/// Highest multiplicity of any face (0 for an empty hand).
pub fn max_multiplicity(dice: &[u8]) -> usize {
    count_faces(dice).iter().copied().max().unwrap_or(0)
}

/// Normalize dice to canonical sorted form (ascending).
pub fn sort_dice_set(dice: &mut [u8]) {
    dice.sort_unstable();
}

/// Canonical union of kept dice and freshly rolled dice.
pub fn merge_dice(kept: &[u8], rolled: &[u8]) -> Vec<u8> {
    let mut merged = Vec::with_capacity(kept.len() + rolled.len());
    merged.extend_from_slice(kept);
    merged.extend_from_slice(rolled);
    sort_dice_set(&mut merged);
    merged
}

/// Number of sorted multisets of `n_dice` dice over six faces: C(n_dice + 5, 5).
pub fn num_dice_sets(n_dice: usize) -> usize {
    let faces = (MAX_FACE - MIN_FACE + 1) as usize;
    let mut count = 1usize;
    for i in 1..faces {
        count = count * (n_dice + i) / i;
    }
    count
}

/// Enumerate every sorted multiset of `n_dice` dice, in lexicographic order.
///
/// `enumerate_dice_sets(5)` is R_{5,6} (252 hands); `enumerate_dice_sets(0)`
/// is the single empty hand.
pub fn enumerate_dice_sets(n_dice: usize) -> Vec<Vec<u8>> {
    let mut store = Vec::with_capacity(num_dice_sets(n_dice));
    extend_dice_sets(Vec::with_capacity(n_dice), n_dice, MIN_FACE, &mut store);
    store
}

fn extend_dice_sets(prefix: Vec<u8>, n_dice: usize, min_face: u8, store: &mut Vec<Vec<u8>>) {
    if prefix.len() == n_dice {
        store.push(prefix);
        return;
    }
    for face in min_face..=MAX_FACE {
        let mut next = prefix.clone();
        next.push(face);
        extend_dice_sets(next, n_dice, face, store);
    }
}

/// Distinct sorted sub-multisets of size `n_keep` drawn from the positions of `hand`.
///
/// Different position choices can keep the same values (e.g. either 1 of
/// [1, 1, 2, 3, 4]); those collapse to one entry.
pub fn enumerate_keeps(hand: &[u8], n_keep: usize) -> Vec<Vec<u8>> {
    let mut store = BTreeSet::new();
    extend_keeps(hand, Vec::with_capacity(n_keep), n_keep, 0, &mut store);
    store.into_iter().collect()
}

fn extend_keeps(
    hand: &[u8],
    prefix: Vec<u8>,
    n_keep: usize,
    start: usize,
    store: &mut BTreeSet<Vec<u8>>,
) {
    if prefix.len() == n_keep {
        store.insert(prefix);
        return;
    }
    let remaining = n_keep - prefix.len();
    if hand.len() < start + remaining {
        return;
    }
    for pos in start..=(hand.len() - remaining) {
        let mut next = prefix.clone();
        next.push(hand[pos]);
        extend_keeps(hand, next, n_keep, pos + 1, store);
    }
}

/// Number of distinct keeps of any size: product of (count_f + 1) over faces.
pub fn num_distinct_keeps(hand: &[u8]) -> usize {
    count_faces(hand)[1..].iter().map(|&c| c + 1).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_dice_set() {
        let mut d1 = [5, 3, 1, 4, 2];
        sort_dice_set(&mut d1);
        assert_eq!(d1, [1, 2, 3, 4, 5]);

        let mut d2 = [6, 6, 1, 6, 1];
        sort_dice_set(&mut d2);
        assert_eq!(d2, [1, 1, 6, 6, 6]);
    }

    #[test]
    fn test_count_faces() {
        let fc = count_faces(&[1, 1, 2, 3, 3]);
        assert_eq!(fc[1], 2);
        assert_eq!(fc[2], 1);
        assert_eq!(fc[3], 2);
        assert_eq!(fc[4], 0);
        assert_eq!(max_multiplicity(&[1, 1, 2, 3, 3]), 2);
        assert_eq!(max_multiplicity(&[6, 6, 6, 6, 6]), 5);
        assert_eq!(max_multiplicity(&[]), 0);
    }

    #[test]
    fn test_enumerate_dice_sets_counts() {
        assert_eq!(enumerate_dice_sets(0), vec![Vec::<u8>::new()]);
        for n in 0..=5 {
            assert_eq!(enumerate_dice_sets(n).len(), num_dice_sets(n), "n={n}");
        }
        assert_eq!(num_dice_sets(5), NUM_DICE_SETS);
        assert_eq!(num_dice_sets(1), 6);
        assert_eq!(num_dice_sets(2), 21);
    }

    #[test]
    fn test_enumerate_dice_sets_canonical_and_unique() {
        let sets = enumerate_dice_sets(5);
        assert_eq!(sets.first().unwrap(), &vec![1, 1, 1, 1, 1]);
        assert_eq!(sets.last().unwrap(), &vec![6, 6, 6, 6, 6]);
        for s in &sets {
            assert!(s.windows(2).all(|w| w[0] <= w[1]), "{s:?} not sorted");
        }
        let unique: BTreeSet<_> = sets.iter().collect();
        assert_eq!(unique.len(), sets.len());
    }

    #[test]
    fn test_enumerate_keeps_dedup() {
        let hand = [1, 1, 2, 3, 4];
        assert_eq!(enumerate_keeps(&hand, 0), vec![Vec::<u8>::new()]);
        assert_eq!(
            enumerate_keeps(&hand, 1),
            vec![vec![1], vec![2], vec![3], vec![4]]
        );
        assert_eq!(enumerate_keeps(&hand, 5), vec![vec![1, 1, 2, 3, 4]]);
        let total: usize = (0..=5).map(|k| enumerate_keeps(&hand, k).len()).sum();
        assert_eq!(total, num_distinct_keeps(&hand));
        assert_eq!(total, 3 * 2 * 2 * 2);
    }

    #[test]
    fn test_enumerate_keeps_yatzy_hand() {
        let hand = [6, 6, 6, 6, 6];
        for k in 0..=5 {
            assert_eq!(enumerate_keeps(&hand, k), vec![vec![6; k]]);
        }
    }

    #[test]
    fn test_merge_dice() {
        assert_eq!(merge_dice(&[2, 5], &[1, 3, 6]), vec![1, 2, 3, 5, 6]);
        assert_eq!(merge_dice(&[], &[4, 4]), vec![4, 4]);
    }
}
