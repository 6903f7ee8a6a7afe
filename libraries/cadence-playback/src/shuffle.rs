//! Shuffle ordering
//!
//! Shuffling works on positions rather than songs so the queue can follow
//! the exact entry that was current, even when the same song appears twice.

use rand::seq::SliceRandom;
use rand::Rng;

/// Random permutation of `0..len` (Fisher-Yates)
///
/// `order[new_position] == old_position`.
pub fn shuffled_order<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn order_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let order = shuffled_order(50, &mut rng);

        assert_eq!(order.len(), 50);
        let unique: HashSet<usize> = order.iter().copied().collect();
        assert_eq!(unique.len(), 50);
        assert!(order.iter().all(|&i| i < 50));
    }

    #[test]
    fn random_shuffle_changes_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let order = shuffled_order(20, &mut rng);

        // A seeded 20-element shuffle landing on identity would be a broken RNG
        assert_ne!(order, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_order() {
        let a = shuffled_order(10, &mut StdRng::seed_from_u64(3));
        let b = shuffled_order(10, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(shuffled_order(0, &mut rng).is_empty());
        assert_eq!(shuffled_order(1, &mut rng), vec![0]);
    }
}
