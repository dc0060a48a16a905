//! Enumeration of antichains in the subset lattice.
//!
//! An antichain is a collection of nonempty subsets of `0..n` in which no
//! member is a subset of another. Every antichain generates a distinct
//! union-closed family (its members are exactly the minimal nonempty sets of
//! the closure), so enumerating antichains enumerates union-closed families.
//!
//! # Order
//!
//! The universe of nonempty masks is sorted by `(popcount, value)`. Antichains
//! are produced by depth-first backtracking over that universe: the candidate
//! is emitted every time a mask is appended, and only masks later in the
//! universe are considered for extension. Hence every antichain appears exactly
//! once, with its masks in increasing sort-key order, and smaller sets are
//! explored first.
//!
//! # Example
//!
//! ```
//! use ucf_rs::antichain::antichains;
//!
//! let all: Vec<_> = antichains(2).unwrap().map(|a| a.masks().to_vec()).collect();
//! assert_eq!(all, vec![vec![1], vec![1, 2], vec![2], vec![3]]);
//! ```
//!
//! Note: the number of antichains grows doubly exponentially with `n`
//! (Dedekind numbers), so exhaustive enumeration is only practical for `n <= 6`.

use std::fmt;

use crate::error::Result;
use crate::mask::{check_ground_size, incomparable, popcount, set_from_mask, Mask};

/// A set of pairwise incomparable nonempty masks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Antichain(Vec<Mask>);

impl Antichain {
    /// Masks in the order they were chosen from the universe.
    pub fn masks(&self) -> &[Mask] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members as explicit element lists.
    pub fn to_element_sets(&self, n: usize) -> Vec<Vec<usize>> {
        self.0.iter().map(|&m| set_from_mask(m, n)).collect()
    }

    /// Returns true if the masks are nonempty, distinct and pairwise incomparable.
    pub fn is_valid(masks: &[Mask]) -> bool {
        masks.iter().enumerate().all(|(i, &a)| {
            a != 0 && masks[i + 1..].iter().all(|&b| incomparable(a, b))
        })
    }
}

impl From<Antichain> for Vec<Mask> {
    fn from(antichain: Antichain) -> Self {
        antichain.0
    }
}

impl fmt::Display for Antichain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// All nonempty masks over `0..n`, sorted by `(popcount, value)`.
pub fn universe(n: usize) -> Result<Vec<Mask>> {
    check_ground_size(n)?;
    let mut masks: Vec<Mask> = (1..(1 << n)).collect();
    masks.sort_by_key(|&m| (popcount(m), m));
    Ok(masks)
}

/// Returns a lazy iterator over all nonempty antichains of nonempty subsets of `0..n`.
///
/// Each call starts a fresh enumeration. Fails if `n` is not a supported
/// ground-set size.
pub fn antichains(n: usize) -> Result<Antichains> {
    Ok(Antichains::new(universe(n)?))
}

/// Iterator over antichains.
///
/// Created by [`antichains()`]. See the module documentation for the order.
///
/// # Implementation Notes
///
/// The recursion is unrolled onto an explicit stack. Frame `d` holds the next
/// universe index to try at depth `d`, and `current` holds the `d` masks chosen
/// so far. Only the emitted antichain is cloned.
#[derive(Debug, Clone)]
pub struct Antichains {
    universe: Vec<Mask>,
    /// Next universe index to try, one entry per depth
    stack: Vec<usize>,
    /// Current candidate antichain
    current: Vec<Mask>,
}

impl Antichains {
    fn new(universe: Vec<Mask>) -> Self {
        Self {
            universe,
            stack: vec![0],
            current: Vec::new(),
        }
    }

    /// Returns true if `m` is incomparable to every mask of the current candidate.
    fn compatible(&self, m: Mask) -> bool {
        self.current.iter().all(|&c| incomparable(c, m))
    }
}

impl Iterator for Antichains {
    type Item = Antichain;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = *self.stack.last()?;

            let found = (start..self.universe.len()).find(|&i| self.compatible(self.universe[i]));

            match found {
                Some(i) => {
                    // Resume after `i` when we come back to this depth
                    if let Some(top) = self.stack.last_mut() {
                        *top = i + 1;
                    }
                    self.current.push(self.universe[i]);
                    self.stack.push(i + 1);
                    return Some(Antichain(self.current.clone()));
                }
                None => {
                    // Depth exhausted: backtrack
                    self.stack.pop();
                    self.current.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use test_log::test;

    use super::*;
    use crate::error::UcError;
    use crate::mask::MAX_ELEMENTS;

    #[test]
    fn test_universe_order() {
        assert_eq!(universe(0).unwrap(), Vec::<Mask>::new());
        assert_eq!(universe(2).unwrap(), vec![1, 2, 3]);
        assert_eq!(universe(3).unwrap(), vec![1, 2, 4, 3, 5, 6, 7]);
    }

    #[test]
    fn test_n0() {
        assert_eq!(antichains(0).unwrap().count(), 0);
    }

    #[test]
    fn test_n1() {
        let all: Vec<_> = antichains(1).unwrap().collect();
        assert_eq!(all, vec![Antichain(vec![1])]);
    }

    #[test]
    fn test_n2() {
        let all: Vec<Vec<Mask>> = antichains(2).unwrap().map(Vec::from).collect();
        assert_eq!(all, vec![vec![1], vec![1, 2], vec![2], vec![3]]);

        let sets: Vec<_> = antichains(2).unwrap().map(|a| a.to_element_sets(2)).collect();
        assert_eq!(
            sets,
            vec![
                vec![vec![0]],
                vec![vec![0], vec![1]],
                vec![vec![1]],
                vec![vec![0, 1]],
            ]
        );
    }

    #[test]
    fn test_n3_prefix() {
        let first: Vec<Vec<Mask>> = antichains(3).unwrap().take(10).map(Vec::from).collect();
        assert_eq!(
            first,
            vec![
                vec![1],
                vec![1, 2],
                vec![1, 2, 4],
                vec![1, 4],
                vec![1, 6],
                vec![2],
                vec![2, 4],
                vec![2, 5],
                vec![4],
                vec![4, 3],
            ]
        );
    }

    #[test]
    fn test_counts() {
        // Dedekind numbers minus the two trivial antichains (empty, {{}})
        for (n, expected) in [(1, 1), (2, 4), (3, 18), (4, 166)] {
            assert_eq!(antichains(n).unwrap().count(), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_validity_and_uniqueness() {
        for n in 1..=4 {
            let mut seen = HashSet::new();
            for a in antichains(n).unwrap() {
                assert!(!a.is_empty());
                assert!(Antichain::is_valid(a.masks()), "invalid antichain {}", a);
                let mut key = a.masks().to_vec();
                key.sort_unstable();
                assert!(seen.insert(key), "duplicate antichain {}", a);
            }
        }
    }

    #[test]
    fn test_restartable() {
        let a: Vec<_> = antichains(3).unwrap().collect();
        let b: Vec<_> = antichains(3).unwrap().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_large() {
        let err = antichains(MAX_ELEMENTS + 1).unwrap_err();
        assert!(matches!(err, UcError::GroundSetTooLarge { .. }));
    }

    #[test]
    fn test_is_valid() {
        assert!(Antichain::is_valid(&[1, 2]));
        assert!(Antichain::is_valid(&[3, 5, 6]));
        assert!(!Antichain::is_valid(&[1, 3]));
        assert!(!Antichain::is_valid(&[1, 1]));
        assert!(!Antichain::is_valid(&[0, 1]));
    }
}
