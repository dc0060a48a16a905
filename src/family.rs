//! Families of subsets.

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::Result;
use crate::mask::{check_mask, contains, set_from_mask, Mask};

/// A set of subset masks.
///
/// Iteration is always in ascending mask order, so two families compare equal
/// iff they hold the same masks, regardless of how they were built.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Family {
    masks: BTreeSet<Mask>,
}

impl Family {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a family from masks, checking every mask against the ground set `0..n`.
    pub fn from_masks_checked(masks: impl IntoIterator<Item = Mask>, n: usize) -> Result<Self> {
        let mut family = Family::new();
        for mask in masks {
            check_mask(mask, n)?;
            family.insert(mask);
        }
        Ok(family)
    }

    /// Inserts a mask. Returns true if it was not already present.
    pub fn insert(&mut self, mask: Mask) -> bool {
        self.masks.insert(mask)
    }

    pub fn contains(&self, mask: Mask) -> bool {
        self.masks.contains(&mask)
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Iterates over the masks in ascending order.
    pub fn iter(&self) -> btree_set::Iter<'_, Mask> {
        self.masks.iter()
    }

    /// Masks as an ascending vector.
    pub fn to_sorted_vec(&self) -> Vec<Mask> {
        self.masks.iter().copied().collect()
    }

    /// Number of member sets containing element `i`.
    pub fn count_containing(&self, i: usize) -> usize {
        self.masks.iter().filter(|&&m| contains(m, i)).count()
    }

    /// Members as explicit element lists.
    pub fn to_element_sets(&self, n: usize) -> Vec<Vec<usize>> {
        self.masks.iter().map(|&m| set_from_mask(m, n)).collect()
    }
}

impl FromIterator<Mask> for Family {
    fn from_iter<I: IntoIterator<Item = Mask>>(iter: I) -> Self {
        Self {
            masks: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[Mask; N]> for Family {
    fn from(masks: [Mask; N]) -> Self {
        masks.into_iter().collect()
    }
}

impl Extend<Mask> for Family {
    fn extend<I: IntoIterator<Item = Mask>>(&mut self, iter: I) {
        self.masks.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Family {
    type Item = &'a Mask;
    type IntoIter = btree_set::Iter<'a, Mask>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, m) in self.masks.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", m)?;
        }
        write!(f, "}}")
    }
}
