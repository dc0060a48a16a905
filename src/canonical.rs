//! Canonical forms of families under relabeling of the ground set.
//!
//! Two families over `0..n` are isomorphic if some permutation of the elements
//! maps one onto the other. The canonical form of a family is the
//! lexicographically smallest ascending mask sequence over all `n!` images, so
//! two families are isomorphic iff their canonical forms are equal.
//!
//! The search is exhaustive on purpose: no pruning, no refinement heuristics.
//! It dominates the running time of the whole exploration and bounds the
//! practical ground set to about six elements.
//!
//! # Example
//!
//! ```
//! use ucf_rs::canonical::canonical_form;
//! use ucf_rs::family::Family;
//!
//! // {∅, {2}} and {∅, {0}} are the same family up to relabeling
//! let f = Family::from([0, 0b100]);
//! let g = Family::from([0, 0b001]);
//! assert_eq!(canonical_form(&f, 3), canonical_form(&g, 3));
//! ```

use std::fmt;

use crate::error::{Result, UcError};
use crate::family::Family;
use crate::mask::{check_ground_size, check_mask, elements, Mask};

/// A permutation of the ground set `0..n`, mapping element `i` to `images[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    images: Vec<usize>,
}

impl Permutation {
    /// Creates a permutation from its images.
    ///
    /// Fails unless `images` contains every index of `0..images.len()` exactly once.
    pub fn new(images: Vec<usize>) -> Result<Self> {
        let n = images.len();
        let mut hit = vec![false; n];
        for &x in &images {
            if x >= n || hit[x] {
                return Err(UcError::InvalidPermutation { images });
            }
            hit[x] = true;
        }
        Ok(Self { images })
    }

    pub fn identity(n: usize) -> Self {
        Self {
            images: (0..n).collect(),
        }
    }

    /// Size of the ground set.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[usize] {
        &self.images
    }

    /// Relabels a mask by moving every set bit `i` to position `images[i]`.
    ///
    /// Fails if the mask has bits outside `0..n`.
    pub fn apply(&self, mask: Mask) -> Result<Mask> {
        check_mask(mask, self.len())?;
        Ok(relabel_mask(mask, &self.images))
    }

    /// Iterates over all `n!` permutations of `0..n` in lexicographic order.
    pub fn all(n: usize) -> Permutations {
        Permutations {
            next: Some((0..n).collect()),
        }
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.images)
    }
}

/// Iterator over the permutations of `0..n`, in lexicographic order.
///
/// Created by [`Permutation::all()`].
#[derive(Debug, Clone)]
pub struct Permutations {
    next: Option<Vec<usize>>,
}

impl Iterator for Permutations {
    type Item = Permutation;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        if next_permutation(&mut successor) {
            self.next = Some(successor);
        }
        Some(Permutation { images: current })
    }
}

/// Rearranges `xs` into its lexicographic successor.
///
/// Returns false (leaving `xs` untouched) if `xs` is already the last permutation.
fn next_permutation(xs: &mut [usize]) -> bool {
    let n = xs.len();
    if n < 2 {
        return false;
    }

    // Longest non-increasing suffix starts at `i`
    let mut i = n - 1;
    while i > 0 && xs[i - 1] >= xs[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    // Rightmost element exceeding the pivot
    let mut j = n - 1;
    while xs[j] <= xs[i - 1] {
        j -= 1;
    }

    xs.swap(i - 1, j);
    xs[i..].reverse();
    true
}

#[inline]
fn relabel_mask(mask: Mask, images: &[usize]) -> Mask {
    elements(mask).fold(0, |acc, i| acc | (1 << images[i]))
}

/// Returns the image of a family under a permutation.
///
/// Fails if the family uses elements outside the permutation's ground set.
pub fn relabel(family: &Family, perm: &Permutation) -> Result<Family> {
    family.iter().map(|&m| perm.apply(m)).collect()
}

/// The identity key of an isomorphism class: an ascending mask sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalForm(Vec<Mask>);

impl CanonicalForm {
    pub fn masks(&self) -> &[Mask] {
        &self.0
    }

    /// The canonical representative as a family.
    pub fn to_family(&self) -> Family {
        self.0.iter().copied().collect()
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Computes the canonical form of a family over `0..n`.
///
/// Every one of the `n!` permutations is tried; the smallest sorted image wins,
/// ties keep the first found. The result does not depend on how the family was
/// built. For `n = 0` the family is returned unchanged.
///
/// # Panics
///
/// Panics if a mask uses an element outside `0..n`. Use
/// [`canonical_form_checked`] for families that are not known to fit.
pub fn canonical_form(family: &Family, n: usize) -> CanonicalForm {
    debug_assert!(family.iter().all(|&m| check_mask(m, n).is_ok()));

    let masks = family.to_sorted_vec();
    let mut best: Option<Vec<Mask>> = None;
    let mut image = Vec::with_capacity(masks.len());

    for perm in Permutation::all(n) {
        image.clear();
        image.extend(masks.iter().map(|&m| relabel_mask(m, perm.images())));
        image.sort_unstable();

        if best.as_ref().map_or(true, |b| image < *b) {
            best = Some(image.clone());
        }
    }

    CanonicalForm(best.unwrap_or(masks))
}

/// Checked variant of [`canonical_form`] that validates `n` and every mask first.
pub fn canonical_form_checked(family: &Family, n: usize) -> Result<CanonicalForm> {
    check_ground_size(n)?;
    for &m in family {
        check_mask(m, n)?;
    }
    Ok(canonical_form(family, n))
}

/// Returns true if some relabeling of `0..n` maps `a` onto `b`.
///
/// # Panics
///
/// Panics under the same condition as [`canonical_form`].
pub fn is_isomorphic(a: &Family, b: &Family, n: usize) -> bool {
    a.len() == b.len() && canonical_form(a, n) == canonical_form(b, n)
}
