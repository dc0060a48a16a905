//! Subset masks over a small ground set.
//!
//! A subset of the ground set `0..n` is encoded as a [`Mask`]: bit `i` is set
//! iff element `i` is a member. The empty set is `0`. The encoding depends only
//! on the members, never on the order they were supplied in.

use crate::error::{Result, UcError};

/// Bit-level encoding of a subset of `0..n`.
pub type Mask = u32;

/// Largest supported ground set.
///
/// The universe of nonempty subsets has `2^n - 1` members, so anything beyond
/// this is far outside what exhaustive enumeration can finish anyway.
pub const MAX_ELEMENTS: usize = 16;

/// Checks that `n` is a supported ground-set size.
pub fn check_ground_size(n: usize) -> Result<()> {
    if n > MAX_ELEMENTS {
        return Err(UcError::GroundSetTooLarge { n, max: MAX_ELEMENTS });
    }
    Ok(())
}

/// Mask with all `n` elements set.
#[inline]
pub fn full_mask(n: usize) -> Mask {
    if n >= Mask::BITS as usize {
        Mask::MAX
    } else {
        (1 << n) - 1
    }
}

/// Checks that `mask` only uses elements of `0..n`.
pub fn check_mask(mask: Mask, n: usize) -> Result<()> {
    if mask & !full_mask(n) != 0 {
        return Err(UcError::MaskOutOfRange { mask, n });
    }
    Ok(())
}

/// Encodes a collection of elements as a mask.
///
/// Duplicates are harmless. Fails if any element is not in `0..n`.
pub fn mask_from_set(elements: impl IntoIterator<Item = usize>, n: usize) -> Result<Mask> {
    check_ground_size(n)?;
    let mut mask = 0;
    for element in elements {
        check_element(element, n)?;
        mask |= 1 << element;
    }
    Ok(mask)
}

/// Decodes a mask into its elements, in increasing order.
///
/// Bits at or above `n` are ignored.
pub fn set_from_mask(mask: Mask, n: usize) -> Vec<usize> {
    elements(mask & full_mask(n)).collect()
}

/// Number of elements in the subset.
#[inline]
pub fn popcount(mask: Mask) -> u32 {
    mask.count_ones()
}

/// Returns true if `a` is a subset of `b`.
#[inline]
pub fn is_subset(a: Mask, b: Mask) -> bool {
    a & b == a
}

/// Returns true if neither mask is a subset of the other.
#[inline]
pub fn incomparable(a: Mask, b: Mask) -> bool {
    let meet = a & b;
    meet != a && meet != b
}

/// Returns true if element `i` is a member of the subset.
///
/// Indices past the width of [`Mask`] are never members.
#[inline]
pub fn contains(mask: Mask, i: usize) -> bool {
    u32::try_from(i)
        .ok()
        .and_then(|shift| mask.checked_shr(shift))
        .is_some_and(|m| m & 1 == 1)
}

/// Checks that `element` is in `0..n`.
pub fn check_element(element: usize, n: usize) -> Result<()> {
    if element >= n {
        return Err(UcError::ElementOutOfRange { element, n });
    }
    Ok(())
}

/// Iterates over the elements of a mask, in increasing order.
pub fn elements(mask: Mask) -> Elements {
    Elements { rest: mask }
}

/// Iterator over the set bits of a [`Mask`].
#[derive(Debug, Clone)]
pub struct Elements {
    rest: Mask,
}

impl Iterator for Elements {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest == 0 {
            return None;
        }
        let i = self.rest.trailing_zeros() as usize;
        self.rest &= self.rest - 1; // Clear lowest set bit
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.rest.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Elements {}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_mask_from_set() {
        assert_eq!(mask_from_set(std::iter::empty(), 3).unwrap(), 0);
        assert_eq!(mask_from_set([0], 3).unwrap(), 0b001);
        assert_eq!(mask_from_set([2, 0], 3).unwrap(), 0b101);
        assert_eq!(mask_from_set([0, 2], 3).unwrap(), 0b101);
        assert_eq!(mask_from_set([1, 1, 1], 3).unwrap(), 0b010);
    }

    #[test]
    fn test_mask_from_set_out_of_range() {
        let err = mask_from_set([0, 3], 3).unwrap_err();
        assert!(matches!(err, UcError::ElementOutOfRange { element: 3, n: 3 }));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_ground_size_limit() {
        assert!(check_ground_size(MAX_ELEMENTS).is_ok());
        let err = mask_from_set([0], MAX_ELEMENTS + 1).unwrap_err();
        assert!(matches!(err, UcError::GroundSetTooLarge { .. }));
    }

    #[test]
    fn test_set_from_mask() {
        assert_eq!(set_from_mask(0, 4), Vec::<usize>::new());
        assert_eq!(set_from_mask(0b1011, 4), vec![0, 1, 3]);
        // Bits outside the ground set are dropped
        assert_eq!(set_from_mask(0b1011, 2), vec![0, 1]);
    }

    #[test]
    fn test_popcount() {
        assert_eq!(popcount(0), 0);
        assert_eq!(popcount(0b1), 1);
        assert_eq!(popcount(0b1101), 3);
    }

    #[test]
    fn test_incomparable() {
        assert!(incomparable(0b01, 0b10));
        assert!(incomparable(0b011, 0b110));
        assert!(!incomparable(0b01, 0b11));
        assert!(!incomparable(0b11, 0b01));
        assert!(!incomparable(0b11, 0b11));
        assert!(is_subset(0b01, 0b11));
        assert!(!is_subset(0b11, 0b01));
    }

    #[test]
    fn test_check_mask() {
        assert!(check_mask(0b111, 3).is_ok());
        assert!(check_mask(0b1000, 3).is_err());
        assert!(check_mask(0, 0).is_ok());
        assert!(check_mask(1, 0).is_err());
    }

    #[test]
    fn test_contains() {
        assert!(contains(0b101, 0));
        assert!(!contains(0b101, 1));
        assert!(contains(0b101, 2));
        assert!(contains(Mask::MAX, 31));
        assert!(!contains(Mask::MAX, 32));
        assert!(!contains(Mask::MAX, 40));
        assert!(!contains(Mask::MAX, usize::MAX));
    }

    #[test]
    fn test_elements() {
        let xs: Vec<_> = elements(0b1010_0101).collect();
        assert_eq!(xs, vec![0, 2, 5, 7]);
        assert_eq!(elements(0b1010_0101).len(), 4);
        assert_eq!(elements(0).next(), None);
    }
}
