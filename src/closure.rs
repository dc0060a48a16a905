//! Union-closure of a generating set.

use crate::family::Family;
use crate::mask::Mask;

/// Returns the smallest union-closed family containing `0` and every generator.
///
/// The closure of a finite generating set is exactly `{0}` together with the
/// union of every nonempty sub-collection of the generators. It is built one
/// generator at a time, adding `m | g` for every member `m` found so far, so no
/// fixed-point iteration is needed and any number of generators is accepted.
/// Cost is `k` times the size of the closure for `k` generators.
///
/// # Example
///
/// ```
/// use ucf_rs::closure::union_closure;
///
/// let f = union_closure(&[0b01, 0b10]);
/// assert_eq!(f.to_sorted_vec(), vec![0, 1, 2, 3]);
/// ```
pub fn union_closure(generators: &[Mask]) -> Family {
    let mut family = Family::new();
    family.insert(0);

    for &g in generators {
        let unions: Vec<Mask> = family.iter().map(|&m| m | g).collect();
        family.extend(unions);
    }

    family
}

/// Returns true if the family contains `0` and is closed under pairwise union.
pub fn is_union_closed(family: &Family) -> bool {
    if !family.contains(0) {
        return false;
    }
    let masks = family.to_sorted_vec();
    masks
        .iter()
        .enumerate()
        .all(|(i, &a)| masks[i + 1..].iter().all(|&b| family.contains(a | b)))
}
