//! Element frequencies and the pairwise compression transform.
//!
//! The frequency of element `i` in a family `F` is the fraction of member sets
//! containing `i`. The union-closed sets conjecture asks whether some element
//! always reaches frequency `1/2`.
//!
//! The compression `C_ij` moves membership from element `j` to element `i`:
//! every member that contains `j` but not `i` has `j` replaced by `i`. Distinct
//! members can collide, so the family may shrink. [`compress_until_stable`]
//! applies `C_ij` for every pair `i < j` until a full pass changes nothing, or
//! the pass cap is reached. Convergence is not proven, so the result records
//! whether it actually reached a fixed point.

use log::{debug, warn};

use crate::error::Result;
use crate::family::Family;
use crate::mask::{check_element, check_ground_size, check_mask, contains, Mask};

/// Default cap on full compression passes.
pub const DEFAULT_MAX_PASSES: usize = 20;

/// Per-element frequencies: `freqs[i] = |{S in F : i in S}| / |F|`.
///
/// An empty family has all frequencies zero. Elements that no mask can hold
/// (index 32 and up) have frequency zero.
pub fn element_frequencies(family: &Family, n: usize) -> Vec<f64> {
    let size = family.len();
    if size == 0 {
        return vec![0.0; n];
    }
    (0..n)
        .map(|i| family.count_containing(i) as f64 / size as f64)
        .collect()
}

/// Population variance: mean squared deviation from the mean. Zero for empty input.
pub fn variance(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let len = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / len;
    xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / len
}

/// Smallest value, or zero for empty input.
pub fn min_frequency(xs: &[f64]) -> f64 {
    xs.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Frequency summary of one family.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyStats {
    pub freqs: Vec<f64>,
    pub min: f64,
    pub variance: f64,
}

impl FrequencyStats {
    pub fn of(family: &Family, n: usize) -> Self {
        let freqs = element_frequencies(family, n);
        let min = min_frequency(&freqs);
        let variance = variance(&freqs);
        Self { freqs, min, variance }
    }
}

#[inline]
fn compress_mask(mask: Mask, i: usize, j: usize) -> Mask {
    if contains(mask, j) && !contains(mask, i) {
        (mask & !(1 << j)) | (1 << i)
    } else {
        mask
    }
}

/// The compression `C_ij`: replace `j` by `i` in every member containing `j` but not `i`.
///
/// # Example
///
/// ```
/// use ucf_rs::compress::compress;
/// use ucf_rs::family::Family;
///
/// // {1} becomes {0}; {0,1} already contains 0 and stays
/// let f = Family::from([0b10, 0b11]);
/// assert_eq!(compress(&f, 0, 1), Family::from([0b01, 0b11]));
/// ```
///
/// # Panics
///
/// Panics if `i` is not a valid bit position of [`Mask`] while some member
/// contains `j`. Use [`compress_checked`] for untrusted indices.
pub fn compress(family: &Family, i: usize, j: usize) -> Family {
    family.iter().map(|&m| compress_mask(m, i, j)).collect()
}

/// Checked variant of [`compress`] for a family over `0..n`.
///
/// Fails if `n` is not supported, if `i` or `j` is not in `0..n`, or if some
/// member uses elements outside `0..n`.
pub fn compress_checked(family: &Family, i: usize, j: usize, n: usize) -> Result<Family> {
    check_ground_size(n)?;
    check_element(i, n)?;
    check_element(j, n)?;
    for &m in family {
        check_mask(m, n)?;
    }
    Ok(compress(family, i, j))
}

/// Outcome of [`compress_until_stable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compression {
    /// Family after the last pass
    pub family: Family,
    /// Number of full passes performed
    pub passes: usize,
    /// Whether the last pass made no change
    pub converged: bool,
}

/// Applies `C_ij` for all pairs `i < j` of `0..n`, in increasing `(i, j)` order,
/// until a full pass makes no change or `max_passes` passes were made.
pub fn compress_until_stable(family: &Family, n: usize, max_passes: usize) -> Compression {
    let mut current = family.clone();
    let mut passes = 0;
    let mut converged = false;

    while passes < max_passes {
        passes += 1;
        let mut changed = false;

        for i in 0..n {
            for j in (i + 1)..n {
                let next = compress(&current, i, j);
                if next != current {
                    current = next;
                    changed = true;
                }
            }
        }

        if !changed {
            converged = true;
            break;
        }
    }

    if converged {
        debug!("Compression of {} stabilized after {} passes", family, passes);
    } else {
        warn!(
            "Compression of {} did not stabilize within {} passes, reporting last state {}",
            family, max_passes, current
        );
    }

    Compression {
        family: current,
        passes,
        converged,
    }
}

/// Frequency statistics of a family before and after compression.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub size: usize,
    pub before: FrequencyStats,
    pub after: FrequencyStats,
    pub compression: Compression,
    /// Whether compression produced a different family
    pub changed: bool,
}

/// Measures a family, compresses it to a fixed point and measures it again.
pub fn analyze(family: &Family, n: usize, max_passes: usize) -> Analysis {
    let before = FrequencyStats::of(family, n);
    let compression = compress_until_stable(family, n, max_passes);
    let after = FrequencyStats::of(&compression.family, n);
    let changed = compression.family != *family;
    Analysis {
        size: family.len(),
        before,
        after,
        compression,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::closure::union_closure;
    use crate::dedup::unique_union_closed;
    use crate::error::UcError;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_compress_example() {
        let f = Family::from([0b10, 0b11]);
        let g = compress(&f, 0, 1);
        assert_eq!(g, Family::from([0b01, 0b11]));
    }

    #[test]
    fn test_compress_can_shrink() {
        // {0} and {1} collide under C_01
        let f = Family::from([0, 0b01, 0b10, 0b11]);
        let g = compress(&f, 0, 1);
        assert_eq!(g, Family::from([0, 0b01, 0b11]));
    }

    #[test]
    fn test_compress_checked() {
        let f = Family::from([0b10, 0b11]);
        assert_eq!(compress_checked(&f, 0, 1, 2).unwrap(), Family::from([0b01, 0b11]));

        let err = compress_checked(&f, 0, 5, 3).unwrap_err();
        assert!(matches!(err, UcError::ElementOutOfRange { element: 5, n: 3 }));
        assert!(compress_checked(&f, 40, 1, 3).unwrap_err().is_invalid_input());
        assert!(compress_checked(&f, 0, 40, 3).unwrap_err().is_invalid_input());

        let err = compress_checked(&f, 0, 1, 1).unwrap_err();
        assert!(matches!(err, UcError::ElementOutOfRange { element: 1, n: 1 }));
        let err = compress_checked(&Family::from([0b100]), 0, 1, 2).unwrap_err();
        assert!(matches!(err, UcError::MaskOutOfRange { .. }));
    }

    #[test]
    fn test_compress_ignores_absent_high_element() {
        // No member can contain element 40, so nothing moves
        let f = Family::from([2, 3]);
        assert_eq!(compress(&f, 0, 40), f);
        assert_eq!(element_frequencies(&f, 40)[32..], [0.0; 8]);
    }

    #[test]
    fn test_frequencies() {
        let f = union_closure(&[1, 2]);
        assert_eq!(element_frequencies(&f, 3), vec![0.5, 0.5, 0.0]);
        assert_eq!(element_frequencies(&Family::new(), 2), vec![0.0, 0.0]);
        assert_eq!(element_frequencies(&Family::from([0]), 0), Vec::<f64>::new());
    }

    #[test]
    fn test_variance() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[0.5, 0.5, 0.5]), 0.0);
        // mean 0.5, deviations ±0.5
        assert!((variance(&[0.0, 1.0]) - 0.25).abs() < EPS);
        assert!((variance(&[0.5, 0.0, 0.0]) - 1.0 / 18.0).abs() < EPS);
    }

    #[test]
    fn test_min_frequency() {
        assert_eq!(min_frequency(&[]), 0.0);
        assert_eq!(min_frequency(&[0.75, 0.25, 0.5]), 0.25);
    }

    #[test]
    fn test_until_stable_example() {
        // {∅, {0}, {1,2}, {0,1,2}} compresses to {∅, {0}, {0,1}, {0,1,2}}
        let f = union_closure(&[0b001, 0b110]);
        let c = compress_until_stable(&f, 3, DEFAULT_MAX_PASSES);
        assert!(c.converged);
        assert_eq!(c.family, Family::from([0, 1, 3, 7]));
    }

    #[test]
    fn test_fixed_point_is_idempotent() {
        for n in 1..=4 {
            for (_, f) in unique_union_closed(n, None).unwrap() {
                let c = compress_until_stable(&f, n, DEFAULT_MAX_PASSES);
                assert!(c.converged, "{} did not converge", f);

                let again = compress_until_stable(&c.family, n, DEFAULT_MAX_PASSES);
                assert_eq!(again.family, c.family);
                assert_eq!(again.passes, 1);

                for i in 0..n {
                    for j in (i + 1)..n {
                        assert_eq!(compress(&c.family, i, j), c.family);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_passes() {
        let f = union_closure(&[0b001, 0b110]);
        let c = compress_until_stable(&f, 3, 0);
        assert_eq!(c.family, f);
        assert_eq!(c.passes, 0);
        assert!(!c.converged);
    }

    #[test]
    fn test_frequency_bounds() {
        for n in 1..=4 {
            for (_, f) in unique_union_closed(n, None).unwrap() {
                let stats = FrequencyStats::of(&f, n);
                assert!(stats.freqs.iter().all(|&x| (0.0..=1.0).contains(&x)));
                assert!(stats.variance >= 0.0);

                let all_equal = stats.freqs.windows(2).all(|w| w[0] == w[1]);
                assert_eq!(stats.variance.abs() < EPS, all_equal, "{}: {:?}", f, stats.freqs);
            }
        }
    }

    #[test]
    fn test_analyze() {
        let f = union_closure(&[0b011, 0b101]);
        let a = analyze(&f, 3, DEFAULT_MAX_PASSES);
        assert_eq!(a.size, 4);
        assert_eq!(a.before.freqs, vec![0.75, 0.5, 0.5]);
        assert_eq!(a.before.min, 0.5);
        assert!(a.changed);
        assert_eq!(a.after.freqs.len(), 3);

        let g = union_closure(&[0b111]);
        let b = analyze(&g, 3, DEFAULT_MAX_PASSES);
        assert!(!b.changed);
        assert_eq!(b.before, b.after);
    }
}
