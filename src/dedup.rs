//! Deduplication of union-closed families up to isomorphism.
//!
//! [`UniqueFamilies`] walks the antichains of `0..n` in enumeration order,
//! closes each one under union, and keeps the first family seen from every
//! isomorphism class. The set of canonical forms seen so far is an explicit
//! [`SeenForms`] value owned by the iterator; it can be seeded with
//! [`UniqueFamilies::with_seen`] and taken back with [`UniqueFamilies::into_seen`].

use std::collections::HashSet;

use log::{debug, trace};

use crate::antichain::{antichains, Antichain, Antichains};
use crate::canonical::{canonical_form, CanonicalForm};
use crate::closure::union_closure;
use crate::error::Result;
use crate::family::Family;

/// Canonical forms of the isomorphism classes already emitted.
///
/// Grows monotonically during a run.
#[derive(Debug, Default, Clone)]
pub struct SeenForms {
    forms: HashSet<CanonicalForm>,
}

impl SeenForms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a canonical form. Returns true if it was not seen before.
    pub fn insert(&mut self, form: CanonicalForm) -> bool {
        self.forms.insert(form)
    }

    pub fn contains(&self, form: &CanonicalForm) -> bool {
        self.forms.contains(form)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

/// Iterator over pairwise non-isomorphic union-closed families.
///
/// Yields `(antichain, closure)` pairs. The representative of each class is the
/// first antichain in enumeration order whose closure falls into it. Stops after
/// `max_families` pairs if a nonzero cap is set; `Some(0)` means no cap.
#[derive(Debug)]
pub struct UniqueFamilies {
    n: usize,
    antichains: Antichains,
    seen: SeenForms,
    max_families: Option<usize>,
    kept: usize,
    skipped: usize,
}

impl UniqueFamilies {
    /// Starts a fresh deduplication run over `0..n`.
    pub fn new(n: usize, max_families: Option<usize>) -> Result<Self> {
        Self::with_seen(n, max_families, SeenForms::new())
    }

    /// Starts a run that treats every class in `seen` as already emitted.
    pub fn with_seen(n: usize, max_families: Option<usize>, seen: SeenForms) -> Result<Self> {
        Ok(Self {
            n,
            antichains: antichains(n)?,
            seen,
            max_families: max_families.filter(|&cap| cap > 0),
            kept: 0,
            skipped: 0,
        })
    }

    /// Number of families emitted so far.
    pub fn kept(&self) -> usize {
        self.kept
    }

    /// Number of closures dropped as isomorphic to an earlier one.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn seen(&self) -> &SeenForms {
        &self.seen
    }

    /// Ends the run, handing back the seen canonical forms.
    pub fn into_seen(self) -> SeenForms {
        self.seen
    }

    fn cap_reached(&self) -> bool {
        self.max_families.is_some_and(|cap| self.kept >= cap)
    }
}

impl Iterator for UniqueFamilies {
    type Item = (Antichain, Family);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cap_reached() {
            return None;
        }

        for antichain in self.antichains.by_ref() {
            let family = union_closure(antichain.masks());
            let canon = canonical_form(&family, self.n);

            if !self.seen.insert(canon) {
                self.skipped += 1;
                trace!("Skipping {} (closure {}): isomorphic to an earlier family", antichain, family);
                continue;
            }

            debug!(
                "Family #{}: antichain {} generates {} sets",
                self.kept,
                antichain,
                family.len()
            );
            self.kept += 1;
            return Some((antichain, family));
        }

        None
    }
}

/// Collects the pairwise non-isomorphic union-closed families over `0..n`.
///
/// See [`UniqueFamilies`].
pub fn unique_union_closed(n: usize, max_families: Option<usize>) -> Result<Vec<(Antichain, Family)>> {
    let mut unique = UniqueFamilies::new(n, max_families)?;
    let families: Vec<_> = unique.by_ref().collect();
    debug!(
        "Kept {} of {} closures over {} elements",
        unique.kept(),
        unique.kept() + unique.skipped(),
        n
    );
    Ok(families)
}
