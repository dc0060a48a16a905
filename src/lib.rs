//! # ucf-rs: Union-Closed Families in Rust
//!
//! **`ucf-rs`** is a small research instrument for the *union-closed sets conjecture*
//! (Frankl): in every union-closed family with at least one nonempty member, some
//! element belongs to at least half of the member sets.
//!
//! For a ground set `0..n` the library enumerates every union-closed family generated
//! by an antichain, keeps exactly one representative per isomorphism class, measures
//! how often each element occurs, and re-measures after pushing the family towards a
//! compressed form.
//!
//! ## Pipeline
//!
//! ```text
//! antichains(n) → union_closure → canonical_form → UniqueFamilies → analyze → ResultRecord
//! ```
//!
//! - **Masks**: subsets are `u32` bit masks; bit `i` set iff element `i` is a member.
//! - **Exact deduplication**: the canonical form is the smallest sorted image over all
//!   `n!` relabelings. This is brute force on purpose, so `n` is practically bounded
//!   by about 6.
//! - **Reproducible output**: enumeration order is fixed by sorting the universe by
//!   `(popcount, value)`, and floating-point statistics are rounded to six digits.
//!
//! ## Basic Usage
//!
//! ```rust
//! use ucf_rs::explore::run;
//!
//! // All 8 union-closed families over 3 elements, up to relabeling
//! let records = run(3, None).unwrap();
//! assert_eq!(records.len(), 8);
//!
//! // {∅, {0}, {1}, {0,1}}: elements 0 and 1 each appear in half the sets
//! assert_eq!(records[1].antichain_minimals, vec![vec![0], vec![1]]);
//! assert_eq!(records[1].freqs_before, vec![0.5, 0.5, 0.0]);
//! ```
//!
//! ## Core Components
//!
//! - **[`antichain`]**: lazy enumeration of antichains.
//! - **[`closure`]**: union-closure of a generating set.
//! - **[`canonical`]**: canonical forms under relabeling of the ground set.
//! - **[`dedup`]**: first-seen representative per isomorphism class.
//! - **[`compress`]**: element frequencies and the `C_ij` compression fixed point.
//! - **[`explore`]**: the end-to-end `run` entry point.
//! - **[`record`]**: result rows and their CSV layout.
//! - **[`oracle`]**: cross-checking with nauty's `dreadnaut`.

pub mod antichain;
pub mod canonical;
pub mod closure;
pub mod compress;
pub mod config;
pub mod dedup;
pub mod error;
pub mod explore;
pub mod family;
pub mod mask;
pub mod oracle;
pub mod record;
