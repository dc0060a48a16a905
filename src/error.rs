//! Error types.
//!
//! The enumeration, closure, canonicalization and compression algorithms are
//! total over their valid input domain. Errors only arise at the boundary:
//! validating the ground-set size, elements and permutations handed in by a
//! caller, and writing results out.

use std::fmt;
use std::io;

/// Error raised when input falls outside the valid domain, or when results
/// cannot be persisted.
#[derive(Debug)]
pub enum UcError {
    /// The ground set is larger than a [`Mask`][crate::mask::Mask] can address.
    GroundSetTooLarge { n: usize, max: usize },
    /// An element index is not in `0..n`.
    ElementOutOfRange { element: usize, n: usize },
    /// A mask has bits set at or above position `n`.
    MaskOutOfRange { mask: u32, n: usize },
    /// The given images do not form a permutation of `0..n`.
    InvalidPermutation { images: Vec<usize> },
    /// I/O error while writing results.
    Io(io::Error),
    /// JSON encoding error while rendering a record.
    Json(serde_json::Error),
}

impl From<io::Error> for UcError {
    fn from(e: io::Error) -> Self {
        UcError::Io(e)
    }
}

impl From<serde_json::Error> for UcError {
    fn from(e: serde_json::Error) -> Self {
        UcError::Json(e)
    }
}

impl fmt::Display for UcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UcError::GroundSetTooLarge { n, max } => {
                write!(f, "Invalid input: ground set size {} exceeds the maximum of {}", n, max)
            }
            UcError::ElementOutOfRange { element, n } => {
                write!(f, "Invalid input: element {} is outside the ground set 0..{}", element, n)
            }
            UcError::MaskOutOfRange { mask, n } => {
                write!(f, "Invalid input: mask {:#b} has bits outside the ground set 0..{}", mask, n)
            }
            UcError::InvalidPermutation { images } => {
                write!(f, "Invalid input: {:?} is not a permutation of 0..{}", images, images.len())
            }
            UcError::Io(e) => write!(f, "I/O error: {}", e),
            UcError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for UcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UcError::Io(e) => Some(e),
            UcError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl UcError {
    /// Returns true for errors caused by arguments outside the valid domain.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            UcError::GroundSetTooLarge { .. }
                | UcError::ElementOutOfRange { .. }
                | UcError::MaskOutOfRange { .. }
                | UcError::InvalidPermutation { .. }
        )
    }
}

pub type Result<T, E = UcError> = std::result::Result<T, E>;
