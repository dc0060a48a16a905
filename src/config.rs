//! Run configuration.

use crate::compress::DEFAULT_MAX_PASSES;

/// Parameters of one exploration run.
///
/// # Examples
///
/// ```
/// use ucf_rs::config::ExploreConfig;
///
/// let config = ExploreConfig::new(5).with_max_families(Some(200));
/// assert_eq!(config.n, 5);
/// assert_eq!(config.max_compression_passes, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreConfig {
    /// Size of the ground set (default: 4)
    pub n: usize,
    /// Stop after this many non-isomorphic families (default: no cap, `Some(0)` also means no cap)
    pub max_families: Option<usize>,
    /// Cap on full compression passes per family (default: 20)
    pub max_compression_passes: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            n: 4,
            max_families: None,
            max_compression_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl ExploreConfig {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            ..Self::default()
        }
    }

    pub fn with_max_families(mut self, max_families: Option<usize>) -> Self {
        self.max_families = max_families;
        self
    }

    pub fn with_max_compression_passes(mut self, passes: usize) -> Self {
        self.max_compression_passes = passes;
        self
    }
}
