//! Top-level exploration: deduplicate, analyze, record.

use log::{debug, info};

use crate::antichain::Antichain;
use crate::compress::analyze;
use crate::config::ExploreConfig;
use crate::dedup::UniqueFamilies;
use crate::error::Result;
use crate::family::Family;
use crate::mask::check_ground_size;
use crate::record::ResultRecord;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct Exploration {
    pub n: usize,
    /// Kept `(antichain, closure)` pairs, in emission order
    pub families: Vec<(Antichain, Family)>,
    /// One record per kept family, same order
    pub records: Vec<ResultRecord>,
    /// Number of antichains whose closure was a duplicate
    pub skipped: usize,
    /// Number of families whose compression hit the pass cap
    pub unconverged: usize,
}

/// Runs the full pipeline for the given configuration.
///
/// Fails before any enumeration work if `config.n` is not supported.
pub fn run_with_config(config: &ExploreConfig) -> Result<Exploration> {
    let n = config.n;
    check_ground_size(n)?;

    info!(
        "Exploring union-closed families over {} elements (cap: {:?})",
        n, config.max_families
    );

    let mut unique = UniqueFamilies::new(n, config.max_families)?;
    let mut families = Vec::new();
    let mut records = Vec::new();
    let mut unconverged = 0;

    for (index, (antichain, family)) in unique.by_ref().enumerate() {
        let analysis = analyze(&family, n, config.max_compression_passes);
        if !analysis.compression.converged {
            unconverged += 1;
        }
        let record = ResultRecord::new(index, &antichain, &analysis, n);
        debug!(
            "Record #{}: size={} min_freq {} -> {} var {} -> {}",
            index, record.family_size, record.min_freq_before, record.min_freq_after, record.var_before, record.var_after
        );
        records.push(record);
        families.push((antichain, family));
    }

    info!(
        "Kept {} non-isomorphic families ({} duplicates skipped, {} compressions unconverged)",
        records.len(),
        unique.skipped(),
        unconverged
    );

    Ok(Exploration {
        n,
        families,
        records,
        skipped: unique.skipped(),
        unconverged,
    })
}

/// Produces one [`ResultRecord`] per non-isomorphic union-closed family over `0..n`.
///
/// Indices follow emission order starting at 0. With `max_families` set to a
/// nonzero value, only the first that many families in enumeration order are
/// processed; `Some(0)` processes all of them.
///
/// # Example
///
/// ```
/// use ucf_rs::explore::run;
///
/// let records = run(3, None).unwrap();
/// assert_eq!(records.len(), 8);
/// assert_eq!(records[0].index, 0);
/// ```
pub fn run(n: usize, max_families: Option<usize>) -> Result<Vec<ResultRecord>> {
    let config = ExploreConfig::new(n).with_max_families(max_families);
    Ok(run_with_config(&config)?.records)
}
