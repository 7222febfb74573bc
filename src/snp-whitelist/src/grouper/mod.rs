use ahash::AHashMap;
use log::debug;

use crate::sumstats::{SnpKey, SumstatsSite};

/// Index of every SNP surviving filtering and population-count selection,
/// keyed by locus identifier, then by locus column. Each leaf holds the full
/// site group: one `SumstatsSite` per population in which the SNP was
/// observed and passed filtering.
#[derive(Debug, Default)]
pub struct KeptSites(AHashMap<u32, AHashMap<u32, Vec<SumstatsSite>>>);

impl KeptSites {
    fn insert(&mut self, key: SnpKey, group: Vec<SumstatsSite>) {
        self.0.entry(key.locus).or_default().insert(key.column, group);
    }

    /// Number of distinct loci within the index.
    pub fn n_loci(&self) -> usize {
        self.0.len()
    }

    /// Number of distinct SNPs within the index. A locus may carry multiple
    /// qualifying SNPs, at different columns.
    pub fn n_snps(&self) -> usize {
        self.0.values().map(|columns| columns.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the distinct locus identifiers, in arbitrary order.
    pub fn loci(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    /// Iterate over the columns stored for a given locus, in arbitrary order.
    /// Empty iterator for an unknown locus.
    pub fn columns(&self, locus: u32) -> impl Iterator<Item = u32> + '_ {
        self.0.get(&locus).into_iter().flat_map(|columns| columns.keys().copied())
    }

    /// Return the site group stored for a given SNP key, if any.
    pub fn group(&self, key: SnpKey) -> Option<&Vec<SumstatsSite>> {
        self.0.get(&key.locus)?.get(&key.column)
    }
}

/// Accumulates consecutive filtered records sharing one SNP key into a site
/// group, assuming the input is sorted such that all records of one SNP are
/// contiguous.
///
/// Whenever a record carrying a different key shows up, the completed group is
/// finalized: inserted into the `KeptSites` index if its size exactly equals
/// the requested population count, discarded otherwise. The caller MUST invoke
/// `finish()` once the input is exhausted, so that the last pending group gets
/// finalized as well.
#[derive(Debug)]
pub struct SnpGrouper {
    min_populations: usize,
    pending        : Option<(SnpKey, Vec<SumstatsSite>)>,
}

impl SnpGrouper {
    #[must_use]
    pub fn new(min_populations: usize) -> Self {
        Self{min_populations, pending: None}
    }

    /// Add one filtered record to the pending group, finalizing the previous
    /// group beforehand whenever the SNP key changes.
    pub fn push(&mut self, site: SumstatsSite, kept: &mut KeptSites) {
        match self.pending.as_mut() {
            Some((key, group)) if *key == site.key() => group.push(site),
            _ => {
                self.finalize_pending(kept);
                self.pending = Some((site.key(), vec![site]));
            }
        }
    }

    /// Finalize the last pending group. Must be invoked unconditionally once
    /// the input is exhausted: the final group of the file is otherwise
    /// silently dropped.
    pub fn finish(mut self, kept: &mut KeptSites) {
        self.finalize_pending(kept);
    }

    fn finalize_pending(&mut self, kept: &mut KeptSites) {
        if let Some((key, group)) = self.pending.take() {
            if group.len() == self.min_populations {
                kept.insert(key, group);
            } else {
                debug!("Discarding SNP {key}: found in {} populations, required exactly {}",
                    group.len(), self.min_populations
                );
            }
        }
    }
}
