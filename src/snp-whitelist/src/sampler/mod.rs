use std::fmt::{self, Display, Formatter};

use log::warn;

use crate::grouper::KeptSites;

/// One sampled whitelist row, ordered by locus, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WhitelistEntry {
    pub locus : u32,
    pub column: u32,
}

impl Display for WhitelistEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.locus, self.column)
    }
}

/// Sample the final whitelist out of the kept-sites index: select
/// `number_sites` distinct loci uniformly at random without replacement, then
/// one column uniformly at random among each selected locus' stored columns.
/// Returned entries are sorted by ascending locus.
///
/// When `number_sites` exceeds the number of available loci, the whole set of
/// loci is selected instead, along with a warning.
///
/// The caller provides the random generator, so that a fixed seed always
/// reproduces the same whitelist.
pub fn sample_whitelist(kept: &KeptSites, number_sites: usize, rng: &mut fastrand::Rng) -> Vec<WhitelistEntry> {
    let available = kept.n_loci();
    let number_sites = if number_sites > available {
        warn!("More sites chosen ({number_sites}) than loci available ({available}). \
            Exporting {available} total sites.");
        available
    } else {
        number_sites
    };

    // Hash-map iteration order is arbitrary: candidates must be sorted before
    // sampling for a fixed seed to reproduce the same whitelist.
    let mut loci: Vec<u32> = kept.loci().collect();
    loci.sort_unstable();

    let mut entries: Vec<WhitelistEntry> = rng.choose_multiple(loci, number_sites)
        .into_iter()
        .map(|locus| {
            let mut columns: Vec<u32> = kept.columns(locus).collect();
            columns.sort_unstable();
            let column = rng.choice(columns).expect("Kept loci always carry at least one column");
            WhitelistEntry{locus, column}
        })
        .collect();

    entries.sort_unstable();
    entries
}
