use std::fmt::{self, Display, Formatter};

use log::warn;

use crate::genotype::Genotype;
use crate::site::SiteRecord;
use crate::summary::HetSummary;

mod error;
pub use error::TallyError;

/// Per-individual running counters.
/// - `sites`        : number of sites carrying a non-missing genotype for this individual.
/// - `variant_sites`: number of variant sites carrying a non-missing genotype for this individual.
/// - `heterozygous` : number of variant sites carrying a heterozygous genotype for this individual.
///
/// Invariant: `sites >= variant_sites >= heterozygous`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndividualTally {
    pub sites        : u64,
    pub variant_sites: u64,
    pub heterozygous : u64,
}

/// Running heterozygosity tallies for a whole VCF: one `IndividualTally` per
/// sample (in header order), plus the file-wide site counters.
///
/// Mutated once per genotype record through `record_site()`, and frozen once
/// the input is exhausted.
#[derive(Debug, Default)]
pub struct HetTallies {
    samples      : Vec<String>,
    individuals  : Vec<IndividualTally>,
    total_sites  : u64,
    variant_sites: u64,
}

impl HetTallies {
    #[must_use]
    pub fn new(samples: Vec<String>) -> Self {
        let individuals = vec![IndividualTally::default(); samples.len()];
        Self{samples, individuals, total_sites: 0, variant_sites: 0}
    }

    /// Update every counter with the contents of one genotype record:
    /// increment the file-wide counters, then parse each individual's genotype
    /// and increment its non-missing / variant / heterozygous counters.
    ///
    /// # Errors
    /// - if the number of genotype entries does not match the number of samples.
    /// - if any genotype token fails to parse.
    pub fn record_site(&mut self, site: &SiteRecord) -> Result<(), TallyError> {
        use TallyError::GenotypeCountMismatch;
        if site.genotypes.len() != self.samples.len() {
            return Err(GenotypeCountMismatch{want: self.samples.len(), got: site.genotypes.len()})
        }

        self.total_sites += 1;
        let variant = site.is_variant();
        if variant {
            self.variant_sites += 1;
        }

        for (individual, token) in self.individuals.iter_mut().zip(site.genotypes.iter()) {
            let genotype: Genotype = token.parse()?;
            if genotype.is_missing() {
                continue
            }
            individual.sites += 1;
            if variant {
                individual.variant_sites += 1;
                if genotype.is_heterozygous() {
                    individual.heterozygous += 1;
                }
            }
        }
        Ok(())
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn individuals(&self) -> &[IndividualTally] {
        &self.individuals
    }

    pub fn total_sites(&self) -> u64 {
        self.total_sites
    }

    pub fn variant_sites(&self) -> u64 {
        self.variant_sites
    }

    /// Format one output table row per individual, in header order.
    /// Individuals with no genotyped (or no variant) sites have undefined
    /// proportions: these are reported as NaN, along with a warning.
    pub fn rows(&self) -> Vec<HetRow> {
        self.samples.iter().zip(self.individuals.iter())
            .map(|(id, tally)| {
                if tally.sites == 0 {
                    warn!("Sample '{id}' carries no genotyped site. Its heterozygosity proportions are undefined and will be reported as NaN");
                } else if tally.variant_sites == 0 {
                    warn!("Sample '{id}' carries no genotyped variant site. Its variant-site heterozygosity proportion is undefined and will be reported as NaN");
                }
                HetRow{
                    id,
                    total_sites        : self.total_sites,
                    total_variant_sites: self.variant_sites,
                    tally              : *tally,
                }
            })
            .collect()
    }

    /// Aggregate the frozen tallies into the end-of-run console summary.
    #[must_use]
    pub fn summary(&self) -> HetSummary {
        HetSummary::new(self.total_sites, self.variant_sites, &self.individuals)
    }
}

/// One row of the per-individual output table. Proportions are computed lazily
/// at display time, and formatted with eight decimal places.
#[derive(Debug)]
pub struct HetRow<'a> {
    pub id                 : &'a str,
    pub total_sites        : u64,
    pub total_variant_sites: u64,
    pub tally              : IndividualTally,
}

impl<'a> HetRow<'a> {
    /// Proportion of heterozygous sites across all of the individual's
    /// genotyped sites. NaN when the individual carries no genotyped site.
    pub fn prop_hets_total(&self) -> f64 {
        self.tally.heterozygous as f64 / self.tally.sites as f64
    }

    /// Proportion of heterozygous sites across the individual's genotyped
    /// variant sites. NaN when the individual carries no such site.
    pub fn prop_hets_variant(&self) -> f64 {
        self.tally.heterozygous as f64 / self.tally.variant_sites as f64
    }
}

impl<'a> Display for HetRow<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t{}\t{}\t{}\t{:.8}\t{:.8}",
            self.id,
            self.total_sites,
            self.total_variant_sites,
            self.tally.sites,
            self.tally.variant_sites,
            self.tally.heterozygous,
            self.prop_hets_total(),
            self.prop_hets_variant(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteRecord;
    use pretty_assertions::assert_eq;

    fn mock_samples() -> Vec<String> {
        ["SAMPLE1", "SAMPLE2", "SAMPLE3"].iter().map(ToString::to_string).collect()
    }

    /// Three samples, four sites (two variant, two invariant), with a known
    /// genotype pattern.
    const TOY_RECORDS: [&str; 4] = [
        "1\t1042\t.\tA\tC\t.\tPASS\t.\tGT:DP\t0/0:13\t0/1:9\t1/1:11",   // variant
        "1\t2219\t.\tG\t.\t.\tPASS\t.\tGT:DP\t0/0:7\t0/0:15\t./.:0",    // invariant, SAMPLE3 missing
        "2\t0310\t.\tT\tA\t.\tPASS\t.\tGT:DP\t./.:0\t0|1:12\t1/0:9",    // variant, SAMPLE1 missing
        "2\t0457\t.\tC\t.\t.\tPASS\t.\tGT:DP\t0/0:11\t./1:3\t0/0:8",    // invariant, SAMPLE2 missing
    ];

    fn mock_tallies() -> Result<HetTallies, TallyError> {
        let mut tallies = HetTallies::new(mock_samples());
        for record in TOY_RECORDS {
            let site = SiteRecord::parse(record).expect("Valid toy record");
            tallies.record_site(&site)?;
        }
        Ok(tallies)
    }

    #[test]
    fn toy_matrix_global_counts() -> Result<(), TallyError> {
        let tallies = mock_tallies()?;
        assert_eq!(tallies.total_sites(), 4);
        assert_eq!(tallies.variant_sites(), 2);
        Ok(())
    }

    #[test]
    fn toy_matrix_individual_counts() -> Result<(), TallyError> {
        let tallies = mock_tallies()?;
        let expected = [
            IndividualTally{sites: 3, variant_sites: 1, heterozygous: 0}, // SAMPLE1
            IndividualTally{sites: 3, variant_sites: 2, heterozygous: 2}, // SAMPLE2
            IndividualTally{sites: 3, variant_sites: 2, heterozygous: 1}, // SAMPLE3
        ];
        assert_eq!(tallies.individuals(), expected);
        Ok(())
    }

    #[test]
    fn individual_counts_never_exceed_global_counts() -> Result<(), TallyError> {
        let tallies = mock_tallies()?;
        for tally in tallies.individuals() {
            assert!(tally.sites <= tallies.total_sites());
            assert!(tally.variant_sites <= tallies.variant_sites());
            assert!(tally.heterozygous <= tally.variant_sites);
            assert!(tally.variant_sites <= tally.sites);
        }
        Ok(())
    }

    #[test]
    fn genotype_count_mismatch_is_an_error() {
        let mut tallies = HetTallies::new(mock_samples());
        let site = SiteRecord::parse("1\t1042\t.\tA\tC\t.\tPASS\t.\tGT\t0/0\t0/1")
            .expect("Valid record");
        let result = tallies.record_site(&site);
        assert!(matches!(result, Err(TallyError::GenotypeCountMismatch{want: 3, got: 2})));
    }

    #[test]
    fn malformed_genotype_is_an_error() {
        let mut tallies = HetTallies::new(mock_samples());
        let site = SiteRecord::parse("1\t1042\t.\tA\tC\t.\tPASS\t.\tGT\t0/0\t0/1\t1")
            .expect("Valid record");
        let result = tallies.record_site(&site);
        assert!(matches!(result, Err(TallyError::ParseGenotype(_))));
    }

    #[test]
    fn row_formatting() -> Result<(), TallyError> {
        let tallies = mock_tallies()?;
        let rows = tallies.rows();
        assert_eq!(rows[1].to_string(), "SAMPLE2\t4\t2\t3\t2\t2\t0.66666667\t1.00000000");
        Ok(())
    }

    #[test]
    fn row_formatting_undefined_proportions() {
        let tallies = HetTallies::new(mock_samples());
        let rows = tallies.rows();
        assert_eq!(rows[0].to_string(), "SAMPLE1\t0\t0\t0\t0\t0\tNaN\tNaN");
    }
}
