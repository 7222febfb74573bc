use popsum_io::read::vcf::{REF_FIELD_IDX, ALT_FIELD_IDX, GENOTYPES_START_IDX};

mod error;
pub use error::SiteError;

/// Placeholder symbol marking an undefined allele within the REF/ALT fields.
pub const MISSING_ALLELE: &str = ".";

/// One genotype record of the input VCF, split into the fields the tally step
/// cares about: the REF and ALT allele symbols, plus the raw per-sample
/// genotype tokens, in header order.
#[derive(Debug, PartialEq, Eq)]
pub struct SiteRecord<'a> {
    pub reference: &'a str,
    pub alternate: &'a str,
    pub genotypes: Vec<&'a str>,
}

impl<'a> SiteRecord<'a> {
    /// Split a raw genotype record on tabs.
    ///
    /// # Errors
    /// - if the record carries fewer fields than the fixed VCF columns
    ///   (through FORMAT): such a record cannot provide REF/ALT symbols and
    ///   genotype entries at their expected positions.
    pub fn parse(line: &'a str) -> Result<Self, SiteError> {
        let fields: Vec<&'a str> = line.split('\t').collect();
        if fields.len() < GENOTYPES_START_IDX {
            return Err(SiteError::MissingFields{want: GENOTYPES_START_IDX, got: fields.len()})
        }
        Ok(Self{
            reference: fields[REF_FIELD_IDX],
            alternate: fields[ALT_FIELD_IDX],
            genotypes: fields[GENOTYPES_START_IDX..].to_vec(),
        })
    }

    /// A site is variant iff both its REF and ALT allele symbols are defined.
    pub fn is_variant(&self) -> bool {
        self.reference != MISSING_ALLELE && self.alternate != MISSING_ALLELE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARIANT_RECORD: &str = "1\t1042\t1:10:+\tA\tC\t.\tPASS\t.\tGT:DP\t0/0:13\t0/1:9\t1/1:11";
    const INVARIANT_RECORD: &str = "1\t2219\t2:57:+\tG\t.\t.\tPASS\t.\tGT:DP\t0/0:7\t0/0:15\t./.:0";

    #[test]
    fn parse_variant_record() -> Result<(), SiteError> {
        let site = SiteRecord::parse(VARIANT_RECORD)?;
        assert_eq!(site.reference, "A");
        assert_eq!(site.alternate, "C");
        assert_eq!(site.genotypes, ["0/0:13", "0/1:9", "1/1:11"]);
        assert!(site.is_variant());
        Ok(())
    }

    #[test]
    fn parse_invariant_record() -> Result<(), SiteError> {
        let site = SiteRecord::parse(INVARIANT_RECORD)?;
        assert!(!site.is_variant());
        Ok(())
    }

    #[test]
    fn missing_reference_is_invariant() -> Result<(), SiteError> {
        let record = INVARIANT_RECORD.replacen("\tG\t.\t", "\t.\tC\t", 1);
        let site = SiteRecord::parse(&record)?;
        assert!(!site.is_variant());
        Ok(())
    }

    #[test]
    fn parse_rejects_truncated_record() {
        let truncated = "1\t1042\t1:10:+\tA\tC";
        let result = SiteRecord::parse(truncated);
        assert_eq!(result, Err(SiteError::MissingFields{want: 9, got: 5}));
    }

    #[test]
    fn parse_accepts_record_without_samples() -> Result<(), SiteError> {
        let sampleless = "1\t1042\t1:10:+\tA\tC\t.\tPASS\t.\tGT";
        let site = SiteRecord::parse(sampleless)?;
        assert!(site.genotypes.is_empty());
        Ok(())
    }
}
