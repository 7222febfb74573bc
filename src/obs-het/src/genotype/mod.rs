use std::str::FromStr;

mod error;
pub use error::GenotypeError;

/// Separator between the genotype call and its annotations (e.g. `0/1:13,2:15`).
const FIELD_SEPARATOR: char = ':';
/// Allele separator of an unphased genotype call.
const UNPHASED_SEPARATOR: char = '/';
/// Allele separator of a phased genotype call.
const PHASED_SEPARATOR: char = '|';

/// A diploid genotype call for one individual at one site.
///
/// Each allele is the 0-based index of the called allele (0 = REF, 1.. = ALT),
/// or `None` when the call is missing (`.`).
///
/// Parsed from a raw VCF genotype token: everything after the first `:` is
/// discarded, and the remaining call is split on its `/` (unphased) or `|`
/// (phased) separator. A call carrying neither separator (e.g. a haploid
/// call), or a number of alleles other than two, is considered malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genotype {
    alleles: [Option<u32>; 2],
}

impl Genotype {
    /// Return `true` if either of the two allele calls is missing.
    pub fn is_missing(&self) -> bool {
        self.alleles.iter().any(Option::is_none)
    }

    /// Return `true` if the two allele calls differ.
    ///
    /// # Panics
    /// - if the genotype is missing. Callers are expected to check
    ///   `is_missing()` beforehand: heterozygosity is meaningless for a
    ///   missing call, and reaching this state is an internal fault.
    pub fn is_heterozygous(&self) -> bool {
        assert!(!self.is_missing(), "Heterozygosity check on a missing genotype: {:?}", self.alleles);
        self.alleles[0] != self.alleles[1]
    }
}

impl FromStr for Genotype {
    type Err = GenotypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use GenotypeError::{MissingSeparator, InvalidAlleleCount};
        let call = s.split_once(FIELD_SEPARATOR).map_or(s, |(call, _)| call);

        let separator = if call.contains(UNPHASED_SEPARATOR) {
            UNPHASED_SEPARATOR
        } else if call.contains(PHASED_SEPARATOR) {
            PHASED_SEPARATOR
        } else {
            return Err(MissingSeparator(s.to_string()))
        };

        // Non-numeric allele calls (i.e. '.') are kept as missing values.
        let mut alleles = call.split(separator).map(|allele| allele.parse::<u32>().ok());
        match (alleles.next(), alleles.next(), alleles.next()) {
            (Some(first), Some(second), None) => Ok(Self{alleles: [first, second]}),
            _                                 => Err(InvalidAlleleCount(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_unphased() -> Result<(), GenotypeError> {
        let genotype: Genotype = "0/1".parse()?;
        assert_eq!(genotype.alleles, [Some(0), Some(1)]);
        Ok(())
    }

    #[test]
    fn parse_phased() -> Result<(), GenotypeError> {
        let genotype: Genotype = "1|1".parse()?;
        assert_eq!(genotype.alleles, [Some(1), Some(1)]);
        Ok(())
    }

    #[test]
    fn parse_discards_annotations() -> Result<(), GenotypeError> {
        let genotype: Genotype = "0/1:10,5:15".parse()?;
        assert_eq!(genotype.alleles, [Some(0), Some(1)]);
        Ok(())
    }

    #[test]
    fn parse_missing_alleles() -> Result<(), GenotypeError> {
        let genotype: Genotype = "./1".parse()?;
        assert_eq!(genotype.alleles, [None, Some(1)]);

        let genotype: Genotype = ".|.".parse()?;
        assert_eq!(genotype.alleles, [None, None]);
        Ok(())
    }

    #[test]
    fn parse_rejects_separatorless_call() {
        for malformed in ["0", ".", "01", "", "0:10"] {
            let result = malformed.parse::<Genotype>();
            assert_eq!(result, Err(GenotypeError::MissingSeparator(malformed.to_string())));
        }
    }

    #[test]
    fn parse_rejects_non_diploid_call() {
        let result = "0/1/2".parse::<Genotype>();
        assert_eq!(result, Err(GenotypeError::InvalidAlleleCount("0/1/2".to_string())));
    }

    #[test]
    fn missingness() -> Result<(), GenotypeError> {
        assert!( "./1".parse::<Genotype>()?.is_missing());
        assert!( "1/.".parse::<Genotype>()?.is_missing());
        assert!( ".|.".parse::<Genotype>()?.is_missing());
        assert!(!"0/0".parse::<Genotype>()?.is_missing());
        Ok(())
    }

    #[test]
    fn heterozygosity() -> Result<(), GenotypeError> {
        assert!( "0/1".parse::<Genotype>()?.is_heterozygous());
        assert!( "2|1".parse::<Genotype>()?.is_heterozygous());
        assert!(!"0/0".parse::<Genotype>()?.is_heterozygous());
        assert!(!"1|1".parse::<Genotype>()?.is_heterozygous());
        Ok(())
    }

    #[test]
    #[should_panic(expected = "missing genotype")]
    fn heterozygosity_requires_complete_genotype() {
        let genotype: Genotype = "./1".parse().expect("Valid genotype token");
        let _ = genotype.is_heterozygous();
    }
}
