use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

mod error;
pub use error::SumstatsError;

/// 0-based expected column indices of a populations sumstats record.
pub const LOCUS_ID_IDX  : usize = 0;
pub const CHROM_IDX     : usize = 1;
pub const BP_IDX        : usize = 2;
pub const LOCUS_COL_IDX : usize = 3;
pub const POP_ID_IDX    : usize = 4;
pub const FREQ_IDX      : usize = 8;
pub const HWE_IDX       : usize = 19;
pub const PRIVATE_IDX   : usize = 20;

/// Minimum number of tab-separated fields a sumstats record must carry for
/// every targeted column to be present.
pub const MIN_FIELDS: usize = PRIVATE_IDX + 1;

/// Lowest acceptable Hardy-Weinberg exact-test p-value when HWE filtering is
/// requested.
pub const MIN_HWE_PVALUE: f32 = 0.05;

/// A `(locus, column)` pair, uniquely identifying a physical SNP across
/// populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnpKey {
    pub locus : u32,
    pub column: u32,
}

impl Display for SnpKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.locus, self.column)
    }
}

/// One (locus, column, population) observation of the input sumstats file.
/// - `locus`      : locus identifier.
/// - `column`     : offset of the SNP within its locus.
/// - `chromosome` : chromosome label.
/// - `position`   : base-pair position.
/// - `population` : population identifier.
/// - `p`          : variant allele frequency within that population.
/// - `hwe_pvalue` : Hardy-Weinberg exact-test p-value within that population.
/// - `private`    : number of populations in which the site is private.
#[derive(Debug, Clone, PartialEq)]
pub struct SumstatsSite {
    pub locus     : u32,
    pub column    : u32,
    pub chromosome: String,
    pub position  : u32,
    pub population: String,
    pub p         : f32,
    pub hwe_pvalue: f32,
    pub private   : u32,
}

impl SumstatsSite {
    /// Split a raw sumstats record on tabs and parse its targeted columns.
    ///
    /// # Errors
    /// - if the record carries fewer fields than `MIN_FIELDS`.
    /// - if any targeted field fails to parse into its expected type.
    pub fn parse(line: &str) -> Result<Self, SumstatsError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(SumstatsError::MissingFields{want: MIN_FIELDS, got: fields.len()})
        }
        Ok(Self{
            locus     : parse_field(&fields, LOCUS_ID_IDX, "locus id")?,
            column    : parse_field(&fields, LOCUS_COL_IDX, "locus column")?,
            chromosome: fields[CHROM_IDX].to_string(),
            position  : parse_field(&fields, BP_IDX, "base pair")?,
            population: fields[POP_ID_IDX].to_string(),
            p         : parse_field(&fields, FREQ_IDX, "allele frequency")?,
            hwe_pvalue: parse_field(&fields, HWE_IDX, "HWE p-value")?,
            private   : parse_field(&fields, PRIVATE_IDX, "privacy count")?,
        })
    }

    /// Return the `(locus, column)` pair identifying this SNP across populations.
    pub fn key(&self) -> SnpKey {
        SnpKey{locus: self.locus, column: self.column}
    }

    /// Minor allele frequency, i.e. `min(p, 1-p)`.
    pub fn minor_allele_frequency(&self) -> f32 {
        self.p.min(1.0 - self.p)
    }
}

impl Display for SumstatsSite {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.locus, self.column, self.chromosome, self.position,
            self.population, self.p, self.hwe_pvalue, self.private
        )
    }
}

fn parse_field<T: FromStr>(fields: &[&str], idx: usize, field: &'static str) -> Result<T, SumstatsError> {
    let value = fields[idx];
    value.parse().map_err(|_| SumstatsError::ParseField{field, value: value.to_string()})
}

/// Per-record rejection thresholds.
/// - `maf`: records whose minor allele frequency lies below this value are rejected.
/// - `hwe`: when set, records whose HWE p-value lies below `MIN_HWE_PVALUE` are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteFilters {
    pub maf: f32,
    pub hwe: bool,
}

impl SiteFilters {
    /// Return `true` if the record survives every rejection threshold.
    pub fn passes(&self, site: &SumstatsSite) -> bool {
        if site.minor_allele_frequency() < self.maf {
            return false
        }
        if self.hwe && site.hwe_pvalue < MIN_HWE_PVALUE {
            return false
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a sumstats record with 21 tab-separated fields, where untargeted
    /// columns are filled with '-'.
    pub fn mock_record(locus: u32, column: u32, popid: &str, p: f32, hwe_pvalue: f32) -> String {
        let mut fields = vec!["-".to_string(); MIN_FIELDS];
        fields[LOCUS_ID_IDX]  = locus.to_string();
        fields[CHROM_IDX]     = "chr1".to_string();
        fields[BP_IDX]        = "10452".to_string();
        fields[LOCUS_COL_IDX] = column.to_string();
        fields[POP_ID_IDX]    = popid.to_string();
        fields[FREQ_IDX]      = p.to_string();
        fields[HWE_IDX]       = hwe_pvalue.to_string();
        fields[PRIVATE_IDX]   = "0".to_string();
        fields.join("\t")
    }

    #[test]
    fn parse_record() -> Result<(), SumstatsError> {
        let site = SumstatsSite::parse(&mock_record(12, 57, "pop-A", 0.25, 1.0))?;
        assert_eq!(site.locus, 12);
        assert_eq!(site.column, 57);
        assert_eq!(site.chromosome, "chr1");
        assert_eq!(site.position, 10452);
        assert_eq!(site.population, "pop-A");
        assert_eq!(site.key(), SnpKey{locus: 12, column: 57});
        Ok(())
    }

    #[test]
    fn parse_rejects_truncated_record() {
        let result = SumstatsSite::parse("12\tchr1\t10452\t57");
        assert_eq!(result, Err(SumstatsError::MissingFields{want: MIN_FIELDS, got: 4}));
    }

    #[test]
    fn parse_rejects_invalid_field() {
        let record = mock_record(12, 57, "pop-A", 0.25, 1.0).replace("0.25", "not-a-freq");
        let result = SumstatsSite::parse(&record);
        assert!(matches!(result, Err(SumstatsError::ParseField{field: "allele frequency", ..})));
    }

    #[test]
    fn minor_allele_frequency_folds_above_half() -> Result<(), SumstatsError> {
        let low  = SumstatsSite::parse(&mock_record(1, 0, "pop-A", 0.05, 1.0))?;
        let high = SumstatsSite::parse(&mock_record(1, 0, "pop-A", 0.95, 1.0))?;
        assert!((low.minor_allele_frequency()  - 0.05).abs() < 1e-6);
        assert!((high.minor_allele_frequency() - 0.05).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn maf_filter() -> Result<(), SumstatsError> {
        let filters = SiteFilters{maf: 0.1, hwe: false};

        // minor allele frequency 0.05 < 0.1 => rejected, on both sides of 0.5.
        assert!(!filters.passes(&SumstatsSite::parse(&mock_record(1, 0, "pop-A", 0.05, 1.0))?));
        assert!(!filters.passes(&SumstatsSite::parse(&mock_record(1, 0, "pop-A", 0.95, 1.0))?));

        assert!( filters.passes(&SumstatsSite::parse(&mock_record(1, 0, "pop-A", 0.10, 1.0))?));
        assert!( filters.passes(&SumstatsSite::parse(&mock_record(1, 0, "pop-A", 0.50, 1.0))?));
        Ok(())
    }

    #[test]
    fn hwe_filter_only_applies_when_enabled() -> Result<(), SumstatsError> {
        let out_of_hwe = SumstatsSite::parse(&mock_record(1, 0, "pop-A", 0.25, 0.0021))?;

        assert!( SiteFilters{maf: 0.0, hwe: false}.passes(&out_of_hwe));
        assert!(!SiteFilters{maf: 0.0, hwe: true }.passes(&out_of_hwe));

        let in_hwe = SumstatsSite::parse(&mock_record(1, 0, "pop-A", 0.25, 0.82))?;
        assert!( SiteFilters{maf: 0.0, hwe: true }.passes(&in_hwe));
        Ok(())
    }
}
