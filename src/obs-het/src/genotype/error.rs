use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenotypeError {
    #[error("Malformed genotype field '{0}': expected a '/' or '|' allele separator")]
    MissingSeparator(String),

    #[error("Malformed genotype field '{0}': expected exactly two allele calls")]
    InvalidAlleleCount(String),
}
