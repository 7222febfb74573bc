use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    #[error("Expected at least {want} tab-separated fields within the genotype record, got {got}")]
    MissingFields{want: usize, got: usize},
}
