use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SumstatsError {
    #[error("Expected at least {want} tab-separated fields within the sumstats record, got {got}")]
    MissingFields{want: usize, got: usize},

    #[error("Failed to parse the '{field}' field from value '{value}'")]
    ParseField{field: &'static str, value: String},
}
