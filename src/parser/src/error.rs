use thiserror::Error;
use crate::FileEntity;

#[derive(Error, Debug)]
pub enum ParserError{
    #[error("{0} '{1}' does not exist")]
    MissingFileEntity(FileEntity, String),

    #[error("'{1}' is not a {0}")]
    InvalidFileEntity(FileEntity, String),

    #[error("MAF ({0}) greater than 0.5")]
    MafAboveMax(f32),

    #[error("MAF ({0}) must be a positive frequency")]
    NegativeMaf(f32),

    #[error("'number-sites' ({0}) must be a non-zero positive integer")]
    InvalidNumberSites(String),

    #[error("File or directory returned an empty string, and may contain invalid UTF-8 characters")]
    InvalidFilename,
}
