use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcfReaderError {
    #[error("Unable to open '{}'", .0.display())]
    Open(PathBuf, #[source] io::Error),

    #[error("Missing VCF header: expected a line starting with '#CHROM' before any genotype record")]
    MissingHeader,

    #[error("Failed to read line {0}")]
    ReadLine(usize, #[source] io::Error),
}
