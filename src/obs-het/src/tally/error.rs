use thiserror::Error;

use crate::genotype::GenotypeError;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Number of genotype entries ({got}) does not match the number of samples found within the header ({want})")]
    GenotypeCountMismatch{want: usize, got: usize},

    #[error(transparent)]
    ParseGenotype(#[from] GenotypeError),
}
