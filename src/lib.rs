extern crate parser;
extern crate logger;

use parser::{Cli, Commands::*};

#[macro_use]
extern crate log;

use std::error::Error;

/// Unpack the parsed command line arguments and run the requested module.
pub fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.commands {
        ObsHet {het} => {
            info!("Computing per-individual observed heterozygosity...");
            obs_het::run(&het)?;
        },

        SnpWhitelist {whitelist} => {
            // ----------------------------- Set seed (randomly assigned by the parser if none was provided.)
            fastrand::seed(whitelist.seed);
            info!("Subsampling a random SNP whitelist (seed: {})...", whitelist.seed);
            snp_whitelist::run(&whitelist)?;
        },

        FromYaml{yaml} => {
            let cli: Cli = match serde_yaml::from_reader(std::fs::File::open(&yaml)?) {
                Ok(cli)  => cli,
                Err(e) => return Err(format!("Unable to deserialize arguments from {yaml:?} file: [{e}]").into())
            };
            self::run(cli)?;
        },
    };
    Ok(())
}
