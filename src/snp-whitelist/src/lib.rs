pub mod sumstats;
pub mod grouper;
pub mod sampler;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use located_error::LocatedError;
use popsum_io::write::GenericWriter;

use anyhow::Result;
use log::{info, warn};

use sumstats::{SiteFilters, SumstatsSite};
use grouper::{KeptSites, SnpGrouper};
use sampler::sample_whitelist;

/// Name of the output whitelist, written at the root of the output directory.
pub const WHITELIST_FILENAME: &str = "snp_whitelist.tsv";

/// Run the `snp-whitelist` module: stream the input sumstats file, filter and
/// group its records, print the kept counts, then sample and write the final
/// whitelist.
///
/// # Errors
/// - if the input sumstats file cannot be opened.
/// - if any record is malformed (the error carries the offending line number
///   and raw content).
/// - if the output whitelist cannot be written.
pub fn run(args: &parser::SnpWhitelist) -> Result<()> {
    let filters = SiteFilters{maf: args.maf, hwe: args.hwe};

    info!("Parsing sumstats file '{}'...", args.sumstats.display());
    let kept = parse_sumstats(&args.sumstats, args.n_populations, filters)?;

    println!("Total loci kept: {}.", kept.n_loci());
    println!("Total SNPs kept: {}.", kept.n_snps());

    if kept.is_empty() {
        warn!("No site survived filtering. Skipping whitelist export.");
        return Ok(())
    }

    let mut rng = fastrand::Rng::with_seed(args.seed);
    let entries = sample_whitelist(&kept, args.number_sites, &mut rng);

    let output = args.outd.join(WHITELIST_FILENAME);
    GenericWriter::new(Some(&output))?
        .write_iter(&entries)
        .with_loc(|| format!("While writing the whitelist '{}'", output.display()))?;
    info!("Wrote {} whitelist entries to '{}'", entries.len(), output.display());
    Ok(())
}

/// Stream a populations sumstats file: skip `#` comment lines, parse and
/// filter each record, and group surviving records by SNP key. Only groups
/// found in exactly `min_populations` populations enter the returned index.
///
/// # Errors
/// - if the file cannot be opened, or any record fails to parse.
fn parse_sumstats(path: &Path, min_populations: usize, filters: SiteFilters) -> Result<KeptSites> {
    let file = File::open(path)
        .with_loc(|| format!("While attempting to open '{}'", path.display()))?;

    let mut kept = KeptSites::default();
    let mut grouper = SnpGrouper::new(min_populations);
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_loc(|| format!("While reading line {}", i + 1))?;
        if line.is_empty() || line.starts_with('#') {
            continue
        }
        let site = SumstatsSite::parse(&line)
            .with_loc(|| format!("While parsing the sumstats record at line {}: '{line}'", i + 1))?;
        if filters.passes(&site) {
            grouper.push(site, &mut kept);
        }
    }
    // The last group of the file is still pending, and must be finalized too.
    grouper.finish(&mut kept);
    Ok(kept)
}
