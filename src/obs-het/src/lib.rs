pub mod genotype;
pub mod site;
pub mod tally;
pub mod summary;

use std::path::Path;

use located_error::LocatedError;
use popsum_io::read::VcfReader;
use popsum_io::write::GenericWriter;

use anyhow::Result;
use log::{info, warn};

use site::SiteRecord;
use tally::HetTallies;

/// Name of the output table, written at the root of the output directory.
pub const HET_TABLE_FILENAME: &str = "per_individual_heterozygosity.tsv";

/// Header of the per-individual output table.
pub const HET_TABLE_HEADER: &str = "\
#indv_id\tnum_total_sites\tnum_total_var_sites\t\
num_sites_in_indv\tnum_var_sites_in_indv\tnum_hets_in_indv\t\
prop_hets_total_indv_sites\tprop_hets_indv_var_sites";

/// Run the `obs-het` module: stream the input VCF, tally per-individual
/// heterozygosity, write the output table and print the console summary.
///
/// # Errors
/// - if the input VCF cannot be opened, or lacks a `#CHROM` header.
/// - if any genotype record is malformed (the error carries the offending
///   line number and raw content).
/// - if the output table cannot be written.
pub fn run(args: &parser::ObsHet) -> Result<()> {
    info!("Parsing VCF '{}'...", args.vcf.display());
    let reader = VcfReader::new(&args.vcf, args.decompression_threads)?;
    let samples = reader.samples().to_vec();

    info!("Processing genotypes for {} samples.", samples.len());
    if samples.is_empty() {
        warn!("No sample columns found within the VCF header. The output table will be empty.");
    }

    let mut tallies = HetTallies::new(samples);
    for record in reader {
        let (line_number, line) = record?;
        let site = SiteRecord::parse(&line)
            .with_loc(|| format!("While parsing the genotype record at line {line_number}: '{line}'"))?;
        tallies.record_site(&site)
            .with_loc(|| format!("While processing the genotype record at line {line_number}: '{line}'"))?;
    }

    let output = args.outdir.join(HET_TABLE_FILENAME);
    write_table(&tallies, &output)?;
    info!("Wrote per-individual heterozygosity table to '{}'", output.display());

    println!("{}", tallies.summary());
    Ok(())
}

/// Write the per-individual output table: one header row, then one row per
/// sample, in header order. Any pre-existing file is overwritten.
fn write_table(tallies: &HetTallies, output: &Path) -> Result<()> {
    let mut writer = GenericWriter::new(Some(output))
        .with_loc(|| format!("While creating the output table '{}'", output.display()))?;
    writer.write_iter([HET_TABLE_HEADER])?;
    writer.write_iter(tallies.rows())
        .with_loc(|| format!("While writing the output table '{}'", output.display()))
}
