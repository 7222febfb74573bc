use std::{
    error::Error,
    fs::File,
    path::{Path, PathBuf},
    fmt::{self, Display, Formatter}, ffi::OsStr
};

use located_error::*;

use clap::{Parser, Subcommand, Args};
use serde::{Serialize, Deserialize};
use log::debug;
use anyhow::Result;

mod error;
pub use error::ParserError;

/// Highest acceptable minor allele frequency. Anything above this value
/// cannot, by definition, be a *minor* allele frequency.
pub const MAX_MAF: f32 = 0.5;

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="popsum-rs", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// popsum-rs: per-individual observed heterozygosity and random SNP whitelists
/// from population summary files.
pub struct Cli {
    /// Set the verbosity level (--verbose --verbose ...)
    ///
    /// Set the verbosity level of this program. Multiple levels allowed {n}
    ///
    /// once: Info  |  twice: Debug  | three times: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use The --quiet/-q to disable them
    #[clap(long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emmited and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli {
    /// Serialize command line arguments within a `.yaml` file.
    ///
    /// # Behavior
    /// - File naming follows the convention '{current time}-{module name}.yaml'. current time follows the format
    ///   `YYYY`-`MM`-`DD`T`hhmmss`
    /// - File is written at the root of the subcommand's output directory.
    ///
    /// # Errors
    /// Sends an unrecoverable error if `serde_yaml` fails to parse `Self` to a string.
    ///
    /// # Panics
    /// - Throws a tantrum whenever the provided output directory is invalid.
    pub fn serialize(&self) -> Result<(), Box<dyn Error>> {

        // Parse arguments to yaml and print to console.
        let serialized = serde_yaml::to_string(&self)
            .map_err(|err| format!("Failed to serialize command line arguments. got [{err}]"))?;

        debug!("\n---- Command line args ----\n{}\n---", serialized);

        // Fetch the appropriate output-directory and parse the name of the output file.
        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S").to_string();

        let output_file = match &self.commands {
            Commands::ObsHet {het} => {
                let dir_string = het.outdir.to_str().expect("Invalid characters in directory");
                format!("{dir_string}/{current_time}-obs-het.yaml")
            },
            Commands::SnpWhitelist {whitelist} => {
                let dir_string = whitelist.outd.to_str().expect("Invalid characters in directory");
                format!("{dir_string}/{current_time}-snp-whitelist.yaml")
            },

            Commands::FromYaml {yaml: _} => return Ok(()),
        };

        // Write arguments
        match std::fs::write(&output_file, serialized) {
            Err(e) => Err(format!("Unable to serialize arguments into {output_file}: [{e}]").into()),
            Ok(()) => Ok(()),
        }
    }

    /// Deserialize a `.yaml` file into Command line arguments.
    ///
    /// # Errors
    ///
    /// - Returns `FileNotFound` or `PermissionDenied` if the provided `.yaml` is invalid,
    ///   or does not carry read permissions
    /// - Sends an unrecoverable error if: `serde_yaml` fails to parse the provided file to `Self`.
    pub fn deserialize(yaml: PathBuf) -> Result<Self, Box<dyn Error>> {
        Ok(serde_yaml::from_reader(File::open(yaml)?)?)
    }
}

#[derive(Subcommand, Debug, Serialize, Deserialize)]
pub enum Commands {
    ObsHet {
        #[clap(flatten)]
        het: ObsHet
    },

    SnpWhitelist {
        #[clap(flatten)]
        whitelist: SnpWhitelist
    },

    /// Run popsum-rs using a previously generated .yaml configuration file.
    ///
    /// This allows users to easily re-apply a popsum-rs command using the exact same parameters
    /// and arguments.
    FromYaml {
        yaml: PathBuf,
    },
}

/// Compute the observed heterozygosity of every individual in a VCF.
///
/// Stream a multi-sample genotype VCF and tally, for every individual, the
/// proportion of heterozygous sites across all of its genotyped sites.
#[derive(Parser, Debug, Default, Serialize, Deserialize)]
pub struct ObsHet {
    /// Path to a multi-sample genotype VCF file.
    ///
    /// The file may be BGZF-compressed, provided its name ends with the '.gz' extension.
    #[clap(short='v', long, parse(try_from_os_str=valid_input_file))]
    pub vcf: PathBuf,

    /// Output directory where results will be written.
    ///
    /// Note that the provided directory must already exist: popsum-rs does not
    /// allow itself from creating it.
    #[clap(short='o', long, default_value("."), parse(try_from_os_str=valid_input_directory))]
    pub outdir: PathBuf,

    /// Number of additional parallel decompression threads.
    ///
    /// Can increase performance when working with BGZF compressed .vcf.gz files. Note that this
    /// parameter has no effect when working with uncompressed .vcf files.
    #[clap(short='#', long, default_value("0"))]
    pub decompression_threads: usize,
}

/// Subsample a random whitelist of SNPs from a populations sumstats file.
///
/// Filter the records of a populations summary-statistics file on minor allele
/// frequency, Hardy-Weinberg equilibrium and population count, then select a
/// random subset of the surviving loci.
#[derive(Args, Debug, Default, Serialize, Deserialize)]
pub struct SnpWhitelist {
    /// Path to a populations sumstats TSV file.
    #[clap(short='s', long, parse(try_from_os_str=valid_input_file))]
    pub sumstats: PathBuf,

    /// Minimum number of populations a SNP must be found in.
    ///
    /// A SNP is kept only when the number of populations in which it passed
    /// every per-record filter is exactly equal to this value.
    #[clap(short='p', long, default_value("1"))]
    pub n_populations: usize,

    /// Number of sites to keep.
    ///
    /// When this value exceeds the number of available loci, the whole set of
    /// surviving loci is exported instead, along with a warning.
    #[clap(short='n', long, default_value("1000"), parse(try_from_str=valid_number_sites))]
    pub number_sites: usize,

    /// Keep only sites in Hardy-Weinberg equilibrium.
    ///
    /// When enabled, any record whose HWE exact-test p-value lies below 0.05 is
    /// filtered out.
    #[clap(short='e', long)]
    pub hwe: bool,

    /// Minor allele frequency cutoff.
    ///
    /// Records whose minor allele frequency, i.e. min(p, 1-p), lies below this
    /// threshold are filtered out. Accepted range: [0.0, 0.5].
    #[clap(short='f', long, default_value("0.0"), parse(try_from_str=valid_maf))]
    pub maf: f32,

    /// Output directory where the whitelist will be written.
    ///
    /// Note that the provided directory must already exist: popsum-rs does not
    /// allow itself from creating it.
    #[clap(short='o', long, default_value("."), parse(try_from_os_str=valid_output_directory))]
    pub outd: PathBuf,

    /// Provide the RNG with a set seed.
    #[clap(long, required(false), default_value_t=fastrand::u64(u64::MIN..=u64::MAX))]
    pub seed: u64,
}

#[derive(Debug, Clone, Copy)]
pub enum FileEntity {File, Directory}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

impl FileEntity {
    fn validate(&self, path: &Path) -> Result<(), ParserError> {
        use ParserError::InvalidFileEntity;
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir()
        };

        if valid {
            Ok(())
        } else {
            Err(InvalidFileEntity(*self, path.display().to_string()))
        }
    }
}

fn assert_filesystem_entity_is_valid(s: &OsStr, entity: &FileEntity) -> Result<()> {
    use ParserError::MissingFileEntity;
    let path = Path::new(s);
    if ! path.exists() {
        return Err(MissingFileEntity(*entity, path.display().to_string()))
            .loc("While parsing arguments.")
    }

    entity.validate(path).loc("While parsing arguments.")
}

fn valid_input_directory(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, &FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, &FileEntity::File)
        .loc("While checking for file validity")?;
    Ok(PathBuf::from(s))
}

/// Validate an output directory, stripping any trailing path separator beforehand.
fn valid_output_directory(s: &OsStr) -> Result<PathBuf> {
    let stripped = s.to_str()
        .ok_or(ParserError::InvalidFilename)
        .loc("While checking for directory validity")?
        .trim_end_matches('/');
    assert_filesystem_entity_is_valid(OsStr::new(stripped), &FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(stripped))
}

/// Ensure the user-provided minor allele frequency lies within the [0.0, 0.5] range.
fn valid_maf(s: &str) -> Result<f32> {
    let maf = s.parse::<f32>().with_loc(|| format!("While parsing '{s}' as an allele frequency"))?;
    if maf > MAX_MAF {
        return Err(ParserError::MafAboveMax(maf)).loc("While parsing arguments.")
    }
    if maf < 0.0 {
        return Err(ParserError::NegativeMaf(maf)).loc("While parsing arguments.")
    }
    Ok(maf)
}

/// Ensure the user-provided number of sites is a strictly positive integer.
fn valid_number_sites(s: &str) -> Result<usize> {
    use ParserError::InvalidNumberSites;
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _              => Err(InvalidNumberSites(s.to_string())).loc("While parsing arguments.")
    }
}
