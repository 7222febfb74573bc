use std::{io::{BufRead, BufReader, Read}, path::Path, fs::File};

use located_error::LocatedError;

use gzp::{deflate::Bgzf, par::decompress::ParDecompressBuilder};
use anyhow::Result;
use log::debug;

mod error;
pub use error::VcfReaderError;

/// 0-based expected column index of the REF allele field.
pub const REF_FIELD_IDX: usize = 3;
/// 0-based expected column index of the ALT allele field.
pub const ALT_FIELD_IDX: usize = 4;
/// 0-based expected column index where per-sample genotype entries begin.
pub const GENOTYPES_START_IDX: usize = 9;

/// Streaming, line-oriented reader for a multi-sample `.vcf(.gz)` file.
///
/// Upon construction, the reader consumes every `##` metadata line and the
/// `#CHROM` header line, from which sample identifiers are extracted (fields
/// 9 to n, in order of appearance). Iterating then yields every genotype
/// record, paired with its 1-based line number within the file.
///
/// # Fields:
/// - `source` : Boxed BufReader for the given `.vcf(.gz)` file.
/// - `samples`: Vector of sample ids, extracted from the VCF header.
/// - `line`   : 1-based number of the last line read from the source.
pub struct VcfReader<'a> {
    source : Box<dyn BufRead + 'a>,
    samples: Vec<String>,
    line   : usize,
}

impl<'a> VcfReader<'a> {
    /// Instantiate and initialize a new `VcfReader`.
    /// # Arguments:
    /// - `path`: path leading to the `.vcf(.gz)` file.
    /// - `threads`: number of decompression threads (This is only relevant in the case of BGZF compressed `.vcf.gz` files)
    ///
    /// # Errors
    /// - if `path` cannot be opened for reading.
    /// - if the file does not contain a `#CHROM` header line.
    pub fn new(path: &Path, threads: usize) -> Result<VcfReader<'a>> {
        let loc_msg = "While attempting to create a new VcfReader";
        let mut source = Self::get_reader(path, threads).loc(loc_msg)?;
        let (samples, header_line) = Self::parse_samples_id(&mut source).loc(loc_msg)?;
        debug!("Found {} samples within the header of '{}'", samples.len(), path.display());
        Ok(VcfReader{source, samples, line: header_line})
    }

    /// Return the sample identifiers found within the `#CHROM` header, in order.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Check the file extension of the provided file, and return an appropriate BufReader
    /// - `.gz` -> Return a parallel BGZF decompressor/reader
    /// - anything else -> Return a default BufReader
    /// # Arguments
    /// - `path`   : path leading to the targeted vcf file.
    /// - `threads`: number of user-provided decompression threads for the BGZF decompressor.
    ///   (Only relevant if the file extension ends with `.gz`)
    fn get_reader(path: &Path, threads: usize) -> Result<Box<dyn BufRead>> {
        use VcfReaderError::Open;
        let vcf = File::open(path).map_err(|e| Open(path.to_path_buf(), e))?;
        let is_compressed = path.extension().is_some_and(|ext| ext == "gz");
        let source: Box<dyn Read> = match is_compressed {
            true  => ParDecompressBuilder::<Bgzf>::new().maybe_num_threads(threads).maybe_par_from_reader(vcf),
            false => Box::new(vcf),
        };
        Ok(Box::new(BufReader::new(source)))
    }

    /// Skip all vcf description lines until the header line has been found (i.e. the line starts
    /// with '#CHROM'). Then, extract the sample ids from fields 9 to n of this line.
    /// Return the sample ids, along with the 1-based line number of the header.
    /// # Arguments:
    /// - `reader`: a BufReader targeting a vcf file.
    ///
    /// # Errors:
    /// - If the reader encounters a genotype record, or reads all the file contents, without
    ///   finding any line starting with the '#CHROM' pattern.
    fn parse_samples_id(reader: &mut Box<dyn BufRead + 'a>) -> Result<(Vec<String>, usize)> {
        use VcfReaderError::MissingHeader;
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| VcfReaderError::ReadLine(i + 1, e))?;
            if line.starts_with("##") {
                continue
            }
            if line.starts_with("#CHROM") {
                let samples = line.split('\t')
                    .skip(GENOTYPES_START_IDX)
                    .map(str::to_string)
                    .collect();
                return Ok((samples, i + 1))
            }
            // Anything else is a genotype record: the header should have come first.
            return Err(MissingHeader.into())
        }
        Err(MissingHeader.into())
    }
}

impl<'a> Iterator for VcfReader<'a> {
    type Item = Result<(usize, String)>;

    /// Yield the next genotype record, along with its 1-based line number.
    /// `##` metadata lines and empty lines are silently skipped.
    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = String::new();
        loop {
            buf.clear();
            self.line += 1;
            match self.source.read_line(&mut buf) {
                Ok(0)  => return None,
                Ok(_)  => {
                    let line = buf.trim_end_matches(['\n', '\r']);
                    if line.is_empty() || line.starts_with("##") {
                        continue
                    }
                    return Some(Ok((self.line, line.to_string())))
                },
                Err(e) => return Some(Err(VcfReaderError::ReadLine(self.line, e).into())),
            }
        }
    }
}
