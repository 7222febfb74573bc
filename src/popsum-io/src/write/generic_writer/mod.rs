use std::{fs::File, io::{Write, BufWriter}, path::Path};
use anyhow::Result;

use located_error::LocatedError;

pub mod error;
pub use error::WriterError;

/// THE field separator used for this generic writer.
pub const WRITER_SEPARATOR: &str = "\t";

/// A generic file writer.
/// - source: Boxed `BufWriter` (can either handle file-writing, or stdout).
///
/// Note that when targeting a file, any pre-existing content is silently
/// overwritten.
pub struct GenericWriter<'a> {
    source: BufWriter<Box<dyn Write + 'a>>
}

impl<'a> GenericWriter<'a>{
    /// Instantiate a new `GenericWriter`, linked to a file, or to stdout when
    /// no path is provided.
    ///
    /// # Errors
    /// if `path` is either an invalid file, or the user does not have the proper
    /// UNIX permissions to write at this location.
    pub fn new(path: Option<impl AsRef<Path>>) -> Result<GenericWriter<'a>>{
        use WriterError::IOError;
        Ok(GenericWriter{ source: match path {
            Some(path) => {
                let file = File::create(path).map_err(IOError).loc("While creating file")?;
                BufWriter::new(Box::new(file))
            },
            None => {
                BufWriter::new(Box::new(std::io::stdout()))
            }
        }})
    }

    /// Write the contents of a generic iterator within a file/stdout.
    /// one Iteration step = one line.
    ///
    /// # Errors
    /// - If any of the Items within `iter` fails to get written within the file.
    pub fn write_iter<T, I>(&mut self, iter: T) -> Result<()>
    where   T: IntoIterator<Item = I>,
            I: std::fmt::Display,
    {
        iter.into_iter()
            .try_for_each(|obj| writeln!(self.source, "{obj}"))
            .map_err(WriterError::IOError)
            .loc("While writing contents into file")?;

        self.source.flush().loc("While flushing buffer contents of Writer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_file() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path          = tmpdir.path().join("whitelist.tsv");
        let mut writer = GenericWriter::new(Some(&path))?;

        let test_vec = vec![format!("42{WRITER_SEPARATOR}7"), format!("101{WRITER_SEPARATOR}0")];
        writer.write_iter(&test_vec)?;

        let got = std::io::read_to_string(File::open(path)?)?;
        assert_eq!(got, "42\t7\n101\t0\n");
        Ok(())
    }

    #[test]
    fn overwrite_existing_file() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path   = tmpdir.path().join("whitelist.tsv");

        std::fs::write(&path, "stale content\n")?;
        let mut writer = GenericWriter::new(Some(&path))?;
        writer.write_iter(["fresh"])?;

        let got = std::io::read_to_string(File::open(path)?)?;
        assert_eq!(got, "fresh\n");
        Ok(())
    }
}
