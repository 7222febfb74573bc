pub mod generic_writer;
pub use generic_writer::GenericWriter;
