pub mod vcf;
pub use vcf::VcfReader;
