pub mod fusion;
pub mod gtf;
pub use fusion::FusionTable;
pub use gtf::GtfAttributes;
