pub mod aggregate;
pub mod directory;
pub mod edit;
pub mod enricher;
pub mod filter;
pub mod record;
pub mod sort;
