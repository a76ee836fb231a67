//! Review and FAQ data for the vanilla export.
//!
//! Data is read from an explicit data file, or, for projects that still keep it
//! in application code, extracted from literal expressions in source files.

pub mod literal;
pub mod loader;
pub mod records;

pub use literal::LiteralError;
pub use loader::{load, DataError, DataSource, LiteralSources};
pub use records::{FaqItem, FaqTable, Review, SiteData, Topic, FAQ_TOPICS};
