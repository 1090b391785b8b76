//! Site registry module
//!
//! Defines the site record, the directory seam the aggregator reads sites
//! from, and priority classification.

mod directory;
mod priority;
mod types;

pub use directory::{
    DirectoryError, FileSiteDirectory, SiteDirectory, SiteSelector, StaticSiteDirectory,
};
pub use priority::{MarkerClassifier, PriorityClassifier};
pub use types::Site;
