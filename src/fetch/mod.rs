//! Package archive download and extraction.
//!
//! - [`http`] - client construction, timeouts and redirect limits
//! - [`staging`] - the ephemeral extraction directory
//! - [`extraction`] - `.tgz` unpacking and package root detection
//! - [`artifact`] - streaming download into the staging directory

pub mod artifact;
pub mod extraction;
pub mod http;
pub mod staging;

pub use artifact::ArtifactFetcher;
pub use extraction::{package_root, unpack};
pub use http::HttpOptions;
pub use staging::{default_staging_dir, StagingDir, STAGING_DIR_NAME};
