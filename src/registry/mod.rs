//! Package registry access.
//!
//! - [`source`] - registry aliases and custom URLs
//! - [`package`] - the `latest` metadata document
//! - [`resolver`] - name to metadata resolution
//!
//! # Example
//!
//! ```
//! use titan_init::registry::{RegistryResolver, RegistrySource};
//!
//! let resolver = RegistryResolver::new(RegistrySource::Npm).unwrap();
//! assert_eq!(
//!     resolver.metadata_url("egg-boilerplate-simple"),
//!     "https://registry.npmjs.org/egg-boilerplate-simple/latest"
//! );
//! ```

pub mod package;
pub mod resolver;
pub mod source;

pub use package::{Dist, PackageMetadata};
pub use resolver::RegistryResolver;
pub use source::RegistrySource;
