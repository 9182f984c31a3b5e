//! Package metadata returned by a registry.

use serde::{Deserialize, Serialize};

/// The `latest` document of a package, reduced to what scaffolding needs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PackageMetadata {
    /// Package name as published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Published version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Package description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Distribution information.
    pub dist: Dist,
}

/// Where the packed archive lives.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Dist {
    /// URL of the gzip-compressed tarball.
    pub tarball: String,

    /// SHA-1 of the tarball, hex encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shasum: Option<String>,

    /// Subresource integrity string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

impl PackageMetadata {
    /// URL of the tarball to download.
    pub fn tarball_url(&self) -> &str {
        &self.dist.tarball
    }

    /// `name@version` when both are known, otherwise whatever is.
    pub fn label(&self, requested: &str) -> String {
        let name = self.name.as_deref().unwrap_or(requested);
        match &self.version {
            Some(version) => format!("{}@{}", name, version),
            None => name.to_string(),
        }
    }
}
