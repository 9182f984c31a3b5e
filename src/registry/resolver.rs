//! Package resolution against a registry.
//!
//! Resolution is a single `GET {registry}/{package}/latest`. Anything other
//! than HTTP 200 aborts the run before any download is attempted.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;

use crate::error::{InitError, Result};
use crate::fetch::http::{transport, HttpOptions};

use super::package::PackageMetadata;
use super::source::RegistrySource;

/// Resolves package names to their published metadata.
#[derive(Debug, Clone)]
pub struct RegistryResolver {
    client: Client,
    source: RegistrySource,
    options: HttpOptions,
}

impl RegistryResolver {
    /// Create a resolver with the default 5 second timeout and 5 redirects.
    pub fn new(source: RegistrySource) -> Result<Self> {
        Self::with_options(source, HttpOptions::default())
    }

    /// Create a resolver with custom HTTP options.
    pub fn with_options(source: RegistrySource, options: HttpOptions) -> Result<Self> {
        Ok(Self {
            client: options.build_client()?,
            source,
            options,
        })
    }

    /// The registry this resolver talks to.
    pub fn source(&self) -> &RegistrySource {
        &self.source
    }

    /// The HTTP options in use.
    pub fn options(&self) -> HttpOptions {
        self.options
    }

    /// URL of the `latest` document for `package`.
    ///
    /// Scoped names keep their `@` but have the separating slash encoded.
    pub fn metadata_url(&self, package: &str) -> String {
        let encoded = package.replace('/', "%2F");
        format!("{}/{}/latest", self.source.base_url(), encoded)
    }

    /// Fetch the metadata of the latest version of `package`.
    pub fn resolve(&self, package: &str) -> Result<PackageMetadata> {
        let package = package.trim();
        if package.is_empty() {
            return Err(InitError::ConfigValidationError {
                message: "Package name must not be empty".to_string(),
            });
        }

        let url = self.metadata_url(package);
        tracing::debug!("Fetching package info from {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| transport(&url, e))?;

        let status = response.status();
        let body = response.text().map_err(|e| transport(&url, e))?;

        if status != StatusCode::OK {
            return Err(InitError::Registry {
                package: package.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let metadata: PackageMetadata =
            serde_json::from_str(&body).map_err(|e| InitError::RegistryMetadata {
                package: package.to_string(),
                message: e.to_string(),
            })?;

        if metadata.dist.tarball.trim().is_empty() {
            return Err(InitError::RegistryMetadata {
                package: package.to_string(),
                message: "dist.tarball is empty".to_string(),
            });
        }

        tracing::debug!("Resolved {} to {}", package, metadata.tarball_url());
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn resolver_for(server: &MockServer) -> RegistryResolver {
        RegistryResolver::new(RegistrySource::Custom(server.base_url())).unwrap()
    }

    #[test]
    fn metadata_url_for_plain_package() {
        let resolver = RegistryResolver::new(RegistrySource::Npm).unwrap();
        assert_eq!(
            resolver.metadata_url("egg-boilerplate-simple"),
            "https://registry.npmjs.org/egg-boilerplate-simple/latest"
        );
    }

    #[test]
    fn metadata_url_encodes_scope_separator() {
        let resolver = RegistryResolver::new(RegistrySource::Npm).unwrap();
        assert_eq!(
            resolver.metadata_url("@eggjs/boilerplate"),
            "https://registry.npmjs.org/@eggjs%2Fboilerplate/latest"
        );
    }

    #[test]
    fn resolves_tarball_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/egg-boilerplate-simple/latest");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"name":"egg-boilerplate-simple","version":"3.3.1",
                        "dist":{"tarball":"https://example.com/simple-3.3.1.tgz"}}"#,
                );
        });

        let meta = resolver_for(&server)
            .resolve("egg-boilerplate-simple")
            .unwrap();

        mock.assert();
        assert_eq!(meta.tarball_url(), "https://example.com/simple-3.3.1.tgz");
        assert_eq!(meta.version.as_deref(), Some("3.3.1"));
    }

    #[test]
    fn not_found_is_registry_error_with_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/does-not-exist/latest");
            then.status(404).body(r#"{"error":"[NOT_FOUND] does-not-exist not found"}"#);
        });

        let err = resolver_for(&server)
            .resolve("does-not-exist")
            .unwrap_err();

        match err {
            InitError::Registry {
                package,
                status,
                body,
            } => {
                assert_eq!(package, "does-not-exist");
                assert_eq!(status, 404);
                assert!(body.contains("NOT_FOUND"));
            }
            other => panic!("expected Registry error, got {other:?}"),
        }
    }

    #[test]
    fn server_error_is_registry_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pkg/latest");
            then.status(500).body("boom");
        });

        let err = resolver_for(&server).resolve("pkg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Registry);
    }

    #[test]
    fn missing_tarball_is_metadata_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pkg/latest");
            then.status(200).body(r#"{"name":"pkg","version":"1.0.0"}"#);
        });

        let err = resolver_for(&server).resolve("pkg").unwrap_err();
        assert!(matches!(err, InitError::RegistryMetadata { .. }));
    }

    #[test]
    fn invalid_json_is_metadata_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pkg/latest");
            then.status(200).body("<html>not json</html>");
        });

        let err = resolver_for(&server).resolve("pkg").unwrap_err();
        assert!(matches!(err, InitError::RegistryMetadata { .. }));
    }

    #[test]
    fn follows_redirects() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pkg/latest");
            then.status(302)
                .header("location", server.url("/mirror/pkg/latest"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/mirror/pkg/latest");
            then.status(200)
                .body(r#"{"dist":{"tarball":"http://example.com/pkg.tgz"}}"#);
        });

        let meta = resolver_for(&server).resolve("pkg").unwrap();
        assert_eq!(meta.tarball_url(), "http://example.com/pkg.tgz");
    }

    #[test]
    fn redirect_limit_is_enforced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pkg/latest");
            then.status(302).header("location", server.url("/pkg/latest"));
        });

        let resolver = RegistryResolver::with_options(
            RegistrySource::Custom(server.base_url()),
            HttpOptions {
                timeout: Duration::from_secs(5),
                max_redirects: 2,
            },
        )
        .unwrap();

        let err = resolver.resolve("pkg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn unreachable_registry_is_transport_error() {
        let resolver =
            RegistryResolver::new(RegistrySource::Custom("http://127.0.0.1:9".into())).unwrap();
        let err = resolver.resolve("pkg").unwrap_err();
        assert!(matches!(err, InitError::Transport { .. }));
    }

    #[test]
    fn empty_package_name_is_rejected_without_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200);
        });

        let err = resolver_for(&server).resolve("  ").unwrap_err();
        assert!(matches!(err, InitError::ConfigValidationError { .. }));
        assert_eq!(mock.hits(), 0);
    }
}
