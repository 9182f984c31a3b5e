//! Shared HTTP client construction.

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;

use crate::error::{InitError, Result};

/// Default timeout for registry metadata requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for streaming an archive.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of redirects followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Timeout and redirect limits for one kind of request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpOptions {
    /// Total time allowed for the request, body included.
    pub timeout: Duration,
    /// Redirects followed before the request fails.
    pub max_redirects: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl HttpOptions {
    /// Options suited to downloading an archive.
    pub fn download() -> Self {
        Self {
            timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            ..Self::default()
        }
    }

    /// Build a blocking client honouring these options.
    pub fn build_client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(concat!("titan-init/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .redirect(Policy::limited(self.max_redirects))
            .build()
            .map_err(|e| InitError::Other(anyhow::anyhow!("Failed to build HTTP client: {}", e)))
    }
}

/// Wrap a reqwest error with the URL it concerns.
pub(crate) fn transport(url: &str, source: reqwest::Error) -> InitError {
    InitError::Transport {
        url: url.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_registry_contract() {
        let options = HttpOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.max_redirects, 5);
    }

    #[test]
    fn download_options_have_longer_timeout() {
        let options = HttpOptions::download();
        assert_eq!(options.timeout, DEFAULT_DOWNLOAD_TIMEOUT);
        assert_eq!(options.max_redirects, DEFAULT_MAX_REDIRECTS);
    }

    #[test]
    fn builds_client() {
        assert!(HttpOptions::default().build_client().is_ok());
    }
}
