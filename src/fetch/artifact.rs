//! Streaming archive download.

use reqwest::blocking::Client;
use std::path::PathBuf;

use crate::error::Result;

use super::extraction::{package_root, unpack};
use super::http::{transport, HttpOptions};
use super::staging::StagingDir;

/// Downloads a package tarball straight into a staging directory.
///
/// The response body is piped into the decompressor as it arrives; the
/// archive never touches disk in compressed form.
#[derive(Debug, Clone)]
pub struct ArtifactFetcher {
    client: Client,
    options: HttpOptions,
}

impl ArtifactFetcher {
    /// Create a fetcher with the default download timeout.
    pub fn new() -> Result<Self> {
        Self::with_options(HttpOptions::download())
    }

    /// Create a fetcher with custom HTTP options.
    pub fn with_options(options: HttpOptions) -> Result<Self> {
        Ok(Self {
            client: options.build_client()?,
            options,
        })
    }

    /// The HTTP options in use.
    pub fn options(&self) -> HttpOptions {
        self.options
    }

    /// Download `url` and extract it into `staging`.
    ///
    /// The staging directory is reset first. Returns the package's single
    /// top-level directory inside the staging area.
    pub fn fetch(&self, url: &str, staging: &StagingDir) -> Result<PathBuf> {
        staging.reset()?;

        tracing::debug!("Downloading {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| transport(url, e))?;

        unpack(response, staging.path(), url)?;

        let root = package_root(staging.path())?;
        tracing::debug!("Extracted to {}", root.display());
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, InitError};
    use crate::fetch::extraction::tests::tgz;
    use httpmock::prelude::*;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn fetches_and_extracts_package() {
        let server = MockServer::start();
        let archive = tgz(&[
            ("package/package.json", b"{}"),
            ("package/boilerplate/.gitignore", b"node_modules"),
        ]);
        let mock = server.mock(|when, then| {
            when.method(GET).path("/pkg/-/pkg-1.0.0.tgz");
            then.status(200)
                .header("content-type", "application/octet-stream")
                .body(archive.clone());
        });

        let temp = TempDir::new().unwrap();
        let staging = StagingDir::new(temp.path().join("stage"));
        let root = ArtifactFetcher::new()
            .unwrap()
            .fetch(&server.url("/pkg/-/pkg-1.0.0.tgz"), &staging)
            .unwrap();

        mock.assert();
        assert_eq!(root, staging.path().join("package"));
        assert!(root.join("boilerplate/.gitignore").is_file());
    }

    #[test]
    fn previous_staging_content_is_discarded() {
        let server = MockServer::start();
        let archive = tgz(&[("package/new.txt", b"new")]);
        server.mock(|when, then| {
            when.method(GET).path("/a.tgz");
            then.status(200).body(archive.clone());
        });

        let temp = TempDir::new().unwrap();
        let staging = StagingDir::new(temp.path().join("stage"));
        fs::create_dir_all(staging.path().join("package")).unwrap();
        fs::write(staging.path().join("package/stale.txt"), "old").unwrap();
        fs::write(staging.path().join("leftover.txt"), "old").unwrap();

        let root = ArtifactFetcher::new()
            .unwrap()
            .fetch(&server.url("/a.tgz"), &staging)
            .unwrap();

        assert!(root.join("new.txt").exists());
        assert!(!root.join("stale.txt").exists());
        assert!(!staging.path().join("leftover.txt").exists());
    }

    #[test]
    fn follows_redirect_to_tarball() {
        let server = MockServer::start();
        let archive = tgz(&[("package/index.js", b"1")]);
        server.mock(|when, then| {
            when.method(GET).path("/short.tgz");
            then.status(301).header("location", server.url("/real.tgz"));
        });
        server.mock(|when, then| {
            when.method(GET).path("/real.tgz");
            then.status(200).body(archive.clone());
        });

        let temp = TempDir::new().unwrap();
        let staging = StagingDir::new(temp.path().join("stage"));
        let root = ArtifactFetcher::new()
            .unwrap()
            .fetch(&server.url("/short.tgz"), &staging)
            .unwrap();
        assert!(root.join("index.js").exists());
    }

    #[test]
    fn http_error_is_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone.tgz");
            then.status(404);
        });

        let temp = TempDir::new().unwrap();
        let staging = StagingDir::new(temp.path().join("stage"));
        let err = ArtifactFetcher::new()
            .unwrap()
            .fetch(&server.url("/gone.tgz"), &staging)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    /// Serve `body` with its full length announced, send only the first
    /// half, then hang up.
    fn serve_truncated(body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body[..body.len() / 2]);
            let _ = stream.flush();
        });
        format!("http://{}/pkg.tgz", addr)
    }

    #[test]
    fn connection_dropped_mid_archive_is_transport_error() {
        let noise: Vec<u8> = (0..400_000u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
            .collect();
        let archive = tgz(&[("package/index.js", b"1"), ("package/big.bin", noise.as_slice())]);
        let url = serve_truncated(archive);

        let temp = TempDir::new().unwrap();
        let staging = StagingDir::new(temp.path().join("stage"));
        let err = ArtifactFetcher::new()
            .unwrap()
            .fetch(&url, &staging)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport, "{err}");
        assert!(err.to_string().contains(&url), "{err}");
    }

    #[test]
    fn corrupt_body_is_extraction_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/bad.tgz");
            then.status(200).body("definitely not gzip");
        });

        let temp = TempDir::new().unwrap();
        let staging = StagingDir::new(temp.path().join("stage"));
        let err = ArtifactFetcher::new()
            .unwrap()
            .fetch(&server.url("/bad.tgz"), &staging)
            .unwrap_err();
        assert!(matches!(err, InitError::Extraction { .. }));
    }

    #[test]
    fn flat_archive_is_layout_error() {
        let server = MockServer::start();
        let archive = tgz(&[("index.js", b"1"), ("lib.js", b"2")]);
        server.mock(|when, then| {
            when.method(GET).path("/flat.tgz");
            then.status(200).body(archive.clone());
        });

        let temp = TempDir::new().unwrap();
        let staging = StagingDir::new(temp.path().join("stage"));
        let err = ArtifactFetcher::new()
            .unwrap()
            .fetch(&server.url("/flat.tgz"), &staging)
            .unwrap_err();
        assert!(matches!(err, InitError::ArchiveLayout { found: 2 }));
    }
}
