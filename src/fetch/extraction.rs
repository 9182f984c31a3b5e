//! Gzip-compressed tarball extraction.
//!
//! Entries are validated before unpacking so nothing can land outside the
//! staging directory.

use flate2::read::GzDecoder;
use std::error::Error as StdError;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use crate::error::{InitError, Result};

/// Unpack a `.tgz` byte stream into `dest`.
///
/// The whole stream is consumed, including anything after the tar
/// end-of-archive marker, so the gzip trailer is verified before this
/// returns. `origin` names the stream in transport errors.
///
/// Returns the number of entries unpacked.
pub fn unpack<R: Read>(reader: R, dest: &Path, origin: &str) -> Result<usize> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    let mut unpacked = 0;

    for entry_result in archive.entries().map_err(|e| classify(origin, e))? {
        let mut entry = entry_result.map_err(|e| classify(origin, e))?;
        if entry.header().entry_type().is_pax_global_extensions() {
            continue;
        }

        let entry_path = entry.path().map_err(|e| classify(origin, e))?.into_owned();
        validate_entry_path(&entry_path)?;

        match entry.unpack_in(dest) {
            Ok(true) => unpacked += 1,
            Ok(false) => {
                return Err(InitError::PathTraversal {
                    path: entry_path.display().to_string(),
                })
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(InitError::filesystem(dest.join(&entry_path), e))
            }
            Err(e) => return Err(classify(origin, e)),
        }
    }

    let mut rest = archive.into_inner();
    io::copy(&mut rest, &mut io::sink()).map_err(|e| classify(origin, e))?;

    tracing::debug!("Unpacked {} entries into {}", unpacked, dest.display());
    Ok(unpacked)
}

/// Locate the single top-level directory of an extracted archive.
pub fn package_root(dest: &Path) -> Result<PathBuf> {
    let entries: Vec<PathBuf> = fs::read_dir(dest)
        .map_err(|e| InitError::filesystem(dest, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<_>>()
        .map_err(|e| InitError::filesystem(dest, e))?;

    match entries.as_slice() {
        [only] if only.symlink_metadata().is_ok_and(|m| m.is_dir()) => Ok(only.clone()),
        _ => Err(InitError::ArchiveLayout {
            found: entries.len(),
        }),
    }
}

/// Reject absolute paths and `..` components.
fn validate_entry_path(path: &Path) -> Result<()> {
    let escapes = path.is_absolute()
        || path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        return Err(InitError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Split stream failures into network and archive problems.
///
/// `tar` wraps reader failures in its own error, so the whole cause chain
/// is searched for the network error.
fn classify(origin: &str, err: io::Error) -> InitError {
    if err
        .get_ref()
        .is_some_and(|inner| inner.is::<reqwest::Error>())
    {
        return match err
            .into_inner()
            .map(|inner| inner.downcast::<reqwest::Error>())
        {
            Some(Ok(source)) => InitError::Transport {
                url: origin.to_string(),
                source: *source,
            },
            _ => InitError::Interrupted {
                url: origin.to_string(),
                message: "stream was interrupted".to_string(),
            },
        };
    }

    if let Some(cause) = network_cause(&err) {
        return InitError::Interrupted {
            url: origin.to_string(),
            message: describe_chain(cause),
        };
    }

    InitError::Extraction {
        message: describe_chain(&err),
    }
}

/// Find a `reqwest::Error` anywhere below `err`.
fn network_cause(err: &io::Error) -> Option<&reqwest::Error> {
    let mut next = err.get_ref().map(|inner| inner as &(dyn StdError + 'static));
    while let Some(cause) = next {
        if let Some(network) = cause.downcast_ref::<reqwest::Error>() {
            return Some(network);
        }
        // io::Error::source skips the error it wraps
        next = match cause.downcast_ref::<io::Error>().and_then(io::Error::get_ref) {
            Some(inner) => Some(inner as &(dyn StdError + 'static)),
            None => cause.source(),
        };
    }
    None
}

/// Render `err` followed by each distinct cause, joined with `: `.
fn describe_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut next = err.source();
    while let Some(cause) = next {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        next = cause.source();
    }
    message
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    /// Build a `.tgz` in memory from `(path, content)` pairs.
    pub(crate) fn tgz(files: &[(&str, &[u8])]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, path, *content).unwrap();
        }
        let encoder = builder.into_inner().unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn unpacks_npm_style_archive() {
        let temp = TempDir::new().unwrap();
        let bytes = tgz(&[
            ("package/package.json", b"{\"name\":\"x\"}"),
            ("package/boilerplate/README.md", b"# {{ name }}"),
        ]);

        let count = unpack(bytes.as_slice(), temp.path(), "memory").unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            fs::read_to_string(temp.path().join("package/boilerplate/README.md")).unwrap(),
            "# {{ name }}"
        );
        assert_eq!(package_root(temp.path()).unwrap(), temp.path().join("package"));
    }

    #[test]
    fn truncated_archive_is_extraction_error() {
        let temp = TempDir::new().unwrap();
        let bytes = tgz(&[("package/a.txt", &[b'a'; 4096])]);
        let truncated = &bytes[..bytes.len() / 2];

        let err = unpack(truncated, temp.path(), "memory").unwrap_err();
        assert!(matches!(err, InitError::Extraction { .. }), "{err:?}");
    }

    #[test]
    fn non_gzip_stream_is_extraction_error() {
        let temp = TempDir::new().unwrap();
        let err = unpack(&b"<html>502 Bad Gateway</html>"[..], temp.path(), "memory").unwrap_err();
        assert!(matches!(err, InitError::Extraction { .. }));
    }

    #[test]
    fn flat_archive_has_no_package_root() {
        let temp = TempDir::new().unwrap();
        let bytes = tgz(&[("index.js", b"1"), ("README.md", b"2")]);
        unpack(bytes.as_slice(), temp.path(), "memory").unwrap();

        let err = package_root(temp.path()).unwrap_err();
        assert!(matches!(err, InitError::ArchiveLayout { found: 2 }));
    }

    #[test]
    fn single_top_level_file_has_no_package_root() {
        let temp = TempDir::new().unwrap();
        let bytes = tgz(&[("index.js", b"1")]);
        unpack(bytes.as_slice(), temp.path(), "memory").unwrap();

        assert!(matches!(
            package_root(temp.path()),
            Err(InitError::ArchiveLayout { found: 1 })
        ));
    }

    #[test]
    fn empty_archive_has_no_package_root() {
        let temp = TempDir::new().unwrap();
        let bytes = tgz(&[]);
        assert_eq!(unpack(bytes.as_slice(), temp.path(), "memory").unwrap(), 0);
        assert!(matches!(
            package_root(temp.path()),
            Err(InitError::ArchiveLayout { found: 0 })
        ));
    }

    #[test]
    fn rejects_parent_dir_components() {
        for bad in ["../escape.txt", "package/../../escape.txt"] {
            let result = validate_entry_path(Path::new(bad));
            assert!(
                matches!(result, Err(InitError::PathTraversal { .. })),
                "expected PathTraversal for {bad}"
            );
        }
    }

    #[test]
    fn rejects_absolute_path() {
        let result = validate_entry_path(Path::new("/etc/passwd"));
        assert!(matches!(result, Err(InitError::PathTraversal { .. })));
    }

    #[test]
    fn accepts_normal_and_dot_prefixed_paths() {
        assert!(validate_entry_path(Path::new("package/lib/index.js")).is_ok());
        assert!(validate_entry_path(Path::new("./package/.gitignore")).is_ok());
    }

    #[derive(Debug)]
    struct Wrapper(io::Error);

    impl std::fmt::Display for Wrapper {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "failed to unpack `package/big.bin`")
        }
    }

    impl StdError for Wrapper {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn nested_cause_is_kept_in_message() {
        let inner = io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected end of file");
        let err = io::Error::new(io::ErrorKind::UnexpectedEof, Wrapper(inner));

        let err = classify("x", err);
        assert!(matches!(err, InitError::Extraction { .. }));
        let message = err.to_string();
        assert!(message.contains("failed to unpack"), "{message}");
        assert!(message.contains("unexpected end of file"), "{message}");
    }

    #[test]
    fn plain_io_error_is_extraction_error() {
        let err = classify("x", io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(matches!(err, InitError::Extraction { .. }));
    }
}
