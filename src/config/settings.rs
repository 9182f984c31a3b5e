//! Tool settings discovery and loading.
//!
//! Settings are layered, later layers overriding earlier ones field by field:
//!
//! 1. Built-in defaults
//! 2. User global settings (`~/.titan-init/config.yml`)
//! 3. Project-local settings (`.titan-init.yml` in the working directory)
//! 4. An explicit `--config` file
//! 5. Command-line flags and environment variables
//!
//! # Example
//!
//! ```yaml
//! registry: npm
//! package: egg-boilerplate-simple
//! template_dir: boilerplate
//! timeout_secs: 5
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{InitError, Result};
use crate::fetch::http::{HttpOptions, DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT};
use crate::fetch::staging::default_staging_dir;
use crate::registry::RegistrySource;

/// Package scaffolded when none is configured.
pub const DEFAULT_PACKAGE: &str = "egg-boilerplate-simple";

/// Directory inside the package that holds the template tree.
pub const DEFAULT_TEMPLATE_DIR: &str = "boilerplate";

/// Project-local settings file name.
pub const PROJECT_SETTINGS_FILE: &str = ".titan-init.yml";

/// Redirect ceiling accepted from settings.
const MAX_ALLOWED_REDIRECTS: usize = 10;

/// One layer of settings as written in a YAML file; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// Registry alias (`npm`, `npmmirror`, `aliyun`, `17zuoye`) or URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    /// Package providing the template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Sub-path of the package copied into the project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<String>,

    /// Where archives are extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,

    /// Registry request timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Archive download timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_timeout_secs: Option<u64>,

    /// Redirects followed per request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_redirects: Option<usize>,
}

impl SettingsFile {
    /// Parse settings from YAML text.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| InitError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read and parse a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| InitError::filesystem(path, e))?;
        Self::parse(&content, path)
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(self, other: SettingsFile) -> SettingsFile {
        SettingsFile {
            registry: other.registry.or(self.registry),
            package: other.package.or(self.package),
            template_dir: other.template_dir.or(self.template_dir),
            staging_dir: other.staging_dir.or(self.staging_dir),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            download_timeout_secs: other.download_timeout_secs.or(self.download_timeout_secs),
            max_redirects: other.max_redirects.or(self.max_redirects),
        }
    }
}

/// Settings files found on disk.
#[derive(Debug, Clone, Default)]
pub struct SettingsPaths {
    /// User global settings: ~/.titan-init/config.yml
    pub user_global: Option<PathBuf>,

    /// Project settings: ./.titan-init.yml
    pub project: Option<PathBuf>,
}

impl SettingsPaths {
    /// Discover settings files for `working_dir`.
    pub fn discover(working_dir: &Path) -> Self {
        Self {
            user_global: dirs::home_dir()
                .map(|h| h.join(".titan-init").join("config.yml"))
                .filter(|p| p.is_file()),
            project: Some(working_dir.join(PROJECT_SETTINGS_FILE)).filter(|p| p.is_file()),
        }
    }

    /// Existing paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.user_global.iter().chain(self.project.iter()).collect()
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Registry to resolve packages against.
    pub registry: RegistrySource,
    /// Package providing the template.
    pub package: String,
    /// Sub-path of the extracted package to copy; empty copies the root.
    pub template_dir: String,
    /// Extraction directory.
    pub staging_dir: PathBuf,
    /// Options for registry requests.
    pub metadata_http: HttpOptions,
    /// Options for archive downloads.
    pub download_http: HttpOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry: RegistrySource::default(),
            package: DEFAULT_PACKAGE.to_string(),
            template_dir: DEFAULT_TEMPLATE_DIR.to_string(),
            staging_dir: default_staging_dir(),
            metadata_http: HttpOptions::default(),
            download_http: HttpOptions::download(),
        }
    }
}

impl Settings {
    /// Discover and layer settings for `working_dir`.
    ///
    /// `explicit` must exist when given. `overrides` are applied last.
    pub fn load(
        working_dir: &Path,
        explicit: Option<&Path>,
        overrides: SettingsFile,
    ) -> Result<Self> {
        Self::load_from(&SettingsPaths::discover(working_dir), explicit, overrides)
    }

    /// Layer settings from already discovered paths.
    pub fn load_from(
        paths: &SettingsPaths,
        explicit: Option<&Path>,
        overrides: SettingsFile,
    ) -> Result<Self> {
        let mut merged = SettingsFile::default();

        for path in paths.all_existing() {
            tracing::debug!("Loading settings from {}", path.display());
            merged = merged.merge(SettingsFile::load(path)?);
        }

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(InitError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            tracing::debug!("Loading settings from {}", path.display());
            merged = merged.merge(SettingsFile::load(path)?);
        }

        Self::from_file(merged.merge(overrides))
    }

    /// Resolve a settings layer against the defaults and validate it.
    pub fn from_file(file: SettingsFile) -> Result<Self> {
        let invalid = |message: String| InitError::ConfigValidationError { message };

        let registry = match file.registry {
            Some(value) => value.parse::<RegistrySource>().map_err(invalid)?,
            None => RegistrySource::default(),
        };

        let package = file
            .package
            .map(|p| p.trim().to_string())
            .unwrap_or_else(|| DEFAULT_PACKAGE.to_string());
        if package.is_empty() {
            return Err(invalid("package must not be empty".to_string()));
        }

        let template_dir = file
            .template_dir
            .map(|d| d.trim().trim_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_TEMPLATE_DIR.to_string());
        if Path::new(&template_dir)
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(invalid(format!(
                "template_dir '{}' must be a relative path inside the package",
                template_dir
            )));
        }

        let timeout = positive_secs("timeout_secs", file.timeout_secs, DEFAULT_TIMEOUT)?;
        let download_timeout = positive_secs(
            "download_timeout_secs",
            file.download_timeout_secs,
            DEFAULT_DOWNLOAD_TIMEOUT,
        )?;

        let max_redirects = file.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS);
        if max_redirects > MAX_ALLOWED_REDIRECTS {
            return Err(invalid(format!(
                "max_redirects must be at most {}, got {}",
                MAX_ALLOWED_REDIRECTS, max_redirects
            )));
        }

        Ok(Self {
            registry,
            package,
            template_dir,
            staging_dir: file.staging_dir.unwrap_or_else(default_staging_dir),
            metadata_http: HttpOptions {
                timeout,
                max_redirects,
            },
            download_http: HttpOptions {
                timeout: download_timeout,
                max_redirects,
            },
        })
    }
}

fn positive_secs(field: &str, value: Option<u64>, default: Duration) -> Result<Duration> {
    match value {
        None => Ok(default),
        Some(0) => Err(InitError::ConfigValidationError {
            message: format!("{} must be greater than zero", field),
        }),
        Some(secs) => Ok(Duration::from_secs(secs)),
    }
}
