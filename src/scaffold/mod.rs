//! End-to-end project generation.
//!
//! A [`Scaffolder`] runs the pipeline in strict order:
//!
//! 1. resolve the package against the registry
//! 2. download and extract its tarball into the staging directory
//! 3. copy the package's template directory into `<working dir>/<name>`,
//!    substituting `{{ key }}` tokens from the collected answers
//!
//! The first failing step aborts the run. Nothing is rolled back: a
//! destination that was already populated stays in place, and a partial
//! staging directory is cleared on the next run.

use std::path::{Path, PathBuf};

use crate::config::{validate_project_name, Configuration, Settings};
use crate::error::{InitError, Result};
use crate::fetch::{ArtifactFetcher, StagingDir};
use crate::registry::{PackageMetadata, RegistryResolver};
use crate::template::{CopyReport, TemplateCopier};
use crate::ui::UserInterface;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    /// Metadata of the package that was used.
    pub package: PackageMetadata,
    /// Top-level directory of the extracted package.
    pub extracted_root: PathBuf,
    /// Directory the template was copied from.
    pub template_root: PathBuf,
    /// Result of the copy.
    pub copy: CopyReport,
}

impl ScaffoldReport {
    /// The generated project directory.
    pub fn destination(&self) -> &Path {
        &self.copy.destination
    }
}

/// Generates projects from a registry package.
#[derive(Debug, Clone)]
pub struct Scaffolder {
    settings: Settings,
    working_dir: PathBuf,
}

impl Scaffolder {
    /// Create a scaffolder that writes projects below `working_dir`.
    pub fn new(settings: Settings, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            working_dir: working_dir.into(),
        }
    }

    /// The settings in use.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Where the project for `config` is generated.
    pub fn destination_for(&self, config: &Configuration) -> PathBuf {
        self.working_dir.join(config.name())
    }

    /// Generate the project described by `config`.
    pub fn run(
        &self,
        config: &Configuration,
        ui: &mut dyn UserInterface,
    ) -> Result<ScaffoldReport> {
        let name = config.name();
        validate_project_name(name)?;

        let span = tracing::info_span!("scaffold", project = %name);
        let _enter = span.enter();

        let package = self.settings.package.as_str();
        ui.tagged(name, &format!("fetching package info of {}", package));
        let resolver =
            RegistryResolver::with_options(self.settings.registry.clone(), self.settings.metadata_http)?;
        let metadata = resolver.resolve(package)?;
        tracing::info!("Resolved {}", metadata.label(package));

        let tarball = metadata.tarball_url().to_string();
        ui.tagged(name, &format!("downloading {}", tarball));
        let extracted_root = self.download(&tarball, ui)?;
        ui.tagged(
            name,
            &format!("extract to {}", self.settings.staging_dir.display()),
        );

        let template_root = self.template_root(&extracted_root)?;
        let destination = self.destination_for(config);
        tracing::debug!(
            "Copying {} to {}",
            template_root.display(),
            destination.display()
        );

        let copy = TemplateCopier::new().copy(&template_root, &destination, config)?;
        tracing::info!(
            "Wrote {} files ({} templated) into {}",
            copy.files,
            copy.templated_files,
            destination.display()
        );

        Ok(ScaffoldReport {
            package: metadata,
            extracted_root,
            template_root,
            copy,
        })
    }

    fn download(&self, tarball: &str, ui: &mut dyn UserInterface) -> Result<PathBuf> {
        let fetcher = ArtifactFetcher::with_options(self.settings.download_http)?;
        let staging = StagingDir::new(&self.settings.staging_dir);

        let mut spinner = ui.start_spinner("Downloading template...");
        match fetcher.fetch(tarball, &staging) {
            Ok(root) => {
                spinner.finish_success("Template downloaded");
                Ok(root)
            }
            Err(e) => {
                spinner.finish_error("Download failed");
                Err(e)
            }
        }
    }

    fn template_root(&self, extracted_root: &Path) -> Result<PathBuf> {
        let root = if self.settings.template_dir.is_empty() {
            extracted_root.to_path_buf()
        } else {
            extracted_root.join(&self.settings.template_dir)
        };

        if !root.is_dir() {
            return Err(InitError::TemplateNotFound { path: root });
        }
        Ok(root)
    }
}
