//! Info command implementation.
//!
//! The `titan-init info` command shows what the registry publishes as the
//! latest version of a package, without downloading it.

use std::path::{Path, PathBuf};

use crate::cli::args::InfoArgs;
use crate::config::Settings;
use crate::error::{InitError, Result};
use crate::registry::{PackageMetadata, RegistryResolver};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The info command implementation.
pub struct InfoCommand {
    working_dir: PathBuf,
    config_path: Option<PathBuf>,
    args: InfoArgs,
}

impl InfoCommand {
    /// Create a new info command.
    pub fn new(working_dir: &Path, config_path: Option<&Path>, args: InfoArgs) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &InfoArgs {
        &self.args
    }
}

impl Command for InfoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = Settings::load(
            &self.working_dir,
            self.config_path.as_deref(),
            self.args.settings_overrides(),
        )?;

        let resolver = RegistryResolver::with_options(settings.registry.clone(), settings.metadata_http)?;
        let metadata = match resolver.resolve(&settings.package) {
            Ok(metadata) => metadata,
            Err(e) => {
                ui.error(&format!("[{}] {}", settings.package, e));
                return Ok(CommandResult::failure(1));
            }
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&metadata)
                .map_err(|e| InitError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        for line in describe(&metadata, &settings.package, resolver.source().base_url()) {
            ui.message(&line);
        }
        Ok(CommandResult::success())
    }
}

/// Human-readable lines describing a package.
fn describe(metadata: &PackageMetadata, requested: &str, registry: &str) -> Vec<String> {
    let mut lines = vec![metadata.label(requested)];
    if let Some(description) = metadata.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("  {}", description));
    }
    lines.push(format!("  registry: {}", registry));
    lines.push(format!("  tarball:  {}", metadata.tarball_url()));
    if let Some(integrity) = &metadata.dist.integrity {
        lines.push(format!("  integrity: {}", integrity));
    } else if let Some(shasum) = &metadata.dist.shasum {
        lines.push(format!("  shasum:   {}", shasum));
    }
    lines
}
