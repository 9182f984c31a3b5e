//! New command implementation.
//!
//! The `titan-init new` command asks for the project answers and generates
//! the project directory from the configured boilerplate package.

use std::path::{Path, PathBuf};

use crate::cli::args::NewArgs;
use crate::config::{collect_configuration, Settings};
use crate::error::Result;
use crate::scaffold::{ScaffoldReport, Scaffolder};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The new command implementation.
pub struct NewCommand {
    working_dir: PathBuf,
    config_path: Option<PathBuf>,
    args: NewArgs,
}

impl NewCommand {
    /// Create a new `new` command.
    pub fn new(working_dir: &Path, config_path: Option<&Path>, args: NewArgs) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &NewArgs {
        &self.args
    }

    fn report(&self, report: &ScaffoldReport, package: &str, ui: &mut dyn UserInterface) {
        let copy = &report.copy;
        for skipped in &copy.skipped {
            ui.warning(&format!("Skipped {}", skipped.display()));
        }
        if ui.output_mode().shows_details() {
            ui.message(&format!(
                "  {} directories, {} files ({} with placeholders)",
                copy.directories, copy.files, copy.templated_files
            ));
            if !copy.unresolved.is_empty() {
                let keys: Vec<&str> = copy.unresolved.iter().map(String::as_str).collect();
                ui.message(&format!("  left as written: {}", keys.join(", ")));
            }
        }
        ui.success(&format!(
            "Created {} from {}",
            copy.destination.display(),
            report.package.label(package)
        ));
    }
}

impl Command for NewCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = Settings::load(
            &self.working_dir,
            self.config_path.as_deref(),
            self.args.settings_overrides(),
        )?;
        tracing::debug!("Resolved settings: {:?}", settings);

        let config = collect_configuration(ui, &self.args.prefill())?;
        let name = config.name().to_string();

        let scaffolder = Scaffolder::new(settings, &self.working_dir);
        match scaffolder.run(&config, ui) {
            Ok(report) => {
                self.report(&report, &scaffolder.settings().package, ui);
                Ok(CommandResult::success())
            }
            Err(e) => {
                tracing::error!(project = %name, "{}", e);
                ui.error(&format!("[{}] {}", name, e));
                Ok(CommandResult::failure(1))
            }
        }
    }
}
