//! Project answers and tool settings.
//!
//! - [`answers`] - the [`Configuration`] handed to the template engine
//! - [`collect`] - prompting for those answers
//! - [`settings`] - layered YAML settings for registry, package and paths
//!
//! # Example
//!
//! ```
//! use titan_init::config::Configuration;
//!
//! let config = Configuration::new("", "An app", "titan");
//! assert_eq!(config.name(), "demo");
//! assert_eq!(config.get("author"), Some("titan"));
//! ```

pub mod answers;
pub mod collect;
pub mod settings;

pub use answers::{
    validate_project_name, Configuration, AUTHOR_KEY, DEFAULT_PROJECT_NAME, DESCRIPTION_KEY,
    NAME_KEY,
};
pub use collect::{collect_configuration, standard_prompts, Prefill};
pub use settings::{
    Settings, SettingsFile, SettingsPaths, DEFAULT_PACKAGE, DEFAULT_TEMPLATE_DIR,
    PROJECT_SETTINGS_FILE,
};
