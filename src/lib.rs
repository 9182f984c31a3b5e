//! titan-init - Generate projects from registry boilerplate packages.
//!
//! titan-init asks for a project name, description and author, downloads a
//! boilerplate package's tarball from an npm-compatible registry, and copies
//! its template directory into a new project directory with `{{ key }}`
//! placeholders filled in.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Project answers and layered tool settings
//! - [`error`] - Error types and result aliases
//! - [`fetch`] - Tarball download and safe extraction
//! - [`registry`] - Registry mirrors and package resolution
//! - [`scaffold`] - The end-to-end generation pipeline
//! - [`template`] - Placeholder substitution and tree copying
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use titan_init::config::Configuration;
//! use titan_init::template::substitute;
//!
//! let scope = Configuration::new("myapp", "An app", "titan");
//! let out = substitute(r#"{"name": "{{ name }}", "tpl": "\{{ name }}"}"#, &scope);
//! assert_eq!(out, r#"{"name": "myapp", "tpl": "{{ name }}"}"#);
//! ```
//!
//! For the full pipeline against a registry, see the integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod registry;
pub mod scaffold;
pub mod template;
pub mod ui;

pub use error::{InitError, Result};
