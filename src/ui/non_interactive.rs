//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{InitError, Result};

use super::{OutputMode, Prompt, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts.
pub const PROMPT_ENV_PREFIX: &str = "TITAN_INIT_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `TITAN_INIT_PROMPT_<KEY>` environment
/// variables, falling back to the prompt's default.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn tagged(&mut self, tag: &str, msg: &str) {
        if self.mode.shows_status() {
            println!("[{}] {}", tag, msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<String> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        if let Some(value) = self.env_overrides.get(&env_key) {
            return Ok(value.clone());
        }

        if let Some(default) = &prompt.default {
            return Ok(default.clone());
        }

        Err(InitError::ConfigValidationError {
            message: format!(
                "Cannot prompt for '{}' in non-interactive mode (no default value)",
                prompt.key
            ),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        println!("  {}", message);
        Box::new(NoopSpinner)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints its final line only.
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn finish_success(&mut self, msg: &str) {
        println!("  ✓ {}", msg);
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }
}
