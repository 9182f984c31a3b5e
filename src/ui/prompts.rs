//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use crate::error::{InitError, Result};

use super::Prompt;

/// Convert dialoguer errors to InitError.
fn map_dialoguer_err(e: dialoguer::Error) -> InitError {
    InitError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Prompt the user for a line of input.
///
/// Empty answers are accepted; a non-empty default is shown and used when
/// the user just presses enter.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<String> {
    let theme = prompt_theme();
    let input = Input::<String>::with_theme(&theme)
        .with_prompt(&prompt.question)
        .allow_empty(true);

    let answer = match prompt.default.as_deref().filter(|d| !d.is_empty()) {
        Some(default) => input
            .default(default.to_string())
            .interact_on(term)
            .map_err(map_dialoguer_err)?,
        None => input.interact_on(term).map_err(map_dialoguer_err)?,
    };

    Ok(answer)
}
