//! Gathering project answers from the user.

use crate::error::Result;
use crate::ui::{Prompt, UserInterface};

use super::answers::{
    Configuration, AUTHOR_KEY, DEFAULT_PROJECT_NAME, DESCRIPTION_KEY, NAME_KEY,
};

/// Answers supplied up front, typically from command-line flags.
///
/// A field that is `Some` is used as-is and its prompt is not shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}

/// The questions asked, in order.
pub fn standard_prompts() -> Vec<Prompt> {
    vec![
        Prompt::new(NAME_KEY, "Project name:").with_default(DEFAULT_PROJECT_NAME),
        Prompt::new(DESCRIPTION_KEY, "Project description:").with_default(""),
        Prompt::new(AUTHOR_KEY, "Author:").with_default(""),
    ]
}

/// Collect the project answers, prompting for anything not prefilled.
///
/// A blank name falls back to [`DEFAULT_PROJECT_NAME`].
pub fn collect_configuration(
    ui: &mut dyn UserInterface,
    prefill: &Prefill,
) -> Result<Configuration> {
    let mut answers: Vec<(String, String)> = Vec::with_capacity(3);

    for prompt in standard_prompts() {
        let given = match prompt.key.as_str() {
            NAME_KEY => prefill.name.as_ref(),
            DESCRIPTION_KEY => prefill.description.as_ref(),
            AUTHOR_KEY => prefill.author.as_ref(),
            _ => None,
        };

        let value = match given {
            Some(value) => value.clone(),
            None => ui.prompt(&prompt)?,
        };
        tracing::debug!("Answer for '{}': {:?}", prompt.key, value);
        answers.push((prompt.key, value));
    }

    Ok(Configuration::from_entries(answers))
}
