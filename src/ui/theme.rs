//! Visual theme and styling.

use console::Style;

/// Terminal styles used by titan-init.
#[derive(Debug, Clone)]
pub struct TitanTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for the `[project]` tag (blue).
    pub tag: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
}

impl Default for TitanTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl TitanTheme {
    /// Create the default coloured theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            tag: Style::new().blue(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            tag: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a message with a `[tag] ` prefix.
    pub fn format_tagged(&self, tag: &str, msg: &str) -> String {
        format!("{} {}", self.tag.apply_to(format!("[{}]", tag)), msg)
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_success() {
        let msg = TitanTheme::plain().format_success("Complete");
        assert_eq!(msg, "✓ Complete");
    }

    #[test]
    fn theme_formats_warning() {
        let msg = TitanTheme::plain().format_warning("Caution");
        assert!(msg.contains("⚠"));
        assert!(msg.contains("Caution"));
    }

    #[test]
    fn theme_formats_error() {
        let msg = TitanTheme::plain().format_error("Failed");
        assert!(msg.contains("✗"));
        assert!(msg.contains("Failed"));
    }

    #[test]
    fn theme_formats_tagged() {
        let msg = TitanTheme::plain().format_tagged("myapp", "downloading");
        assert_eq!(msg, "[myapp] downloading");
    }

    #[test]
    fn default_impl_matches_new() {
        let default = TitanTheme::default();
        let new = TitanTheme::new();
        assert_eq!(default.format_success("test"), new.format_success("test"));
    }
}
