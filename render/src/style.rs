//! ANSI styling gated on terminal detection.

use std::io::IsTerminal;

use console::Style;

/// When to emit ANSI escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Style only when stdout is a terminal (the default).
    #[default]
    Auto,
    /// Always style, even when piped.
    Always,
    /// Never style.
    Never,
}

/// Determines whether styling should be used for the given mode.
pub fn is_enabled(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

/// Styler that can be passed around to formatting functions.
///
/// # Examples
///
/// ```
/// use cmdtree_render::{ColorMode, Styler};
///
/// let plain = Styler::new(ColorMode::Never);
/// assert_eq!(plain.heading("Options:"), "Options:");
///
/// let styled = Styler::new(ColorMode::Always);
/// assert!(styled.heading("Options:").contains("\x1b["));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Styler {
    enabled: bool,
}

impl Styler {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            enabled: is_enabled(mode),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Section headings - bold
    pub fn heading(&self, s: &str) -> String {
        self.wrap(s, Style::new().bold())
    }

    /// Flag, command, and argument terms - cyan
    pub fn term(&self, s: &str) -> String {
        self.wrap(s, Style::new().cyan())
    }

    /// Secondary annotations (defaults, env vars, hints) - dim
    pub fn dim(&self, s: &str) -> String {
        self.wrap(s, Style::new().dim())
    }

    /// Diagnostic prefixes - red
    pub fn error(&self, s: &str) -> String {
        self.wrap(s, Style::new().red())
    }

    fn wrap(&self, s: &str, style: Style) -> String {
        if self.enabled {
            style.force_styling(true).apply_to(s).to_string()
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styler_disabled_passes_through() {
        let styler = Styler { enabled: false };
        assert_eq!(styler.heading("Usage:"), "Usage:");
        assert_eq!(styler.term("--verbose"), "--verbose");
        assert_eq!(styler.dim("[default: 4]"), "[default: 4]");
        assert_eq!(styler.error("error:"), "error:");
    }

    #[test]
    fn test_styler_enabled_emits_ansi() {
        let styler = Styler { enabled: true };
        let heading = styler.heading("Usage:");
        assert!(heading.starts_with("\x1b["));
        assert!(heading.contains("Usage:"));
        assert!(heading.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_color_mode_fixed_variants() {
        assert!(is_enabled(ColorMode::Always));
        assert!(!is_enabled(ColorMode::Never));
        // Auto depends on the terminal, not asserted here
    }
}
