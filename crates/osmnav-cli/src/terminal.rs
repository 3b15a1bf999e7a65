//! Terminal styling and color utilities.
//!
//! ANSI escape codes and capability detection for styled route output.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for route endpoints.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for tree lines and decorations.
    pub const GRAY: &str = "\x1b[90m";
    /// Green for totals.
    pub const GREEN: &str = "\x1b[32m";
    /// Orange (256-color) for the optimised cost.
    pub const ORANGE: &str = "\x1b[38;5;208m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color is
/// disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub orange: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            orange: colors::ORANGE,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            green: "",
            orange: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Check `LANG` / `LC_ALL` for a UTF-8 locale.
#[must_use]
pub fn supports_unicode() -> bool {
    ["LC_ALL", "LANG"].iter().any(|key| {
        std::env::var(key)
            .map(|value| value.to_uppercase().contains("UTF"))
            .unwrap_or(false)
    })
}

/// Format a number with thousand separators (commas).
///
/// ```
/// # use osmnav_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    /// Environment variables are process-global; serialize tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var_os(k))).collect();
        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        let result = f();

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        result
    }

    #[test]
    fn separators() {
        assert_eq!(format_with_separators(0), "0");
        assert_eq!(format_with_separators(999), "999");
        assert_eq!(format_with_separators(1000), "1,000");
        assert_eq!(format_with_separators(123_456), "123,456");
        assert_eq!(
            format_with_separators(u64::MAX),
            "18,446,744,073,709,551,615"
        );
    }

    #[test]
    fn plain_palette_is_empty() {
        let p = ColorPalette::plain();
        assert!(p.reset.is_empty());
        assert!(p.orange.is_empty());
        assert!(!ColorPalette::colored().reset.is_empty());
    }

    #[test]
    fn no_color_disables_colors() {
        with_env_vars(&[("NO_COLOR", Some("1")), ("TERM", None)], || {
            assert!(!supports_color());
        });
    }

    #[test]
    fn dumb_terminal_disables_colors() {
        with_env_vars(&[("NO_COLOR", None), ("TERM", Some("dumb"))], || {
            assert!(!supports_color());
        });
    }

    #[test]
    fn regular_terminal_has_colors() {
        with_env_vars(
            &[("NO_COLOR", None), ("TERM", Some("xterm-256color"))],
            || assert!(supports_color()),
        );
    }

    #[test]
    fn utf8_locale_enables_unicode() {
        with_env_vars(&[("LANG", Some("en_US.UTF-8")), ("LC_ALL", None)], || {
            assert!(supports_unicode());
        });
        with_env_vars(&[("LANG", Some("C")), ("LC_ALL", None)], || {
            assert!(!supports_unicode());
        });
    }
}
