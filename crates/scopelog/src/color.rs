//! crates/scopelog/src/color.rs
//! Symbolic colour names and their ANSI escape sequences.

use std::sync::OnceLock;

use is_terminal::IsTerminal;
use regex::{Captures, Regex};

/// Looks up the escape sequence for a symbolic colour name.
///
/// Unknown names yield an empty string; colour is cosmetic and never an
/// error.
///
/// ```
/// use scopelog::color_code;
///
/// assert_eq!(color_code("red"), "\x1b[31m");
/// assert_eq!(color_code("bgBlue"), "\x1b[44m");
/// assert_eq!(color_code("chartreuse"), "");
/// ```
#[must_use]
pub fn color_code(name: &str) -> &'static str {
    match name {
        "reset" => "\x1b[0m",
        "bright" => "\x1b[1m",
        "dim" => "\x1b[2m",
        "underscore" => "\x1b[4m",
        "blink" => "\x1b[5m",
        "reverse" => "\x1b[7m",
        "hidden" => "\x1b[8m",

        "black" => "\x1b[30m",
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",

        "bgBlack" => "\x1b[40m",
        "bgRed" => "\x1b[41m",
        "bgGreen" => "\x1b[42m",
        "bgYellow" => "\x1b[43m",
        "bgBlue" => "\x1b[44m",
        "bgMagenta" => "\x1b[45m",
        "bgCyan" => "\x1b[46m",
        "bgWhite" => "\x1b[47m",
        _ => "",
    }
}

/// Whether escape sequences should be rendered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorMode {
    /// Always emit escape sequences.
    #[default]
    Always,
    /// Never emit escape sequences.
    Never,
    /// Emit escape sequences only when stdout is a terminal.
    Auto,
}

impl ColorMode {
    /// Collapses the mode into a yes/no decision for the current process.
    #[must_use]
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// Colour table bound to a rendering decision.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// Palette that renders escape sequences.
    #[must_use]
    pub const fn colored() -> Self {
        Self { enabled: true }
    }

    /// Palette that renders every colour as an empty string.
    #[must_use]
    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    /// Resolves `mode` once and builds the matching palette.
    #[must_use]
    pub fn from_mode(mode: ColorMode) -> Self {
        Self {
            enabled: mode.enabled(),
        }
    }

    /// Whether escape sequences are rendered.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.enabled
    }

    /// Escape sequence for `name`, or `""` when disabled or unknown.
    #[must_use]
    pub fn code(self, name: &str) -> &'static str {
        if self.enabled { color_code(name) } else { "" }
    }

    /// Replaces every `color(<name>)` marker in `text` with its code.
    ///
    /// ```
    /// use scopelog::Palette;
    ///
    /// let resolved = Palette::colored().resolve_colors("color(red)Error!color(reset) done");
    /// assert_eq!(resolved, "\x1b[31mError!\x1b[0m done");
    ///
    /// let plain = Palette::plain().resolve_colors("color(red)Error!color(reset)");
    /// assert_eq!(plain, "Error!");
    /// ```
    #[must_use]
    pub fn resolve_colors(self, text: &str) -> String {
        color_marker()
            .replace_all(text, |caps: &Captures<'_>| self.code(&caps[1]))
            .into_owned()
    }
}

/// Matches `color(<name>)` where the name is one or more ASCII word
/// characters.
fn color_marker() -> &'static Regex {
    static COLOR_MARKER_RE: OnceLock<Regex> = OnceLock::new();
    COLOR_MARKER_RE
        .get_or_init(|| Regex::new(r"color\(([A-Za-z0-9_]+)\)").expect("valid regex"))
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_mode(ColorMode::default())
    }
}

/// Resolves `color(<name>)` markers with the default palette.
#[must_use]
pub fn resolve_colors(text: &str) -> String {
    Palette::default().resolve_colors(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_and_foreground_codes() {
        assert_eq!(color_code("reset"), "\x1b[0m");
        assert_eq!(color_code("dim"), "\x1b[2m");
        assert_eq!(color_code("cyan"), "\x1b[36m");
        assert_eq!(color_code("bgWhite"), "\x1b[47m");
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(color_code("Red"), "");
        assert_eq!(color_code("bgblue"), "");
    }

    #[test]
    fn plain_palette_is_empty_for_known_names() {
        assert_eq!(Palette::plain().code("red"), "");
        assert!(!Palette::from_mode(ColorMode::Never).is_enabled());
        assert!(Palette::from_mode(ColorMode::Always).is_enabled());
    }

    #[test]
    fn resolve_replaces_every_marker() {
        let resolved = resolve_colors("color(red)Error!!!!color(reset)color(blue)not");
        assert_eq!(resolved, "\x1b[31mError!!!!\x1b[0m\x1b[34mnot");
    }

    #[test]
    fn resolve_drops_unknown_names_and_keeps_malformed_markers() {
        let palette = Palette::colored();
        assert_eq!(palette.resolve_colors("a color(mauve)b"), "a b");
        assert_eq!(palette.resolve_colors("color( red)x"), "color( red)x");
        assert_eq!(palette.resolve_colors("color(red"), "color(red");
        assert_eq!(palette.resolve_colors("no markers"), "no markers");
    }

    #[test]
    fn resolve_handles_adjacent_and_nested_markers() {
        let palette = Palette::colored();
        assert_eq!(palette.resolve_colors("color(color(red))"), "color(\x1b[31m)");
        assert_eq!(palette.resolve_colors("color(dim)color(dim)"), "\x1b[2m\x1b[2m");
        assert_eq!(palette.resolve_colors("color(é)x"), "color(é)x");
    }
}
