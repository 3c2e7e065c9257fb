//! # Console Reporting
//!
//! Operator-facing progress lines ("Cloning ...", "Downloading ...") are
//! printed through a [`Reporter`], which knows whether output is wanted at
//! all (`--quiet`) and whether it may be colored.
//!
//! ## Respecting User Preferences
//!
//! Color is controlled by:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;
use std::fmt::Display;

use console::style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `always` forces colors on (overriding `NO_COLOR`), `never` forces
    /// them off, anything else detects support from the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Prints progress lines for a sync run
#[derive(Debug, Clone)]
pub struct Reporter {
    config: OutputConfig,
    quiet: bool,
}

impl Reporter {
    pub fn new(config: OutputConfig, quiet: bool) -> Self {
        Self { config, quiet }
    }

    /// A reporter that prints nothing.
    pub fn silent() -> Self {
        Self::new(OutputConfig::without_color(), true)
    }

    /// Whether interactive progress bars should be drawn.
    pub fn show_progress(&self) -> bool {
        !self.quiet && console::Term::stdout().is_term()
    }

    /// Print a step line: a right-aligned verb followed by its subject.
    pub fn step(&self, label: &str, message: impl Display) {
        if !self.quiet {
            println!("{}", self.format_step(label, &message));
        }
    }

    /// Print a plain line.
    pub fn line(&self, message: impl Display) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    fn format_step(&self, label: &str, message: &dyn Display) -> String {
        let padded = format!("{:>12}", label);
        if self.config.use_color {
            format!("{} {}", style(padded).green().bold(), message)
        } else {
            format!("{} {}", padded, message)
        }
    }
}
