//! Command-line argument parsing for the preview binary.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// LithoLicht preview command-line arguments.
///
/// CLI values override settings loaded from `config.ron`; the image,
/// product, and size selections are startup state, not config, and are
/// consumed by the application directly.
#[derive(Parser, Debug)]
#[command(name = "litho", about = "LithoLicht panel preview")]
pub struct CliArgs {
    /// Image file to load at startup.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Product geometry to preview (flat, curved, cylinder, sphere).
    #[arg(long)]
    pub product: Option<String>,

    /// Size label to preselect (e.g. "15cm").
    #[arg(long)]
    pub size: Option<String>,

    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            image: None,
            product: None,
            size: None,
            width: None,
            height: None,
            log_level: None,
            config: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            log_level: Some("debug".to_string()),
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 768);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&empty_args());
        assert_eq!(config, original);
    }

    #[test]
    fn test_selection_args_do_not_touch_config() {
        let original = Config::default();
        let mut config = Config::default();
        let args = CliArgs {
            image: Some(PathBuf::from("photo.png")),
            product: Some("sphere".to_string()),
            size: Some("20cm".to_string()),
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config, original);
    }
}
