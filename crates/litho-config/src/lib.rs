//! Configuration for the LithoLicht preview.
//!
//! Settings persist to disk as RON files, accept CLI overrides via clap,
//! and deserialize forward/backward compatibly so old config files keep
//! working across releases.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, LightConfig, PreviewConfig, WindowConfig,
    default_config_dir,
};
pub use error::ConfigError;
