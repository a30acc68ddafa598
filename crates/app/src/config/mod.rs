//! Application configuration

use clap::Args;

pub mod fixtures;
pub mod logging;

pub use fixtures::FixturesConfig;
pub use logging::{LogFormat, LoggingConfig};

/// Settings shared by every CLI command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Fixture data settings.
    #[command(flatten)]
    pub fixtures: FixturesConfig,
}
