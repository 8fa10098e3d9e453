//! Startup errors for the lantern host.

use lantern_core::{ConfigError, Error};

/// Failures that prevent the host from booting the agent.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    /// Storage or transport could not be initialised.
    #[error("startup: {0}")]
    Startup(#[from] Error),
}
