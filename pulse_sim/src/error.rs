//! Error types for the simulation harness.

use pulse_core::{AdminError, StoreError};
use pulse_env::EnvError;
use thiserror::Error;

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Admin error: {0}")]
    Admin(#[from] AdminError),

    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
