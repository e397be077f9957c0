use thiserror::Error;

use crate::config::ConfigError;
use crate::types::ShapeHandle;

/// Errors surfaced by the mover.
#[derive(Error, Debug)]
pub enum MoveError {
    /// Only raised under `OverflowPolicy::Error`.
    #[error("shape {shape:?} reported {found} contacts, buffer holds {capacity}")]
    ContactOverflow { shape: ShapeHandle, found: usize, capacity: usize },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
