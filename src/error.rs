use std::io;

use thiserror::Error;

/// Errors produced while building bindings and configuration, plus the I/O
/// failures of the terminal playground.
///
/// Input handling itself never fails: absent targets are modelled as empty
/// variants and broken internal invariants are assertions.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown mouse button `{0}`")]
    UnknownButton(String),
    #[error("unknown mouse event `{0}`")]
    UnknownEvent(String),
    #[error("unknown scroll direction `{0}`")]
    UnknownDirection(String),
    #[error("unknown binding context `{0}`")]
    UnknownContext(String),
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
