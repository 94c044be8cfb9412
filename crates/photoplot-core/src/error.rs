//! Error types for command synthesis.
//!
//! Every variant of [`Error`] is a usage error detected at the point of
//! misuse. None of them is recovered locally: they propagate to the caller of
//! the top-level generation call and abort that layer's output.

use thiserror::Error;

/// Errors raised while building or rendering a command stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two values built under different coordinate formats were combined, or a
    /// coordinate format itself is out of range.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An aperture was referenced for output before it received a D-code.
    #[error("aperture {0} has no assigned D-code")]
    UnassignedAperture(String),

    /// An interpolation, quadrant, polarity, unit or mirror name was not
    /// recognized.
    #[error("invalid {kind} mode `{value}`")]
    InvalidMode { kind: &'static str, value: String },

    /// An object was appended to a container that does not accept it.
    #[error("unsupported object `{object}` for {container}")]
    UnsupportedObject {
        object: &'static str,
        container: &'static str,
    },

    /// An attribute was appended to a set that does not recognize its name.
    #[error("unknown attribute `{name}` for {container} attributes")]
    UnknownAttribute {
        name: String,
        container: &'static str,
    },

    /// An operation needed a piece of graphics state that was never set.
    #[error("graphics state is missing {0}")]
    MissingState(&'static str),
}

impl Error {
    /// Creates an [`Error::InvalidMode`] for the given mode kind.
    pub fn invalid_mode(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidMode {
            kind,
            value: value.into(),
        }
    }
}

/// Result alias used throughout the command model.
pub type Result<T> = std::result::Result<T, Error>;
