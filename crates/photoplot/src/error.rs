//! Error types for photoplot operations.
//!
//! This module provides the main error type [`PhotoplotError`], which wraps
//! usage errors raised while generating a layer and I/O failures raised while
//! writing it.

use std::io;

use thiserror::Error;

/// The main error type for photoplot operations.
#[derive(Debug, Error)]
pub enum PhotoplotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Graphics error: {0}")]
    Graphics(#[from] photoplot_core::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
