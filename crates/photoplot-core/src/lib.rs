//! Photoplot Core Types and Definitions
//!
//! This crate provides the foundational types of the photoplot command
//! pipeline. It includes:
//!
//! - **Numeric**: Fixed-point coordinates ([`numeric::Scalar`], [`numeric::Vector`])
//! - **Types**: Units, interpolation and quadrant modes, polarity ([`types`] module)
//! - **Commands**: Renderable command records ([`command::Command`])
//! - **Attributes**: Opaque file/aperture/object metadata ([`attribute`] module)
//! - **Errors**: The usage-error taxonomy ([`Error`])

pub mod attribute;
pub mod command;
pub mod numeric;
pub mod types;

mod error;

pub use error::{Error, Result};
