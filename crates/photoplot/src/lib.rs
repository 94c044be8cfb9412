//! Photoplot - minimal-state command synthesis for photoplot (Gerber) layers.
//!
//! Client code builds apertures and graphic objects, appends them to a
//! [`Layer`], and renders it. The renderer tracks the plotting state so every
//! mode, aperture and polarity command is emitted only when the value actually
//! changes, and finishes each file with an `.MD5` checksum of its own content.
//!
//! # Examples
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use photoplot::{
//!     LayerBuilder,
//!     aperture::Aperture,
//!     graphic::{Flash, Region},
//!     layer::{LayerKind, Side},
//! };
//!
//! let mut layer = LayerBuilder::new(LayerKind::Copper {
//!     index: 1,
//!     side: Side::Top,
//!     layer_type: None,
//! })
//! .build()
//! .expect("default configuration is valid");
//!
//! let f = layer.format();
//! let pad = Aperture::circle(0.05).into_ref();
//!
//! let outline = Region::from_points([
//!     f.vector(0.0, 0.0),
//!     f.vector(1.0, 0.0),
//!     f.vector(1.0, 1.0),
//!     f.vector(0.0, 1.0),
//! ]);
//! let keepout = Region::circle(f.vector(0.5, 0.5), 0.2);
//!
//! layer.append(outline - keepout).unwrap();
//! layer.append(Flash::new(Rc::clone(&pad), f.vector(0.5, 0.5))).unwrap();
//!
//! let text = layer.render().expect("layer renders");
//! assert!(text.starts_with("%FSLAX26Y26*%\n%MOIN*%\n"));
//! ```

pub mod aperture;
pub mod config;
pub mod engine;
pub mod graphic;
pub mod layer;
pub mod registry;
pub mod stream;

mod error;

pub use photoplot_core::{Error as GraphicsError, attribute, command, numeric, types};

pub use error::PhotoplotError;
pub use layer::{Layer, LayerBuilder};
