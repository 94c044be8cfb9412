//! Graphic objects and their polarity algebra.
//!
//! A layer draws three kinds of objects:
//!
//! - [`Region`]: a closed contour of [`Segment`]s, filled
//! - [`Flash`]: one aperture stamped at one point
//! - [`Block`]: a flat list of regions and flashes
//!
//! There is no geometric clipping. A clearance is a clear-polarity object drawn
//! after the dark objects it cuts into, and subtraction (`a - b`) is just
//! polarity inversion of `b` followed by an append.

mod block;
mod flash;
mod region;
mod segment;

pub use block::{Appendable, Block, Primitive};
pub use flash::Flash;
pub use region::Region;
pub use segment::Segment;

use photoplot_core::{Result, numeric::CoordinateFormat};

use crate::{
    aperture::ApertureRef,
    stream::{GenerateContext, Generator, Stream},
};

/// A top-level graphic object of a layer.
#[derive(Debug, Clone)]
pub enum Graphic {
    Region(Region),
    Flash(Flash),
    Block(Block),
}

impl Graphic {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Region(_) => "region",
            Self::Flash(_) => "flash",
            Self::Block(_) => "block",
        }
    }

    /// Apertures this graphic flashes, in order.
    pub fn apertures(&self) -> Vec<&ApertureRef> {
        match self {
            Self::Region(_) => Vec::new(),
            Self::Flash(flash) => vec![flash.aperture()],
            Self::Block(block) => block.apertures().collect(),
        }
    }

    /// Checks that every coordinate, including those inside block apertures,
    /// is in `format` and fits its declared width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](photoplot_core::Error::Configuration)
    /// for the first offending coordinate.
    pub fn ensure_in(&self, format: CoordinateFormat) -> Result<()> {
        match self {
            Self::Region(region) => region.ensure_in(format),
            Self::Flash(flash) => flash.ensure_in(format),
            Self::Block(block) => block.ensure_in(format),
        }
    }
}

impl From<Region> for Graphic {
    fn from(region: Region) -> Self {
        Self::Region(region)
    }
}

impl From<Flash> for Graphic {
    fn from(flash: Flash) -> Self {
        Self::Flash(flash)
    }
}

impl From<Block> for Graphic {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

impl Generator for Graphic {
    fn generate<'a>(&'a self, ctx: &mut GenerateContext<'_>, stream: &mut Stream<'a>) -> Result<()> {
        match self {
            Self::Region(region) => region.generate(ctx, stream),
            Self::Flash(flash) => flash.generate(ctx, stream),
            Self::Block(block) => block.generate(ctx, stream),
        }
    }

    fn cleanup(&self, stream: &mut Stream<'_>) {
        match self {
            Self::Region(region) => region.cleanup(stream),
            Self::Flash(flash) => flash.cleanup(stream),
            Self::Block(block) => block.cleanup(stream),
        }
    }
}
