use log::warn;

use photoplot_core::{
    Error, Result,
    command::CommandSink,
    numeric::{CoordinateFormat, Vector},
    types::{InterpMode, QuadrantMode},
};

use crate::engine::StateEngine;

/// One edge of a region contour: a line or a circular arc.
///
/// Segments are immutable values. An arc whose start and end coincide is a full
/// circle and is always drawn in multi-quadrant mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    start: Vector,
    end: Vector,
    interpolation: InterpMode,
    quadrant: QuadrantMode,
    center: Option<Vector>,
}

impl Segment {
    /// Straight edge from `start` to `end`.
    pub fn line(start: Vector, end: Vector) -> Self {
        Self {
            start,
            end,
            interpolation: InterpMode::Linear,
            quadrant: QuadrantMode::Auto,
            center: None,
        }
    }

    /// Circular edge around the absolute point `center`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMode`] if `direction` is not an arc mode.
    pub fn arc(start: Vector, end: Vector, center: Vector, direction: InterpMode) -> Result<Self> {
        if !direction.is_arc() {
            return Err(Error::invalid_mode("arc direction", direction.to_string()));
        }

        Ok(Self {
            start,
            end,
            interpolation: direction,
            quadrant: QuadrantMode::Auto,
            center: Some(center),
        })
    }

    /// Full circle through `start` around `center`, drawn counterclockwise.
    pub(super) fn full_circle(start: Vector, center: Vector) -> Self {
        Self {
            start,
            end: start,
            interpolation: InterpMode::CounterClockwise,
            quadrant: QuadrantMode::Multi,
            center: Some(center),
        }
    }

    /// Requests a quadrant mode for this segment.
    ///
    /// A full-circle arc keeps multi-quadrant mode: single-quadrant offsets
    /// cannot describe it.
    pub fn with_quadrant(mut self, mode: QuadrantMode) -> Self {
        if self.is_full_circle() && mode == QuadrantMode::Single {
            warn!(start:% = self.start; "Full-circle arc cannot be single-quadrant, using multi-quadrant");
            self.quadrant = QuadrantMode::Multi;
        } else {
            self.quadrant = mode;
        }
        self
    }

    pub fn start(&self) -> Vector {
        self.start
    }

    pub fn end(&self) -> Vector {
        self.end
    }

    pub fn interpolation(&self) -> InterpMode {
        self.interpolation
    }

    pub fn quadrant(&self) -> QuadrantMode {
        self.quadrant
    }

    pub fn center(&self) -> Option<Vector> {
        self.center
    }

    /// Returns `true` for an arc that starts and ends at the same point.
    pub fn is_full_circle(&self) -> bool {
        self.interpolation.is_arc() && self.start == self.end
    }

    /// Checks every point of this segment against `format`.
    pub(crate) fn ensure_in(&self, format: CoordinateFormat) -> Result<()> {
        self.start.ensure_in(format)?;
        self.end.ensure_in(format)?;
        match self.center {
            Some(center) => center.ensure_in(format),
            None => Ok(()),
        }
    }

    /// Drives `engine` through this segment: mode, quadrant, move to start, draw to end.
    pub(crate) fn generate<S: CommandSink + ?Sized>(&self, engine: &mut StateEngine, out: &mut S) -> Result<()> {
        engine.set_interpolation(out, self.interpolation, self.center);
        engine.set_quadrant(out, self.quadrant)?;
        engine.move_to(out, self.start);
        engine.interpolate(out, self.end)
    }
}
