//! Graphics state tracking with minimal command emission.
//!
//! [`StateEngine`] owns one [`GraphicsState`] and exposes one operation per
//! state axis. Every operation is a guarded write: a command is emitted only
//! when the requested value differs from the tracked one, so the number of
//! mode, aperture and polarity commands equals the number of actual changes.
//!
//! The axes are independent. Changing polarity does not touch the tracked
//! position, selecting an aperture does not touch interpolation, and so on.
//!
//! # Example
//!
//! ```
//! # use photoplot::engine::StateEngine;
//! # use photoplot_core::command::Command;
//! # use photoplot_core::types::Polarity;
//! let mut engine = StateEngine::new();
//! let mut out: Vec<Command> = Vec::new();
//!
//! engine.set_polarity(&mut out, Polarity::Dark);
//! engine.set_polarity(&mut out, Polarity::Dark);
//! assert_eq!(out.len(), 1);
//! ```

use log::{debug, trace};

use photoplot_core::{
    Error, Result,
    command::{Command, CommandSink, DCode},
    numeric::Vector,
    types::{InterpMode, Polarity, QuadrantMode},
};

/// Current plotting state. Every axis starts unset.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GraphicsState {
    position: Option<Vector>,
    center: Option<Vector>,
    interpolation: Option<InterpMode>,
    quadrant: Option<QuadrantMode>,
    polarity: Option<Polarity>,
    aperture: Option<DCode>,
}

impl GraphicsState {
    /// Current point.
    pub fn position(&self) -> Option<Vector> {
        self.position
    }

    /// Absolute arc center used by the next arc interpolation.
    pub fn center(&self) -> Option<Vector> {
        self.center
    }

    /// Current interpolation mode.
    pub fn interpolation(&self) -> Option<InterpMode> {
        self.interpolation
    }

    /// Current resolved quadrant mode; `None` when unset or not applicable.
    pub fn quadrant(&self) -> Option<QuadrantMode> {
        self.quadrant
    }

    /// Current polarity.
    pub fn polarity(&self) -> Option<Polarity> {
        self.polarity
    }

    /// Currently selected aperture.
    pub fn aperture(&self) -> Option<DCode> {
        self.aperture
    }

    fn is_arc(&self) -> bool {
        self.interpolation.is_some_and(InterpMode::is_arc)
    }
}

/// Emits only the commands needed to move the tracked state to a requested one.
#[derive(Debug, Default)]
pub struct StateEngine {
    state: GraphicsState,
}

impl StateEngine {
    /// Creates an engine with all axes unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tracked state.
    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    /// Forgets every axis, so the next request on each axis is emitted.
    pub fn reset(&mut self) {
        trace!("Resetting graphics state");
        self.state = GraphicsState::default();
    }

    /// Moves to `target` without drawing, unless already there.
    pub fn move_to<S: CommandSink + ?Sized>(&mut self, out: &mut S, target: Vector) {
        if self.state.position != Some(target) {
            out.push_command(Command::Move { target });
            self.state.position = Some(target);
        }
    }

    /// Draws from the current point to `target` in the current interpolation mode.
    ///
    /// Arc modes carry the offset from the current point to the tracked center,
    /// `center - current`. In single-quadrant mode the offset is unsigned.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingState`] if an arc is requested without a tracked
    ///   position or center.
    /// - [`Error::Configuration`] if the center and position use different
    ///   coordinate formats, or the offset needs more integer digits than the
    ///   format declares.
    pub fn interpolate<S: CommandSink + ?Sized>(&mut self, out: &mut S, target: Vector) -> Result<()> {
        let offset = if self.state.is_arc() {
            let center = self.state.center.ok_or(Error::MissingState("arc center"))?;
            let current = self
                .state
                .position
                .ok_or(Error::MissingState("current position"))?;

            let offset = center.checked_sub(current)?;
            offset.ensure_in(offset.format())?;
            if self.state.quadrant == Some(QuadrantMode::Single) {
                Some(offset.abs())
            } else {
                Some(offset)
            }
        } else {
            None
        };

        out.push_command(Command::Interpolate { target, offset });
        self.state.position = Some(target);
        Ok(())
    }

    /// Flashes `aperture` at `target`, selecting it first if it is not current.
    ///
    /// Flashing does not change the tracked position.
    pub fn flash<S: CommandSink + ?Sized>(&mut self, out: &mut S, aperture: DCode, target: Vector) {
        if self.state.aperture != Some(aperture) {
            debug!(dcode:% = aperture; "Selecting aperture");
            out.push_command(Command::SelectAperture(aperture));
            self.state.aperture = Some(aperture);
        }

        out.push_command(Command::Flash { target });
    }

    /// Sets the interpolation mode, and the arc center when one is given.
    ///
    /// The center is updated unconditionally; the mode command is emitted only
    /// on an actual change.
    pub fn set_interpolation<S: CommandSink + ?Sized>(
        &mut self,
        out: &mut S,
        mode: InterpMode,
        center: Option<Vector>,
    ) {
        if let Some(center) = center {
            self.state.center = Some(center);
        }

        if self.state.interpolation != Some(mode) {
            debug!(mode:% = mode; "Setting interpolation");
            out.push_command(Command::SetInterpolation(mode));
            self.state.interpolation = Some(mode);
        }
    }

    /// Sets the quadrant mode.
    ///
    /// [`QuadrantMode::Auto`] resolves to multi-quadrant in an arc mode and to
    /// "not applicable" otherwise, which clears the tracked mode without
    /// emitting anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMode`] if the resolved mode cannot be emitted.
    pub fn set_quadrant<S: CommandSink + ?Sized>(&mut self, out: &mut S, mode: QuadrantMode) -> Result<()> {
        let resolved = match mode {
            QuadrantMode::Auto if self.state.is_arc() => Some(QuadrantMode::Multi),
            QuadrantMode::Auto => None,
            explicit => Some(explicit),
        };

        let Some(resolved) = resolved else {
            self.state.quadrant = None;
            return Ok(());
        };

        if self.state.quadrant != Some(resolved) {
            debug!(mode:% = resolved; "Setting quadrant mode");
            out.push_command(Command::select_quadrant(resolved)?);
            self.state.quadrant = Some(resolved);
        }
        Ok(())
    }

    /// Sets the polarity of subsequent objects.
    pub fn set_polarity<S: CommandSink + ?Sized>(&mut self, out: &mut S, polarity: Polarity) {
        if self.state.polarity != Some(polarity) {
            debug!(polarity:% = polarity; "Setting polarity");
            out.push_command(Command::LoadPolarity(polarity));
            self.state.polarity = Some(polarity);
        }
    }
}
