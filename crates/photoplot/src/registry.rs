//! D-code assignment in first-reference order.

use std::rc::Rc;

use log::info;

use photoplot_core::{Error, Result, command::DCode};

use crate::{
    aperture::ApertureRef,
    stream::{GenerateContext, Generator, Stream},
};

/// First D-code number handed out by a registry.
pub const DCODE_BASE: u32 = 3000;

/// An aperture together with the D-code it was assigned.
#[derive(Debug, Clone)]
pub struct Registration {
    aperture: ApertureRef,
    dcode: DCode,
}

impl Registration {
    pub fn aperture(&self) -> &ApertureRef {
        &self.aperture
    }

    pub fn dcode(&self) -> DCode {
        self.dcode
    }
}

impl Generator for Registration {
    fn generate<'a>(&'a self, ctx: &mut GenerateContext<'_>, stream: &mut Stream<'a>) -> Result<()> {
        self.aperture.define(self.dcode, ctx, stream)
    }
}

/// Per-layer table of assigned apertures.
///
/// Each distinct [`ApertureRef`] receives the next D-code exactly once, the
/// first time it is registered; later registrations return the same code.
#[derive(Debug, Default)]
pub struct ApertureRegistry {
    entries: Vec<Registration>,
}

impl ApertureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a D-code to `aperture` unless it already has one, and returns it.
    ///
    /// Apertures flashed inside a block aperture are registered first.
    pub fn register(&mut self, aperture: &ApertureRef) -> DCode {
        if let Some(dcode) = self.lookup(aperture) {
            return dcode;
        }

        for nested in aperture.nested_apertures() {
            self.register(nested);
        }

        let dcode = DCode::new(DCODE_BASE + self.entries.len() as u32);
        info!(dcode = dcode.to_string(), aperture = aperture.to_string(); "Assigned aperture");
        self.entries.push(Registration {
            aperture: Rc::clone(aperture),
            dcode,
        });
        dcode
    }

    /// Returns the D-code of `aperture`, if assigned.
    pub fn lookup(&self, aperture: &ApertureRef) -> Option<DCode> {
        self.entries
            .iter()
            .find(|entry| Rc::ptr_eq(&entry.aperture, aperture))
            .map(|entry| entry.dcode)
    }

    /// Returns the D-code of `aperture`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnassignedAperture`] if it was never registered.
    pub fn dcode_of(&self, aperture: &ApertureRef) -> Result<DCode> {
        self.lookup(aperture)
            .ok_or_else(|| Error::UnassignedAperture(aperture.to_string()))
    }

    /// Iterates over registrations in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
