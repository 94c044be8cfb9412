use log::trace;

use photoplot_core::{
    Error, Result,
    attribute::{Attribute, AttributeKind, AttributeSet},
    numeric::{CoordinateFormat, Vector},
    types::Polarity,
};

use crate::{
    aperture::ApertureRef,
    stream::{GenerateContext, Generator, Stream},
};

/// One aperture stamped at one point.
#[derive(Debug, Clone)]
pub struct Flash {
    aperture: ApertureRef,
    target: Vector,
    polarity: Polarity,
    object_attributes: AttributeSet,
}

impl Flash {
    /// Creates a dark flash of `aperture` at `target`.
    pub fn new(aperture: ApertureRef, target: Vector) -> Self {
        Self {
            aperture,
            target,
            polarity: Polarity::Dark,
            object_attributes: AttributeSet::new(AttributeKind::Object),
        }
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Returns a copy with the opposite polarity, sharing the aperture.
    pub fn invert(&self) -> Self {
        Self {
            polarity: self.polarity.invert(),
            ..self.clone()
        }
    }

    /// Adds an object attribute.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedObject`] for file and aperture attributes; the
    ///   latter belong on the [`Aperture`](crate::aperture::Aperture).
    /// - [`Error::UnknownAttribute`] for unrecognized names.
    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<()> {
        match attribute.kind() {
            AttributeKind::Object => self.object_attributes.insert(attribute),
            AttributeKind::File => Err(Error::UnsupportedObject {
                object: "file attribute",
                container: "flash",
            }),
            AttributeKind::Aperture => Err(Error::UnsupportedObject {
                object: "aperture attribute",
                container: "flash",
            }),
        }
    }

    /// Checks the target, and the flashes of a block aperture, against `format`.
    pub(crate) fn ensure_in(&self, format: CoordinateFormat) -> Result<()> {
        self.target.ensure_in(format)?;
        self.aperture.ensure_in(format)
    }

    pub(crate) fn merge_attributes(&mut self, objects: &AttributeSet) {
        self.object_attributes.merge(objects);
    }

    pub fn aperture(&self) -> &ApertureRef {
        &self.aperture
    }

    pub fn target(&self) -> Vector {
        self.target
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn object_attributes(&self) -> &AttributeSet {
        &self.object_attributes
    }
}

impl Generator for Flash {
    fn generate<'a>(&'a self, ctx: &mut GenerateContext<'_>, stream: &mut Stream<'a>) -> Result<()> {
        self.object_attributes.generate(stream);

        let dcode = ctx.dcode_of(&self.aperture)?;
        trace!(dcode = dcode.to_string(), target:% = self.target; "Generating flash");

        let engine = ctx.engine_mut();
        engine.set_polarity(stream, self.polarity);
        engine.flash(stream, dcode, self.target);
        Ok(())
    }

    fn cleanup(&self, stream: &mut Stream<'_>) {
        self.object_attributes.cleanup(stream);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use photoplot_core::{command::Command, numeric::CoordinateFormat};

    use super::*;
    use crate::{aperture::Aperture, registry::ApertureRegistry};

    fn format() -> CoordinateFormat {
        CoordinateFormat::new(2, 6).unwrap()
    }

    #[test]
    fn test_same_aperture_flashed_twice() {
        let pad = Aperture::circle(0.05).into_ref();
        let mut registry = ApertureRegistry::new();
        registry.register(&pad);

        let first = Flash::new(Rc::clone(&pad), format().vector(1.0, 1.0));
        let second = Flash::new(Rc::clone(&pad), format().vector(1.0, 1.0));
        assert!(Rc::ptr_eq(first.aperture(), second.aperture()));

        let mut ctx = GenerateContext::new(&registry);
        let mut stream = Stream::new();
        first.generate(&mut ctx, &mut stream).unwrap();
        second.generate(&mut ctx, &mut stream).unwrap();

        let lines: Vec<String> = stream.commands().map(Command::render).collect();
        assert_eq!(
            lines,
            vec![
                "%LPD*%",
                "D3000*",
                "X01000000Y01000000D03*",
                "X01000000Y01000000D03*"
            ]
        );
    }

    #[test]
    fn test_clear_flash_loads_polarity() {
        let pad = Aperture::circle(0.05).into_ref();
        let mut registry = ApertureRegistry::new();
        registry.register(&pad);

        let flash = Flash::new(pad, format().vector(0.0, 0.0)).invert();
        assert_eq!(flash.polarity(), Polarity::Clear);

        let mut ctx = GenerateContext::new(&registry);
        let mut stream = Stream::new();
        flash.generate(&mut ctx, &mut stream).unwrap();

        assert_eq!(
            stream.commands().next(),
            Some(&Command::LoadPolarity(Polarity::Clear))
        );
    }

    #[test]
    fn test_unregistered_aperture_fails() {
        let registry = ApertureRegistry::new();
        let flash = Flash::new(Aperture::circle(0.05).into_ref(), format().vector(0.0, 0.0));

        let mut ctx = GenerateContext::new(&registry);
        let mut stream = Stream::new();
        assert!(matches!(
            flash.generate(&mut ctx, &mut stream),
            Err(Error::UnassignedAperture(_))
        ));
    }

    #[test]
    fn test_object_attributes() {
        let pad = Aperture::circle(0.05).into_ref();
        let mut registry = ApertureRegistry::new();
        registry.register(&pad);

        let mut flash = Flash::new(pad, format().vector(0.0, 0.0));
        flash.add_attribute(Attribute::component("U1")).unwrap();
        assert!(matches!(
            flash.add_attribute(Attribute::aper_function(["ComponentPad"])),
            Err(Error::UnsupportedObject { .. })
        ));

        let mut ctx = GenerateContext::new(&registry);
        let mut stream = Stream::new();
        flash.generate(&mut ctx, &mut stream).unwrap();
        flash.cleanup(&mut stream);

        let lines: Vec<String> = stream.commands().map(Command::render).collect();
        assert_eq!(lines.first().map(String::as_str), Some("%TO.C,U1*%"));
        assert_eq!(lines.last().map(String::as_str), Some("%TD.C*%"));
    }
}
