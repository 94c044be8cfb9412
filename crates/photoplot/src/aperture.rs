//! Aperture shapes and their definition commands.
//!
//! An [`Aperture`] is a reusable stamp. Client code builds one, wraps it in an
//! [`ApertureRef`] and hands clones of that reference to every
//! [`Flash`](crate::graphic::Flash) that uses it. The layer assigns the D-code
//! on first reference; identity is the reference itself, never the shape, so
//! two circles of the same size are still two apertures.
//!
//! # Example
//!
//! ```
//! # use photoplot::aperture::Aperture;
//! let pad = Aperture::rectangle(0.06, 0.04).with_hole(0.02);
//! assert_eq!(pad.template(), 'R');
//! assert_eq!(pad.params(), "0.06X0.04X0.02");
//! ```

use std::{fmt, rc::Rc};

use photoplot_core::{
    Result,
    attribute::{Attribute, AttributeKind, AttributeSet},
    command::{Command, DCode, format_decimal},
    numeric::CoordinateFormat,
};

use crate::{
    graphic::Block,
    stream::{GenerateContext, Generator, Stream},
};

/// Shared handle to an aperture. Equality of apertures is [`Rc::ptr_eq`].
pub type ApertureRef = Rc<Aperture>;

/// The shape template of an aperture.
#[derive(Debug, Clone)]
pub enum ApertureShape {
    /// Template `C`.
    Circle { diameter: f64 },
    /// Template `R`.
    Rectangle { x_size: f64, y_size: f64 },
    /// Template `O`, a rectangle with fully rounded short sides.
    Obround { x_size: f64, y_size: f64 },
    /// Template `P`, a regular polygon inscribed in `diameter`.
    Polygon {
        diameter: f64,
        vertices: u32,
        rotation: f64,
    },
    /// A shape drawn by a block of regions and flashes.
    Block(Block),
}

/// A reusable stamp shape with an optional hole and its own attributes.
#[derive(Debug, Clone)]
pub struct Aperture {
    shape: ApertureShape,
    hole: Option<f64>,
    attributes: AttributeSet,
}

impl Aperture {
    fn with_shape(shape: ApertureShape) -> Self {
        Self {
            shape,
            hole: None,
            attributes: AttributeSet::new(AttributeKind::Aperture),
        }
    }

    pub fn circle(diameter: f64) -> Self {
        Self::with_shape(ApertureShape::Circle { diameter })
    }

    pub fn rectangle(x_size: f64, y_size: f64) -> Self {
        Self::with_shape(ApertureShape::Rectangle { x_size, y_size })
    }

    pub fn obround(x_size: f64, y_size: f64) -> Self {
        Self::with_shape(ApertureShape::Obround { x_size, y_size })
    }

    /// Regular polygon; `rotation` is in degrees.
    pub fn polygon(diameter: f64, vertices: u32, rotation: f64) -> Self {
        Self::with_shape(ApertureShape::Polygon {
            diameter,
            vertices,
            rotation,
        })
    }

    pub fn triangle(diameter: f64, rotation: f64) -> Self {
        Self::polygon(diameter, 3, rotation)
    }

    pub fn square(diameter: f64, rotation: f64) -> Self {
        Self::polygon(diameter, 4, rotation)
    }

    pub fn pentagon(diameter: f64, rotation: f64) -> Self {
        Self::polygon(diameter, 5, rotation)
    }

    pub fn hexagon(diameter: f64, rotation: f64) -> Self {
        Self::polygon(diameter, 6, rotation)
    }

    /// Creates a block aperture drawn by `block`.
    ///
    /// Apertures flashed inside the block are assigned before this one when
    /// the block aperture is registered with a layer.
    pub fn block(block: Block) -> Self {
        Self::with_shape(ApertureShape::Block(block))
    }

    /// Sets the hole diameter. Block apertures ignore it.
    pub fn with_hole(mut self, diameter: f64) -> Self {
        self.hole = Some(diameter);
        self
    }

    /// Adds an aperture attribute emitted before the definition.
    ///
    /// # Errors
    ///
    /// Returns [`photoplot_core::Error::UnknownAttribute`] if the attribute is
    /// not an aperture attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Result<Self> {
        self.attributes.insert(attribute)?;
        Ok(self)
    }

    /// Wraps the aperture into a shareable reference.
    pub fn into_ref(self) -> ApertureRef {
        Rc::new(self)
    }

    pub fn shape(&self) -> &ApertureShape {
        &self.shape
    }

    pub fn hole(&self) -> Option<f64> {
        self.hole
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Returns the template letter; block apertures report `B`.
    pub fn template(&self) -> char {
        match self.shape {
            ApertureShape::Circle { .. } => 'C',
            ApertureShape::Rectangle { .. } => 'R',
            ApertureShape::Obround { .. } => 'O',
            ApertureShape::Polygon { .. } => 'P',
            ApertureShape::Block(_) => 'B',
        }
    }

    /// Returns the rounded, `X`-joined parameter list, hole last.
    pub fn params(&self) -> String {
        let mut params = match &self.shape {
            ApertureShape::Circle { diameter } => vec![*diameter],
            ApertureShape::Rectangle { x_size, y_size }
            | ApertureShape::Obround { x_size, y_size } => vec![*x_size, *y_size],
            ApertureShape::Polygon {
                diameter,
                vertices,
                rotation,
            } => vec![*diameter, f64::from(*vertices), *rotation],
            ApertureShape::Block(_) => return String::new(),
        };
        params.extend(self.hole);

        params
            .into_iter()
            .map(format_decimal)
            .collect::<Vec<_>>()
            .join("X")
    }

    /// Returns `true` for apertures drawn by a block.
    pub fn is_block(&self) -> bool {
        matches!(self.shape, ApertureShape::Block(_))
    }

    /// Apertures flashed inside a block aperture, in order.
    pub fn nested_apertures(&self) -> Vec<&ApertureRef> {
        match &self.shape {
            ApertureShape::Block(block) => block.apertures().collect(),
            _ => Vec::new(),
        }
    }

    /// Checks the flashes and regions drawn by a block aperture against
    /// `format`. Standard shapes carry no coordinates.
    pub(crate) fn ensure_in(&self, format: CoordinateFormat) -> Result<()> {
        match &self.shape {
            ApertureShape::Block(block) => block.ensure_in(format),
            _ => Ok(()),
        }
    }

    /// Appends this aperture's definition under `dcode`.
    ///
    /// Standard shapes produce a single `AD` command. Block apertures emit a
    /// comment, then the block between `%AB` commands with the graphics state
    /// reset on both sides.
    ///
    /// # Errors
    ///
    /// Propagates errors from generating the block of a block aperture.
    pub fn define<'a>(
        &'a self,
        dcode: DCode,
        ctx: &mut GenerateContext<'_>,
        stream: &mut Stream<'a>,
    ) -> Result<()> {
        self.attributes.generate(stream);

        match &self.shape {
            ApertureShape::Block(block) => {
                stream.push(Command::Comment(format!("Block aperture {dcode}")));
                ctx.engine_mut().reset();
                stream.push(Command::BeginBlockAperture(dcode));
                block.generate(ctx, stream)?;
                stream.push(Command::EndBlockAperture);
                ctx.engine_mut().reset();
            }
            _ => stream.push(Command::DefineAperture {
                dcode,
                template: self.template(),
                params: self.params(),
            }),
        }

        self.attributes.cleanup(stream);
        Ok(())
    }
}

impl fmt::Display for Aperture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            ApertureShape::Circle { .. } => write!(f, "circle")?,
            ApertureShape::Rectangle { .. } => write!(f, "rectangle")?,
            ApertureShape::Obround { .. } => write!(f, "obround")?,
            ApertureShape::Polygon { vertices, .. } => write!(f, "polygon/{vertices}")?,
            ApertureShape::Block(block) => return write!(f, "block of {}", block.len()),
        }
        write!(f, " {}", self.params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ApertureRegistry;

    fn definition(aperture: &Aperture, dcode: u32) -> Vec<String> {
        let registry = ApertureRegistry::new();
        let mut ctx = GenerateContext::new(&registry);
        let mut stream = Stream::new();
        aperture
            .define(DCode::new(dcode), &mut ctx, &mut stream)
            .unwrap();
        stream.commands().map(Command::render).collect()
    }

    #[test]
    fn test_circle_definition() {
        assert_eq!(
            definition(&Aperture::circle(0.05), 3000),
            vec!["%ADD3000C,0.05*%"]
        );
    }

    #[test]
    fn test_hole_goes_last() {
        let aperture = Aperture::obround(0.08, 0.04).with_hole(0.025);
        assert_eq!(definition(&aperture, 3001), vec!["%ADD3001O,0.08X0.04X0.025*%"]);
    }

    #[test]
    fn test_polygon_params() {
        assert_eq!(Aperture::hexagon(0.1, 30.0).params(), "0.1X6X30");
        assert_eq!(Aperture::triangle(0.1, 0.0).params(), "0.1X3X0");
        assert_eq!(Aperture::square(0.2, 45.0).template(), 'P');
        assert_eq!(Aperture::pentagon(0.2, 0.0).params(), "0.2X5X0");
    }

    #[test]
    fn test_params_are_rounded() {
        assert_eq!(Aperture::circle(0.123_456_789).params(), "0.123457");
    }

    #[test]
    fn test_attributes_wrap_definition() {
        let aperture = Aperture::circle(0.01)
            .with_attribute(Attribute::aper_function(["ViaPad"]))
            .unwrap();

        assert_eq!(
            definition(&aperture, 3002),
            vec![
                "%TA.AperFunction,ViaPad*%",
                "%ADD3002C,0.01*%",
                "%TD.AperFunction*%"
            ]
        );
    }

    #[test]
    fn test_with_attribute_rejects_object_attribute() {
        assert!(
            Aperture::circle(0.01)
                .with_attribute(Attribute::net_name("GND"))
                .is_err()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Aperture::circle(0.05).to_string(), "circle 0.05");
        assert_eq!(Aperture::hexagon(0.1, 0.0).to_string(), "polygon/6 0.1X6X0");
    }
}
