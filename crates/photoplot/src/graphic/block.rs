use std::ops::{Add, Sub};

use log::{debug, warn};

use photoplot_core::{
    Error, Result,
    attribute::{Attribute, AttributeKind, AttributeSet},
    numeric::CoordinateFormat,
    types::Polarity,
};

use super::{Flash, Graphic, Region};
use crate::{
    aperture::ApertureRef,
    stream::{GenerateContext, Generator, Stream},
};

/// A leaf graphic object held by a [`Block`].
#[derive(Debug, Clone)]
pub enum Primitive {
    Region(Region),
    Flash(Flash),
}

impl Primitive {
    pub fn polarity(&self) -> Polarity {
        match self {
            Self::Region(region) => region.polarity(),
            Self::Flash(flash) => flash.polarity(),
        }
    }

    /// Returns a copy with the opposite polarity.
    pub fn invert(&self) -> Self {
        match self {
            Self::Region(region) => Self::Region(region.invert()),
            Self::Flash(flash) => Self::Flash(flash.invert()),
        }
    }

    pub(crate) fn ensure_in(&self, format: CoordinateFormat) -> Result<()> {
        match self {
            Self::Region(region) => region.ensure_in(format),
            Self::Flash(flash) => flash.ensure_in(format),
        }
    }

    /// Flashes take only the object attributes; their aperture attributes
    /// belong to the aperture definition.
    fn merge_attributes(&mut self, objects: &AttributeSet, apertures: &AttributeSet) {
        match self {
            Self::Region(region) => region.merge_attributes(objects, apertures),
            Self::Flash(flash) => {
                if !apertures.is_empty() {
                    warn!(
                        aperture = flash.aperture().to_string(),
                        attributes = apertures.len();
                        "Block aperture attributes do not apply to flashes, skipping"
                    );
                }
                flash.merge_attributes(objects);
            }
        }
    }
}

impl Generator for Primitive {
    fn generate<'a>(&'a self, ctx: &mut GenerateContext<'_>, stream: &mut Stream<'a>) -> Result<()> {
        match self {
            Self::Region(region) => region.generate(ctx, stream),
            Self::Flash(flash) => flash.generate(ctx, stream),
        }
    }

    fn cleanup(&self, stream: &mut Stream<'_>) {
        match self {
            Self::Region(region) => region.cleanup(stream),
            Self::Flash(flash) => flash.cleanup(stream),
        }
    }
}

/// Everything a [`Block`] or a [`Layer`](crate::layer::Layer) can be handed.
///
/// Each container routes the variants it accepts and rejects the rest with
/// [`Error::UnsupportedObject`].
#[derive(Debug, Clone)]
pub enum Appendable {
    Region(Region),
    Flash(Flash),
    Block(Block),
    Attribute(Attribute),
    Aperture(ApertureRef),
}

impl Appendable {
    /// Short name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Region(_) => "region",
            Self::Flash(_) => "flash",
            Self::Block(_) => "block",
            Self::Attribute(attribute) => match attribute.kind() {
                AttributeKind::File => "file attribute",
                AttributeKind::Aperture => "aperture attribute",
                AttributeKind::Object => "object attribute",
            },
            Self::Aperture(_) => "aperture",
        }
    }
}

impl From<Region> for Appendable {
    fn from(region: Region) -> Self {
        Self::Region(region)
    }
}

impl From<Flash> for Appendable {
    fn from(flash: Flash) -> Self {
        Self::Flash(flash)
    }
}

impl From<Block> for Appendable {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

impl From<Attribute> for Appendable {
    fn from(attribute: Attribute) -> Self {
        Self::Attribute(attribute)
    }
}

impl From<ApertureRef> for Appendable {
    fn from(aperture: ApertureRef) -> Self {
        Self::Aperture(aperture)
    }
}

impl From<Graphic> for Appendable {
    fn from(graphic: Graphic) -> Self {
        match graphic {
            Graphic::Region(region) => Self::Region(region),
            Graphic::Flash(flash) => Self::Flash(flash),
            Graphic::Block(block) => Self::Block(block),
        }
    }
}

/// A flat, ordered collection of regions and flashes.
///
/// Appending a block moves its children, not the block itself. Subtracting
/// inverts every incoming leaf first, which is how clearances inside earlier
/// dark objects are expressed.
///
/// Object and aperture attributes appended to a block apply to every child
/// already in it and to every child appended later.
///
/// # Example
///
/// ```
/// # use photoplot::graphic::{Block, Region};
/// # use photoplot_core::numeric::CoordinateFormat;
/// # use photoplot_core::types::Polarity;
/// let f = CoordinateFormat::new(2, 6).unwrap();
/// let outer = Region::from_points([f.vector(0.0, 0.0), f.vector(2.0, 0.0), f.vector(1.0, 2.0)]);
/// let inner = Region::circle(f.vector(1.0, 0.5), 0.2);
///
/// let pad: Block = outer - inner;
/// assert_eq!(pad.len(), 2);
/// assert_eq!(pad.primitives()[1].polarity(), Polarity::Clear);
/// ```
#[derive(Debug, Clone)]
pub struct Block {
    objects: Vec<Primitive>,
    object_attributes: AttributeSet,
    aperture_attributes: AttributeSet,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            object_attributes: AttributeSet::new(AttributeKind::Object),
            aperture_attributes: AttributeSet::new(AttributeKind::Aperture),
        }
    }
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a graphic or an attribute.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedObject`] for file attributes and apertures.
    /// - [`Error::UnknownAttribute`] for unrecognized attribute names.
    pub fn append(&mut self, item: impl Into<Appendable>) -> Result<&mut Self> {
        match item.into() {
            Appendable::Region(region) => self.push(Primitive::Region(region)),
            Appendable::Flash(flash) => self.push(Primitive::Flash(flash)),
            Appendable::Block(block) => self.absorb(block, false),
            Appendable::Attribute(attribute) => self.apply_attribute(attribute)?,
            other @ Appendable::Aperture(_) => {
                return Err(Error::UnsupportedObject {
                    object: other.name(),
                    container: "block",
                });
            }
        }
        Ok(self)
    }

    /// Appends the polarity-inverted copy of a graphic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedObject`] for anything that is not a graphic.
    pub fn subtract(&mut self, item: impl Into<Appendable>) -> Result<&mut Self> {
        match item.into() {
            Appendable::Region(region) => self.push(Primitive::Region(region.invert())),
            Appendable::Flash(flash) => self.push(Primitive::Flash(flash.invert())),
            Appendable::Block(block) => self.absorb(block, true),
            other => {
                return Err(Error::UnsupportedObject {
                    object: other.name(),
                    container: "block subtraction",
                });
            }
        }
        Ok(self)
    }

    /// Number of leaf objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.objects
    }

    pub fn region_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|object| matches!(object, Primitive::Region(_)))
            .count()
    }

    pub fn flash_count(&self) -> usize {
        self.len() - self.region_count()
    }

    /// Apertures of the flashes in this block, in order.
    pub fn apertures(&self) -> impl Iterator<Item = &ApertureRef> {
        self.objects.iter().filter_map(|object| match object {
            Primitive::Flash(flash) => Some(flash.aperture()),
            Primitive::Region(_) => None,
        })
    }

    /// Checks every leaf against `format`.
    pub(crate) fn ensure_in(&self, format: CoordinateFormat) -> Result<()> {
        self.objects
            .iter()
            .try_for_each(|object| object.ensure_in(format))
    }

    fn push(&mut self, mut object: Primitive) {
        object.merge_attributes(&self.object_attributes, &self.aperture_attributes);
        self.objects.push(object);
    }

    fn absorb(&mut self, block: Block, invert: bool) {
        for object in block.objects {
            let object = if invert { object.invert() } else { object };
            self.push(object);
        }
    }

    fn apply_attribute(&mut self, attribute: Attribute) -> Result<()> {
        let set = match attribute.kind() {
            AttributeKind::Object => &mut self.object_attributes,
            AttributeKind::Aperture => &mut self.aperture_attributes,
            AttributeKind::File => {
                return Err(Error::UnsupportedObject {
                    object: "file attribute",
                    container: "block",
                });
            }
        };
        set.insert(attribute)?;

        for object in &mut self.objects {
            object.merge_attributes(&self.object_attributes, &self.aperture_attributes);
        }
        Ok(())
    }
}

impl Generator for Block {
    fn generate<'a>(&'a self, ctx: &mut GenerateContext<'_>, stream: &mut Stream<'a>) -> Result<()> {
        debug!(regions = self.region_count(), flashes = self.flash_count(); "Generating block");

        for object in &self.objects {
            object.generate(ctx, stream)?;
            object.cleanup(stream);
        }
        Ok(())
    }
}

impl<T: Into<Graphic>> Add<T> for Block {
    type Output = Block;

    fn add(mut self, rhs: T) -> Block {
        match rhs.into() {
            Graphic::Region(region) => self.push(Primitive::Region(region)),
            Graphic::Flash(flash) => self.push(Primitive::Flash(flash)),
            Graphic::Block(block) => self.absorb(block, false),
        }
        self
    }
}

impl<T: Into<Graphic>> Sub<T> for Block {
    type Output = Block;

    fn sub(mut self, rhs: T) -> Block {
        match rhs.into() {
            Graphic::Region(region) => self.push(Primitive::Region(region.invert())),
            Graphic::Flash(flash) => self.push(Primitive::Flash(flash.invert())),
            Graphic::Block(block) => self.absorb(block, true),
        }
        self
    }
}

impl<T: Into<Graphic>> Add<T> for Region {
    type Output = Block;

    fn add(self, rhs: T) -> Block {
        Block::new() + self + rhs
    }
}

impl<T: Into<Graphic>> Sub<T> for Region {
    type Output = Block;

    fn sub(self, rhs: T) -> Block {
        Block::new() + self - rhs
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use photoplot_core::{
        command::Command,
        numeric::{CoordinateFormat, Vector},
        types::Polarity,
    };

    use super::*;
    use crate::{aperture::Aperture, registry::ApertureRegistry};

    fn format() -> CoordinateFormat {
        CoordinateFormat::new(2, 6).unwrap()
    }

    fn triangle(offset: f64) -> Region {
        let f = format();
        Region::from_points([
            f.vector(offset, 0.0),
            f.vector(offset + 1.0, 0.0),
            f.vector(offset + 0.5, 1.0),
        ])
    }

    fn polarities(block: &Block) -> Vec<Polarity> {
        block.primitives().iter().map(Primitive::polarity).collect()
    }

    #[test]
    fn test_append_flattens_nested_blocks() {
        let mut inner = Block::new();
        inner.append(triangle(1.0)).unwrap();
        inner.append(triangle(2.0)).unwrap();

        let mut outer = Block::new();
        outer.append(triangle(0.0)).unwrap();
        outer.append(inner).unwrap();

        assert_eq!(outer.len(), 3);
        let starts: Vec<Vector> = outer
            .primitives()
            .iter()
            .map(|object| match object {
                Primitive::Region(region) => region.segments()[0].start(),
                Primitive::Flash(flash) => flash.target(),
            })
            .collect();
        assert_eq!(
            starts,
            vec![
                format().vector(0.0, 0.0),
                format().vector(1.0, 0.0),
                format().vector(2.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_subtract_inverts_leaves() {
        let mut cut = Block::new();
        cut.append(triangle(1.0)).unwrap();
        cut.append(triangle(2.0).with_polarity(Polarity::Clear))
            .unwrap();

        let mut block = Block::new();
        block.append(triangle(0.0)).unwrap();
        block.subtract(cut).unwrap();

        assert_eq!(
            polarities(&block),
            vec![Polarity::Dark, Polarity::Clear, Polarity::Dark]
        );
    }

    #[test]
    fn test_subtract_rejects_attributes() {
        let mut block = Block::new();
        assert_eq!(
            block.subtract(Attribute::net_name("GND")).err(),
            Some(Error::UnsupportedObject {
                object: "object attribute",
                container: "block subtraction",
            })
        );
    }

    #[test]
    fn test_append_rejects_apertures_and_file_attributes() {
        let mut block = Block::new();
        assert!(matches!(
            block.append(Aperture::circle(0.1).into_ref()),
            Err(Error::UnsupportedObject { object: "aperture", .. })
        ));
        assert!(matches!(
            block.append(Attribute::md5("00")),
            Err(Error::UnsupportedObject { object: "file attribute", .. })
        ));
    }

    #[test]
    fn test_attributes_reach_existing_and_future_children() {
        let mut block = Block::new();
        block.append(triangle(0.0)).unwrap();
        block.append(Attribute::net_name("GND")).unwrap();
        block.append(triangle(1.0)).unwrap();

        for object in block.primitives() {
            let Primitive::Region(region) = object else {
                panic!("expected region");
            };
            assert_eq!(
                region.object_attributes().get(".N").unwrap().values(),
                ["GND".to_string()]
            );
        }
    }

    #[test]
    fn test_aperture_attributes_reach_regions_only() {
        let pad = Aperture::circle(0.05).into_ref();

        let mut block = Block::new();
        block.append(triangle(0.0)).unwrap();
        block
            .append(Flash::new(pad, format().vector(0.5, 0.5)))
            .unwrap();
        block
            .append(Attribute::aper_function(["Conductor"]))
            .unwrap();

        let Primitive::Region(region) = &block.primitives()[0] else {
            panic!("expected region");
        };
        assert!(region.aperture_attributes().get(".AperFunction").is_some());

        let Primitive::Flash(flash) = &block.primitives()[1] else {
            panic!("expected flash");
        };
        assert!(flash.object_attributes().is_empty());
        assert!(flash.aperture().attributes().is_empty());
    }

    #[test]
    fn test_ensure_in_checks_every_leaf() {
        let narrow = CoordinateFormat::new(2, 4).unwrap();
        let mut block = Block::new();
        block.append(triangle(0.0)).unwrap();
        assert!(block.ensure_in(format()).is_ok());

        block
            .append(Region::circle(narrow.vector(0.0, 0.0), 0.5))
            .unwrap();
        assert!(matches!(
            block.ensure_in(format()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let mut block = Block::new();
        assert!(matches!(
            block.append(Attribute::object(".Bogus", ["x"])),
            Err(Error::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_operators() {
        let block = triangle(0.0) + triangle(1.0) - triangle(2.0);
        assert_eq!(
            polarities(&block),
            vec![Polarity::Dark, Polarity::Dark, Polarity::Clear]
        );

        let cut = triangle(3.0) + triangle(4.0);
        let block = block - cut;
        assert_eq!(block.len(), 5);
        assert_eq!(block.primitives()[4].polarity(), Polarity::Clear);
    }

    #[test]
    fn test_generate_cleans_up_each_child() {
        let pad = Aperture::circle(0.05).into_ref();
        let mut registry = ApertureRegistry::new();
        registry.register(&pad);

        let mut block = Block::new();
        block.append(Attribute::net_name("VCC")).unwrap();
        block
            .append(Flash::new(Rc::clone(&pad), format().vector(0.0, 0.0)))
            .unwrap();
        block
            .append(Flash::new(pad, format().vector(1.0, 0.0)))
            .unwrap();

        let mut ctx = GenerateContext::new(&registry);
        let mut stream = Stream::new();
        block.generate(&mut ctx, &mut stream).unwrap();

        let lines: Vec<String> = stream.commands().map(Command::render).collect();
        assert_eq!(
            lines,
            vec![
                "%TO.N,VCC*%",
                "%LPD*%",
                "D3000*",
                "X00000000Y00000000D03*",
                "%TD.N*%",
                "%TO.N,VCC*%",
                "X01000000Y00000000D03*",
                "%TD.N*%",
            ]
        );
    }
}
