use std::rc::Rc;

use log::{debug, warn};

use photoplot_core::{
    Error, Result,
    attribute::{Attribute, AttributeKind, AttributeSet},
    command::Command,
    numeric::{CoordinateFormat, Vector},
    types::Polarity,
};

use super::Segment;
use crate::stream::{GenerateContext, Generator, Stream};

/// A closed contour filled in its polarity.
///
/// Segments are shared between a region and its inverted copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    segments: Rc<[Segment]>,
    polarity: Polarity,
    object_attributes: AttributeSet,
    aperture_attributes: AttributeSet,
}

impl Region {
    /// Creates a dark region from segments taken as-is.
    pub fn new(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
            polarity: Polarity::Dark,
            object_attributes: AttributeSet::new(AttributeKind::Object),
            aperture_attributes: AttributeSet::new(AttributeKind::Aperture),
        }
    }

    /// Creates a dark polygon through `points`, closed back to the first point.
    ///
    /// N points (N ≥ 2) yield N line segments. Fewer points yield an empty region.
    pub fn from_points(points: impl IntoIterator<Item = Vector>) -> Self {
        let points: Vec<Vector> = points.into_iter().collect();
        if points.len() < 2 {
            return Self::new(Vec::new());
        }

        let closing = Segment::line(points[points.len() - 1], points[0]);
        let segments = points
            .windows(2)
            .map(|pair| Segment::line(pair[0], pair[1]))
            .chain(std::iter::once(closing));
        Self::new(segments)
    }

    /// Creates a dark disc as one full-circle arc.
    pub fn circle(center: Vector, radius: f64) -> Self {
        let format = center.format();
        let start = Vector::new(center.x().to_f64() + radius, center.y().to_f64(), format);
        Self::new([Segment::full_circle(start, center)])
    }

    /// Sets the polarity.
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Returns a copy with the opposite polarity, sharing the segments.
    pub fn invert(&self) -> Self {
        Self {
            polarity: self.polarity.invert(),
            ..self.clone()
        }
    }

    /// Adds an object or aperture attribute.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedObject`] for file attributes.
    /// - [`Error::UnknownAttribute`] for unrecognized names.
    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<()> {
        match attribute.kind() {
            AttributeKind::Object => self.object_attributes.insert(attribute),
            AttributeKind::Aperture => self.aperture_attributes.insert(attribute),
            AttributeKind::File => Err(Error::UnsupportedObject {
                object: "file attribute",
                container: "region",
            }),
        }
    }

    pub(crate) fn ensure_in(&self, format: CoordinateFormat) -> Result<()> {
        self.segments
            .iter()
            .try_for_each(|segment| segment.ensure_in(format))
    }

    pub(crate) fn merge_attributes(&mut self, objects: &AttributeSet, apertures: &AttributeSet) {
        self.object_attributes.merge(objects);
        self.aperture_attributes.merge(apertures);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn object_attributes(&self) -> &AttributeSet {
        &self.object_attributes
    }

    pub fn aperture_attributes(&self) -> &AttributeSet {
        &self.aperture_attributes
    }
}

impl Generator for Region {
    fn generate<'a>(&'a self, ctx: &mut GenerateContext<'_>, stream: &mut Stream<'a>) -> Result<()> {
        if self.segments.is_empty() {
            warn!("Skipping region without segments");
            return Ok(());
        }

        debug!(segments = self.segments.len(), polarity:% = self.polarity; "Generating region");

        let engine = ctx.engine_mut();
        engine.reset();

        stream.push(Command::Comment(format!(
            "Region of {} segments",
            self.segments.len()
        )));
        self.object_attributes.generate(stream);
        self.aperture_attributes.generate(stream);
        engine.set_polarity(stream, self.polarity);

        stream.push(Command::StartRegion);
        for segment in self.segments.iter() {
            segment.generate(engine, stream)?;
        }
        if let Some(position) = engine.state().position() {
            stream.push(Command::Move { target: position });
        }
        stream.push(Command::EndRegion);
        Ok(())
    }

    fn cleanup(&self, stream: &mut Stream<'_>) {
        self.object_attributes.cleanup(stream);
        self.aperture_attributes.cleanup(stream);
    }
}

#[cfg(test)]
mod tests {
    use photoplot_core::{
        numeric::CoordinateFormat,
        types::{InterpMode, QuadrantMode},
    };

    use super::*;
    use crate::registry::ApertureRegistry;

    fn format() -> CoordinateFormat {
        CoordinateFormat::new(2, 6).unwrap()
    }

    fn square() -> Region {
        let f = format();
        Region::from_points([
            f.vector(0.0, 0.0),
            f.vector(1.0, 0.0),
            f.vector(1.0, 1.0),
            f.vector(0.0, 1.0),
        ])
    }

    fn render(region: &Region) -> Vec<String> {
        let registry = ApertureRegistry::new();
        let mut ctx = GenerateContext::new(&registry);
        let mut stream = Stream::new();
        region.generate(&mut ctx, &mut stream).unwrap();
        region.cleanup(&mut stream);
        stream.commands().map(Command::render).collect()
    }

    #[test]
    fn test_from_points_closes_contour() {
        let region = square();
        let segments = region.segments();

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].start(), format().vector(0.0, 1.0));
        assert_eq!(segments[3].end(), format().vector(0.0, 0.0));
    }

    #[test]
    fn test_rectangle_protocol() {
        assert_eq!(
            render(&square()),
            vec![
                "G04 Region of 4 segments*",
                "%LPD*%",
                "G36*",
                "G01*",
                "X00000000Y00000000D02*",
                "X01000000Y00000000D01*",
                "X01000000Y01000000D01*",
                "X00000000Y01000000D01*",
                "X00000000Y00000000D01*",
                "X00000000Y00000000D02*",
                "G37*",
            ]
        );
    }

    #[test]
    fn test_attributes_wrap_region() {
        let mut region = square().with_polarity(Polarity::Clear);
        region.add_attribute(Attribute::net_name("GND")).unwrap();
        region
            .add_attribute(Attribute::aper_function(["Conductor"]))
            .unwrap();

        let lines = render(&region);
        assert_eq!(lines[1], "%TO.N,GND*%");
        assert_eq!(lines[2], "%TA.AperFunction,Conductor*%");
        assert_eq!(lines[3], "%LPC*%");
        assert_eq!(
            lines[lines.len() - 2..],
            ["%TD.N*%".to_string(), "%TD.AperFunction*%".to_string()]
        );
    }

    #[test]
    fn test_file_attribute_is_unsupported() {
        let mut region = square();
        assert_eq!(
            region.add_attribute(Attribute::creation_date("now")),
            Err(Error::UnsupportedObject {
                object: "file attribute",
                container: "region",
            })
        );
    }

    #[test]
    fn test_empty_region_emits_nothing() {
        let region = Region::from_points([format().vector(1.0, 1.0)]);
        assert!(region.segments().is_empty());
        assert!(render(&region).is_empty());
    }

    #[test]
    fn test_invert_shares_segments() {
        let region = square();
        let inverted = region.invert();

        assert_eq!(region.polarity(), Polarity::Dark);
        assert_eq!(inverted.polarity(), Polarity::Clear);
        assert!(Rc::ptr_eq(&region.segments, &inverted.segments));
        assert_eq!(inverted.invert(), region);
    }

    #[test]
    fn test_circle_region() {
        let region = Region::circle(format().vector(0.5, 0.5), 0.25);
        let lines = render(&region);

        assert_eq!(region.segments().len(), 1);
        let arc = region.segments()[0];
        assert!(arc.is_full_circle());
        assert_eq!(arc.interpolation(), InterpMode::CounterClockwise);
        assert_eq!(arc.quadrant(), QuadrantMode::Multi);
        assert_eq!(arc.center(), Some(format().vector(0.5, 0.5)));
        assert!(lines.contains(&"G75*".to_string()));
        assert!(lines.contains(&"X00750000Y00500000I-00250000J00000000D01*".to_string()));
    }
}
