//! Layers and their serialization.
//!
//! A [`Layer`] is one output file. It collects file attributes, apertures and
//! graphics, then renders them in two passes:
//!
//! 1. [`Layer::generate`] builds the top-level stream: coordinate format and
//!    unit, file attributes, one deferred definition per aperture, one
//!    deferred generator per graphic followed by its cleanup, the checksum
//!    marker and end-of-file.
//! 2. The serializer expands that stream into text in strict order. When it
//!    reaches the checksum marker, everything before it is already rendered,
//!    so the `.MD5` value is computed from the buffer and written in place.
//!
//! Rendering happens in memory. [`Layer::write_to_path`] persists the finished
//! text through a temporary file, so a failed layer never leaves a truncated
//! file behind.
//!
//! # Example
//!
//! ```
//! # use photoplot::layer::{LayerBuilder, LayerKind, Side, checksum};
//! # use photoplot::aperture::Aperture;
//! # use photoplot::graphic::Flash;
//! let mut layer = LayerBuilder::new(LayerKind::Soldermask { side: Side::Top, index: None })
//!     .with_creation_date("2024-01-01T00:00:00+00:00")
//!     .build()
//!     .unwrap();
//!
//! let pad = Aperture::circle(0.06).into_ref();
//! let origin = layer.format().vector(0.5, 0.5);
//! layer.append(Flash::new(pad, origin)).unwrap();
//!
//! let text = layer.render().unwrap();
//! assert!(text.ends_with("M02*\n"));
//! assert!(checksum::verify(&text));
//! ```

pub mod checksum;
mod kind;
mod serializer;

pub use kind::{CopperType, DrillLabel, DrillSpan, FilePolarity, LayerKind, Side};

use std::{
    io::{self, Write},
    path::Path,
};

use log::{debug, info};
use tempfile::NamedTempFile;

use photoplot_core::{
    Error, Result,
    attribute::{Attribute, AttributeKind, AttributeSet},
    command::Command,
    numeric::CoordinateFormat,
    types::Unit,
};

use crate::{
    config::AppConfig,
    error::PhotoplotError,
    graphic::{Appendable, Graphic},
    registry::ApertureRegistry,
    stream::{GenerateContext, Generator, Stream},
};
use serializer::Serializer;

/// Project identification written as `.ProjectId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectId {
    name: String,
    revision: String,
    guid: Option<String>,
}

impl ProjectId {
    /// Identifies a project whose GUID is derived from its name and revision.
    pub fn new(name: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision: revision.into(),
            guid: None,
        }
    }

    /// Uses an explicit GUID.
    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    fn attribute(&self) -> Attribute {
        let guid = self
            .guid
            .clone()
            .unwrap_or_else(|| checksum::project_guid(&self.name, &self.revision));
        Attribute::project_id(&self.name, &guid, &self.revision)
    }
}

/// Builds a [`Layer`] with its standard file attributes.
#[derive(Debug, Clone)]
pub struct LayerBuilder {
    kind: LayerKind,
    config: AppConfig,
    creation_date: Option<String>,
    project: Option<ProjectId>,
}

impl LayerBuilder {
    /// Creates a builder with default configuration.
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            config: AppConfig::default(),
            creation_date: None,
            project: None,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides `.CreationDate`, which otherwise is the local time at build.
    pub fn with_creation_date(mut self, timestamp: impl Into<String>) -> Self {
        self.creation_date = Some(timestamp.into());
        self
    }

    /// Adds `.ProjectId`.
    pub fn with_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    /// Builds the layer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the configured coordinate format is
    /// out of range.
    pub fn build(self) -> Result<Layer> {
        let format = self.config.format().coordinate_format()?;
        let software = self.config.software();
        let creation_date = self
            .creation_date
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%:z").to_string());

        let mut attributes = AttributeSet::new(AttributeKind::File);
        attributes.insert(self.kind.file_function())?;
        attributes.insert(Attribute::file(
            ".FilePolarity",
            [self.kind.polarity().to_string()],
        ))?;
        attributes.insert(Attribute::generation_software(
            software.vendor(),
            software.application(),
            software.version(),
        ))?;
        attributes.insert(Attribute::creation_date(&creation_date))?;
        if let Some(project) = &self.project {
            attributes.insert(project.attribute())?;
        }

        debug!(kind:? = self.kind, format:% = format; "Created layer");
        Ok(Layer {
            kind: self.kind,
            format,
            unit: self.config.unit(),
            attributes,
            apertures: ApertureRegistry::new(),
            graphics: Vec::new(),
        })
    }
}

/// One output file: file attributes, apertures and graphics.
#[derive(Debug)]
pub struct Layer {
    kind: LayerKind,
    format: CoordinateFormat,
    unit: Unit,
    attributes: AttributeSet,
    apertures: ApertureRegistry,
    graphics: Vec<Graphic>,
}

/// Per-layer object counts, for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LayerStats {
    pub apertures: usize,
    pub blocks: usize,
    pub regions: usize,
    pub flashes: usize,
}

impl Layer {
    /// Appends a graphic, an aperture or a file attribute.
    ///
    /// Graphics assign D-codes to the apertures they flash, in order. An
    /// aperture appended directly is assigned immediately.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if a coordinate of the graphic, or of a block
    ///   aperture it flashes, is not in the layer's format or does not fit it.
    ///   Nothing is appended in that case.
    /// - [`Error::UnsupportedObject`] for object and aperture attributes.
    /// - [`Error::UnknownAttribute`] for unrecognized file attribute names.
    pub fn append(&mut self, item: impl Into<Appendable>) -> Result<&mut Self> {
        let graphic = match item.into() {
            Appendable::Region(region) => Graphic::Region(region),
            Appendable::Flash(flash) => Graphic::Flash(flash),
            Appendable::Block(block) => Graphic::Block(block),
            Appendable::Aperture(aperture) => {
                aperture.ensure_in(self.format)?;
                self.apertures.register(&aperture);
                return Ok(self);
            }
            Appendable::Attribute(attribute) if attribute.kind() == AttributeKind::File => {
                self.attributes.insert(attribute)?;
                return Ok(self);
            }
            other @ Appendable::Attribute(_) => {
                return Err(Error::UnsupportedObject {
                    object: other.name(),
                    container: "layer",
                });
            }
        };

        graphic.ensure_in(self.format)?;
        for aperture in graphic.apertures() {
            self.apertures.register(aperture);
        }
        info!(graphic = graphic.name(), index = self.graphics.len(); "Added graphic");
        self.graphics.push(graphic);
        Ok(self)
    }

    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    /// Coordinate format used by this layer; build vectors with it.
    pub fn format(&self) -> CoordinateFormat {
        self.format
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn apertures(&self) -> &ApertureRegistry {
        &self.apertures
    }

    pub fn graphics(&self) -> &[Graphic] {
        &self.graphics
    }

    /// Counts apertures and graphics by kind, blocks contributing their leaves.
    pub fn stats(&self) -> LayerStats {
        let mut stats = LayerStats {
            apertures: self.apertures.len(),
            ..LayerStats::default()
        };
        for graphic in &self.graphics {
            match graphic {
                Graphic::Region(_) => stats.regions += 1,
                Graphic::Flash(_) => stats.flashes += 1,
                Graphic::Block(block) => {
                    stats.blocks += 1;
                    stats.regions += block.region_count();
                    stats.flashes += block.flash_count();
                }
            }
        }
        stats
    }

    /// First pass: appends the layer's top-level stream.
    pub fn generate<'a>(&'a self, stream: &mut Stream<'a>) {
        stream.push(Command::SetCoordinateFormat(self.format));
        stream.push(Command::SetUnit(self.unit));

        self.attributes.generate(stream);

        for registration in self.apertures.iter() {
            stream.defer(registration);
        }

        for graphic in &self.graphics {
            stream.defer(graphic);
            graphic.cleanup(stream);
        }

        stream.push_checksum();
        stream.push(Command::EndOfFile);
    }

    /// Renders the whole file.
    ///
    /// # Errors
    ///
    /// Any usage error raised by an aperture or graphic aborts rendering.
    pub fn render(&self) -> Result<String> {
        let mut stream = Stream::new();
        self.generate(&mut stream);
        let nodes = stream.len();

        let mut ctx = GenerateContext::new(&self.apertures);
        let mut serializer = Serializer::new(&mut ctx);
        serializer.expand(stream)?;
        let (output, lines) = serializer.finish();

        let stats = self.stats();
        info!(
            nodes,
            lines,
            apertures = stats.apertures,
            blocks = stats.blocks,
            regions = stats.regions,
            flashes = stats.flashes;
            "Rendered layer"
        );
        Ok(output)
    }

    /// Renders the layer and writes it to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`PhotoplotError::Graphics`] if rendering fails, in which case
    /// nothing is written, or [`PhotoplotError::Io`] if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::result::Result<(), PhotoplotError> {
        let output = self.render()?;
        writer.write_all(output.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Renders the layer and atomically replaces the file at `path` with it.
    ///
    /// # Errors
    ///
    /// Returns [`PhotoplotError::Graphics`] if rendering fails, leaving any
    /// existing file untouched, or [`PhotoplotError::Io`] if writing fails.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> std::result::Result<(), PhotoplotError> {
        let output = self.render()?;
        persist(path, &output)
    }
}

/// Writes rendered layer text to `path` through a temporary file in the same
/// directory, replacing the target only once the text is complete.
///
/// # Errors
///
/// Returns [`PhotoplotError::Io`] if the temporary file cannot be created,
/// written or moved into place.
pub fn persist(path: impl AsRef<Path>, output: &str) -> std::result::Result<(), PhotoplotError> {
    let path = path.as_ref();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(output.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(io::Error::from)?;

    info!(path = path.display().to_string(), bytes = output.len(); "Wrote layer");
    Ok(())
}
