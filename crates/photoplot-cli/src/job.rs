//! TOML job descriptions.
//!
//! A job lists the layers to produce. Each `[[layer]]` table names its output
//! file and function, declares named apertures and draws a list of objects.
//! An object is a flash, a polygon region, a disc or a ring, selected by its
//! `kind`:
//!
//! ```toml
//! [project]
//! name = "demo"
//! revision = "1.0"
//!
//! [[layer]]
//! file = "demo-copper.gbr"
//! function = { kind = "copper", index = 1, side = "top" }
//!
//! [[layer.aperture]]
//! name = "pad"
//! shape = "circle"
//! diameter = 0.06
//!
//! [[layer.object]]
//! kind = "flash"
//! aperture = "pad"
//! at = [0.5, 0.5]
//!
//! [[layer.object]]
//! kind = "ring"
//! center = [0.5, 0.5]
//! radius = 0.1
//! width = 0.02
//! clear = true
//! ```
//!
//! Objects are drawn in the order they appear, so a `clear` object cuts only
//! the objects listed before it.

use std::{collections::HashMap, rc::Rc};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use photoplot::{
    Layer, LayerBuilder, PhotoplotError,
    aperture::{Aperture, ApertureRef},
    attribute::Attribute,
    config::AppConfig,
    graphic::{Block, Flash, Graphic, Region},
    layer::{LayerKind, ProjectId},
    numeric::{CoordinateFormat, Vector},
    types::Polarity,
};

/// Job-related errors for CLI
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Failed to parse job: {0}")]
    Parse(String),

    #[error("Layer {layer}: unknown aperture `{name}`")]
    UnknownAperture { layer: String, name: String },

    #[error("Layer {layer}: aperture `{name}` is declared twice")]
    DuplicateAperture { layer: String, name: String },

    #[error("Layer {layer}: ring width {width} must be positive and less than radius {radius}")]
    InvalidRing {
        layer: String,
        radius: f64,
        width: f64,
    },
}

impl From<JobError> for PhotoplotError {
    fn from(err: JobError) -> Self {
        PhotoplotError::Config(err.to_string())
    }
}

/// A whole job file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    #[serde(default)]
    project: Option<ProjectSpec>,

    #[serde(default, rename = "layer")]
    layers: Vec<LayerSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectSpec {
    name: String,
    revision: String,
    #[serde(default)]
    guid: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayerSpec {
    file: String,
    function: LayerKind,
    #[serde(default)]
    attributes: Vec<AttributeSpec>,
    #[serde(default, rename = "aperture")]
    apertures: Vec<ApertureSpec>,
    #[serde(default, rename = "object")]
    objects: Vec<ObjectSpec>,
}

/// One drawn object, tagged by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ObjectSpec {
    Region(RegionSpec),
    Circle(CircleSpec),
    Ring(RingSpec),
    Flash(FlashSpec),
}

/// A user-defined file attribute.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AttributeSpec {
    name: String,
    #[serde(default)]
    values: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApertureSpec {
    name: String,
    #[serde(flatten)]
    shape: ShapeSpec,
    #[serde(default)]
    hole: Option<f64>,
    #[serde(default)]
    function: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
enum ShapeSpec {
    Circle {
        diameter: f64,
    },
    Rectangle {
        x_size: f64,
        y_size: f64,
    },
    Obround {
        x_size: f64,
        y_size: f64,
    },
    Polygon {
        diameter: f64,
        vertices: u32,
        #[serde(default)]
        rotation: f64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegionSpec {
    points: Vec<[f64; 2]>,
    #[serde(default)]
    clear: bool,
    #[serde(default)]
    net: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CircleSpec {
    center: [f64; 2],
    radius: f64,
    #[serde(default)]
    clear: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RingSpec {
    center: [f64; 2],
    radius: f64,
    width: f64,
    #[serde(default)]
    clear: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FlashSpec {
    aperture: String,
    at: [f64; 2],
    #[serde(default)]
    clear: bool,
    #[serde(default)]
    component: Option<String>,
}

fn polarity(clear: bool) -> Polarity {
    if clear { Polarity::Clear } else { Polarity::Dark }
}

fn vector(format: CoordinateFormat, [x, y]: [f64; 2]) -> Vector {
    format.vector(x, y)
}

impl Job {
    /// Parses a job from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Parse`] for malformed TOML or unknown fields.
    pub fn parse(content: &str) -> Result<Self, JobError> {
        toml::from_str(content).map_err(|e| JobError::Parse(e.to_string()))
    }

    /// Number of layers in the job.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Builds every layer, paired with its output file name.
    ///
    /// # Errors
    ///
    /// Returns [`PhotoplotError::Config`] for references to undeclared
    /// apertures and invalid shapes, and [`PhotoplotError::Graphics`] for
    /// usage errors raised by the library.
    pub fn build(
        &self,
        config: &AppConfig,
        creation_date: Option<&str>,
    ) -> Result<Vec<(String, Layer)>, PhotoplotError> {
        let project = self.project.as_ref().map(|spec| {
            let project = ProjectId::new(&spec.name, &spec.revision);
            match &spec.guid {
                Some(guid) => project.with_guid(guid),
                None => project,
            }
        });

        self.layers
            .iter()
            .map(|spec| {
                let mut builder = LayerBuilder::new(spec.function.clone()).with_config(config.clone());
                if let Some(date) = creation_date {
                    builder = builder.with_creation_date(date);
                }
                if let Some(project) = &project {
                    builder = builder.with_project(project.clone());
                }

                let layer = spec.build(builder.build()?)?;
                Ok((spec.file.clone(), layer))
            })
            .collect()
    }
}

impl LayerSpec {
    fn build(&self, mut layer: Layer) -> Result<Layer, PhotoplotError> {
        let f = layer.format();

        for attribute in &self.attributes {
            layer.append(Attribute::file(&attribute.name, &attribute.values))?;
        }

        let apertures = self.apertures()?;
        for object in &self.objects {
            let graphic = self.graphic(object, f, &apertures)?;
            layer.append(graphic)?;
        }

        info!(file = self.file, apertures = layer.apertures().len(), graphics = layer.graphics().len(); "Built layer");
        Ok(layer)
    }

    fn graphic(
        &self,
        object: &ObjectSpec,
        f: CoordinateFormat,
        apertures: &HashMap<&str, ApertureRef>,
    ) -> Result<Graphic, PhotoplotError> {
        let graphic: Graphic = match object {
            ObjectSpec::Region(region) => {
                let mut graphic = Region::from_points(region.points.iter().map(|&p| vector(f, p)))
                    .with_polarity(polarity(region.clear));
                if let Some(net) = &region.net {
                    graphic.add_attribute(Attribute::net_name(net))?;
                }
                graphic.into()
            }
            ObjectSpec::Circle(circle) => Region::circle(vector(f, circle.center), circle.radius)
                .with_polarity(polarity(circle.clear))
                .into(),
            ObjectSpec::Ring(ring) => {
                if ring.width <= 0.0 || ring.width >= ring.radius {
                    return Err(JobError::InvalidRing {
                        layer: self.file.clone(),
                        radius: ring.radius,
                        width: ring.width,
                    }
                    .into());
                }
                let center = vector(f, ring.center);
                let outer = Region::circle(center, ring.radius);
                let inner = Region::circle(center, ring.radius - ring.width);

                let mut block = Block::new();
                if ring.clear {
                    block.subtract(outer - inner)?;
                } else {
                    block.append(outer - inner)?;
                }
                block.into()
            }
            ObjectSpec::Flash(flash) => {
                let aperture = apertures
                    .get(flash.aperture.as_str())
                    .ok_or_else(|| JobError::UnknownAperture {
                        layer: self.file.clone(),
                        name: flash.aperture.clone(),
                    })?;

                let mut graphic = Flash::new(Rc::clone(aperture), vector(f, flash.at))
                    .with_polarity(polarity(flash.clear));
                if let Some(component) = &flash.component {
                    graphic.add_attribute(Attribute::component(component))?;
                }
                graphic.into()
            }
        };
        Ok(graphic)
    }

    /// Declares the named apertures of this layer.
    ///
    /// Nothing is registered here. An aperture gets its D-code when a flash
    /// first uses it, so unused declarations never reach the file.
    fn apertures(&self) -> Result<HashMap<&str, ApertureRef>, PhotoplotError> {
        let mut apertures = HashMap::new();

        for spec in &self.apertures {
            let mut aperture = match spec.shape {
                ShapeSpec::Circle { diameter } => Aperture::circle(diameter),
                ShapeSpec::Rectangle { x_size, y_size } => Aperture::rectangle(x_size, y_size),
                ShapeSpec::Obround { x_size, y_size } => Aperture::obround(x_size, y_size),
                ShapeSpec::Polygon {
                    diameter,
                    vertices,
                    rotation,
                } => Aperture::polygon(diameter, vertices, rotation),
            };
            if let Some(hole) = spec.hole {
                aperture = aperture.with_hole(hole);
            }
            if let Some(function) = &spec.function {
                aperture = aperture.with_attribute(Attribute::aper_function(function))?;
            }

            let aperture = aperture.into_ref();
            if apertures
                .insert(spec.name.as_str(), Rc::clone(&aperture))
                .is_some()
            {
                return Err(JobError::DuplicateAperture {
                    layer: self.file.clone(),
                    name: spec.name.clone(),
                }
                .into());
            }
            debug!(name = spec.name, aperture = aperture.to_string(); "Declared aperture");
        }

        Ok(apertures)
    }
}
