//! Example: a small panel of ring pads with a matching soldermask
//!
//! Builds an outline, a copper layer of rings and flashed pads, and a
//! soldermask that opens every pad, then writes the three files to the
//! current directory.

use std::rc::Rc;

use photoplot::{
    Layer, LayerBuilder,
    aperture::{Aperture, ApertureRef},
    graphic::{Block, Flash, Region},
    layer::{LayerKind, ProjectId, Side},
    numeric::{CoordinateFormat, Vector},
};

const PITCH: f64 = 0.4;
const COUNT: usize = 5;

fn rectangle(f: CoordinateFormat, x: f64, y: f64, width: f64, height: f64) -> Region {
    Region::from_points([
        f.vector(x, y),
        f.vector(x + width, y),
        f.vector(x + width, y + height),
        f.vector(x, y + height),
    ])
}

fn ring(center: Vector, radius: f64, width: f64) -> Block {
    Region::circle(center, radius) - Region::circle(center, radius - width)
}

fn pad_centers(f: CoordinateFormat) -> Vec<Vector> {
    (0..COUNT)
        .map(|i| f.vector(0.3 + PITCH * i as f64, 0.5))
        .collect()
}

fn copper(project: &ProjectId, pad: &ApertureRef) -> Result<Layer, Box<dyn std::error::Error>> {
    let mut layer = LayerBuilder::new(LayerKind::Copper {
        index: 1,
        side: Side::Top,
        layer_type: None,
    })
    .with_project(project.clone())
    .build()?;
    let f = layer.format();

    for center in pad_centers(f) {
        layer.append(ring(center, 0.15, 0.03))?;
        layer.append(Flash::new(Rc::clone(pad), center))?;
    }
    Ok(layer)
}

fn soldermask(project: &ProjectId, pad: &ApertureRef) -> Result<Layer, Box<dyn std::error::Error>> {
    let mut layer = LayerBuilder::new(LayerKind::Soldermask {
        side: Side::Top,
        index: None,
    })
    .with_project(project.clone())
    .build()?;
    let f = layer.format();

    let mut openings = Block::new();
    for center in pad_centers(f) {
        openings.append(Flash::new(Rc::clone(pad), center))?;
    }
    layer.append(openings)?;
    Ok(layer)
}

fn outline(project: &ProjectId) -> Result<Layer, Box<dyn std::error::Error>> {
    let mut layer = LayerBuilder::new(LayerKind::Outline { plated: false })
        .with_project(project.clone())
        .build()?;
    let f = layer.format();

    let width = PITCH * COUNT as f64 + 0.2;
    layer.append(rectangle(f, 0.0, 0.0, width, 1.0) - rectangle(f, 0.01, 0.01, width - 0.02, 0.98))?;
    Ok(layer)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let project = ProjectId::new("logo_panel", "1.0");
    let pad = Aperture::circle(0.08).with_hole(0.03).into_ref();

    let layers = [
        ("logo_panel-outline.gbr", outline(&project)?),
        ("logo_panel-copper.gbr", copper(&project, &pad)?),
        ("logo_panel-soldermask.gbr", soldermask(&project, &pad)?),
    ];

    for (file, layer) in &layers {
        layer.write_to_path(file)?;
        let stats = layer.stats();
        println!(
            "{file}: {} apertures, {} regions, {} flashes",
            stats.apertures, stats.regions, stats.flashes
        );
    }

    Ok(())
}
