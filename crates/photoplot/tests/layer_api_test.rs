//! Integration tests for the layer API
//!
//! These tests build layers through the public API only and check the
//! rendered text.

use std::rc::Rc;

use photoplot::{
    GraphicsError, LayerBuilder, PhotoplotError,
    aperture::Aperture,
    attribute::Attribute,
    config::{AppConfig, FormatConfig, SoftwareConfig},
    graphic::{Block, Flash, Region, Segment},
    layer::{LayerKind, ProjectId, Side, checksum},
    numeric::CoordinateFormat,
    types::{InterpMode, Polarity, QuadrantMode, Unit},
};

const DATE: &str = "2024-06-01T12:00:00+00:00";

fn copper() -> LayerBuilder {
    LayerBuilder::new(LayerKind::Copper {
        index: 1,
        side: Side::Top,
        layer_type: None,
    })
    .with_creation_date(DATE)
}

#[test]
fn test_rectangle_in_two_six_inch_format() {
    let mut layer = copper().build().unwrap();
    let f = layer.format();
    layer
        .append(Region::from_points([
            f.vector(0.0, 0.0),
            f.vector(1.25, 0.0),
            f.vector(1.25, 0.5),
            f.vector(0.0, 0.5),
        ]))
        .unwrap();

    let text = layer.render().unwrap();
    let coordinates: Vec<&str> = text
        .lines()
        .filter(|line| line.starts_with('X'))
        .collect();

    assert!(!coordinates.is_empty());
    for line in coordinates {
        let body = line.trim_end_matches('*');
        let x = &body[1..body.find('Y').unwrap()];
        let y = &body[body.find('Y').unwrap() + 1..body.find('D').unwrap()];
        assert_eq!(x.len(), 8, "x field of {line}");
        assert_eq!(y.len(), 8, "y field of {line}");
        assert!(!line.contains('.'), "no decimal point in {line}");
    }
    assert!(text.contains("X01250000Y00500000D01*"));
}

#[test]
fn test_single_aperture_flashed_twice() {
    let mut layer = copper().build().unwrap();
    let pad = Aperture::circle(0.04).into_ref();
    let at = layer.format().vector(0.3, 0.3);

    layer.append(Flash::new(Rc::clone(&pad), at)).unwrap();
    layer.append(Flash::new(pad, at)).unwrap();

    let text = layer.render().unwrap();
    let selects = text.lines().filter(|l| *l == "D3000*").count();
    let flashes = text.lines().filter(|l| l.ends_with("D03*")).count();

    assert_eq!(selects, 1);
    assert_eq!(flashes, 2);
    assert!(checksum::verify(&text));
}

#[test]
fn test_millimeter_config() {
    let config = AppConfig::new(
        FormatConfig::new(3, 5),
        Unit::Millimeter,
        SoftwareConfig::new("Acme", "boardgen", "2.1"),
    );
    let mut layer = copper().with_config(config).build().unwrap();
    let f = layer.format();
    let pad = Aperture::rectangle(1.5, 0.8).into_ref();
    layer.append(Flash::new(pad, f.vector(10.0, -2.5))).unwrap();

    let text = layer.render().unwrap();
    assert!(text.starts_with("%FSLAX35Y35*%\n%MOMM*%\n"));
    assert!(text.contains("%TF.GenerationSoftware,Acme,boardgen,2.1*%"));
    assert!(text.contains("X01000000Y-00250000D03*"));
}

#[test]
fn test_invalid_format_is_rejected() {
    let config = AppConfig::new(
        FormatConfig::new(2, 8),
        Unit::Inch,
        SoftwareConfig::default(),
    );
    assert!(copper().with_config(config).build().is_err());
}

#[test]
fn test_flash_built_with_another_format_is_rejected() {
    let mut layer = copper().build().unwrap();
    let other = CoordinateFormat::new(3, 5).unwrap();
    let pad = Aperture::circle(0.05).into_ref();

    let result = layer.append(Flash::new(pad, other.vector(0.5, 0.5)));

    assert!(matches!(result, Err(GraphicsError::Configuration(_))));
    assert!(layer.apertures().is_empty());
    assert!(layer.graphics().is_empty());
}

#[test]
fn test_clearance_inside_copper() {
    let mut layer = copper().build().unwrap();
    let f = layer.format();

    let plane = Region::from_points([
        f.vector(0.0, 0.0),
        f.vector(2.0, 0.0),
        f.vector(2.0, 2.0),
        f.vector(0.0, 2.0),
    ]);
    let mut pour = Block::new();
    pour.append(Attribute::net_name("GND")).unwrap();
    pour.append(plane).unwrap();
    pour.subtract(Region::circle(f.vector(1.0, 1.0), 0.25))
        .unwrap();
    layer.append(pour).unwrap();

    let text = layer.render().unwrap();
    let dark = text.find("%LPD*%").unwrap();
    let clear = text.find("%LPC*%").unwrap();

    assert!(dark < clear);
    assert_eq!(text.matches("%TO.N,GND*%").count(), 2);
    assert_eq!(text.matches("%TD.N*%").count(), 2);
    assert_eq!(text.matches("G36*").count(), 2);
}

#[test]
fn test_arc_region_with_single_quadrant() {
    let mut layer = copper().build().unwrap();
    let f = layer.format();
    let quarter = Segment::arc(
        f.vector(1.0, 0.0),
        f.vector(0.0, 1.0),
        f.vector(0.0, 0.0),
        InterpMode::CounterClockwise,
    )
    .unwrap()
    .with_quadrant(QuadrantMode::Single);
    let back = Segment::line(f.vector(0.0, 1.0), f.vector(0.0, 0.0));
    let close = Segment::line(f.vector(0.0, 0.0), f.vector(1.0, 0.0));

    layer
        .append(Region::new([quarter, back, close]).with_polarity(Polarity::Dark))
        .unwrap();

    let text = layer.render().unwrap();
    assert!(text.contains("G03*\nG74*\n"));
    assert!(text.contains("X00000000Y01000000I01000000J00000000D01*"));
    assert!(text.contains("G01*\nX00000000Y00000000D01*"));
}

#[test]
fn test_project_id_guid_is_derived() {
    let layer = copper()
        .with_project(ProjectId::new("panel", "B"))
        .build()
        .unwrap();
    let text = layer.render().unwrap();
    let guid = checksum::project_guid("panel", "B");

    assert!(text.contains(&format!("%TF.ProjectId,panel,{guid},B*%")));
}

#[test]
fn test_write_to_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copper.gbr");

    let layer = copper().build().unwrap();
    layer.write_to_path(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(checksum::verify(&text));
}

#[test]
fn test_write_to_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("copper.gbr");

    let layer = copper().build().unwrap();
    assert!(matches!(
        layer.write_to_path(&path),
        Err(PhotoplotError::Io(_))
    ));
}
