//! Renderable command records.
//!
//! A [`Command`] is one line of output. Commands come in two families:
//!
//! - **Function-code commands** end in `*`, e.g. `G01*`, `X0Y0D02*`, `D3000*`.
//! - **Extended commands** are wrapped in `%`, with data blocks delimited by
//!   `*`: `%<opcode><data0>*<data1>*...%`, e.g. `%MOIN*%`.
//!
//! Commands are immutable and render only from their own fields.
//!
//! # Example
//!
//! ```
//! # use photoplot_core::command::{Command, DCode};
//! # use photoplot_core::types::Polarity;
//! assert_eq!(Command::SelectAperture(DCode::new(3000)).render(), "D3000*");
//! assert_eq!(Command::LoadPolarity(Polarity::Clear).render(), "%LPC*%");
//! ```

use std::fmt;

use crate::{
    attribute::AttributeKind,
    error::{Error, Result},
    numeric::{CoordinateFormat, OFFSET_AXES, POSITION_AXES, Vector},
    types::{InterpMode, Mirror, Polarity, QuadrantMode, Unit},
};

/// Decimal places kept when rendering real-valued parameters.
pub const PARAM_PRECISION: i32 = 6;

/// The identifier that references an aperture definition, rendered `Dnn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DCode(u32);

impl DCode {
    /// Creates a D-code from its number.
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Returns the number after the `D`.
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

/// One line of a photoplot command stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // =========================================================================
    // Function-code commands
    // =========================================================================
    /// `D01`: interpolate from the current point to `target`. Arcs carry the
    /// center offset.
    Interpolate {
        target: Vector,
        offset: Option<Vector>,
    },
    /// `D02`: move to `target` without drawing.
    Move { target: Vector },
    /// `D03`: flash the current aperture at `target`.
    Flash { target: Vector },
    /// `Dnn`: make the aperture `Dnn` current.
    SelectAperture(DCode),
    /// `G01`/`G02`/`G03`.
    SetInterpolation(InterpMode),
    /// `G74`: single-quadrant arcs.
    SingleQuadrant,
    /// `G75`: multi-quadrant arcs.
    MultiQuadrant,
    /// `G36`.
    StartRegion,
    /// `G37`.
    EndRegion,
    /// `G04`.
    Comment(String),
    /// `M02`.
    EndOfFile,

    // =========================================================================
    // Extended commands
    // =========================================================================
    /// `MO`.
    SetUnit(Unit),
    /// `FSLA`.
    SetCoordinateFormat(CoordinateFormat),
    /// `AD`: defines aperture `dcode` from a standard template letter and an
    /// already joined parameter list.
    DefineAperture {
        dcode: DCode,
        template: char,
        params: String,
    },
    /// `AB` with a D-code: opens a block aperture.
    BeginBlockAperture(DCode),
    /// `AB` without data: closes the open block aperture.
    EndBlockAperture,
    /// `LP`.
    LoadPolarity(Polarity),
    /// `LM`.
    LoadMirror(Mirror),
    /// `LR`, degrees counterclockwise.
    LoadRotation(f64),
    /// `LS`.
    LoadScale(f64),
    /// `SR` with data: opens a step-and-repeat block.
    BeginStepRepeat {
        x_repeat: u32,
        y_repeat: u32,
        x_step: f64,
        y_step: f64,
    },
    /// `SR` without data: closes the step-and-repeat block.
    EndStepRepeat,
    /// `TF`/`TA`/`TO`, depending on `kind`.
    AddAttribute {
        kind: AttributeKind,
        name: String,
        values: Vec<String>,
    },
    /// `TD`: deletes one attribute by name, or all of them.
    DeleteAttribute(Option<String>),
}

impl Command {
    /// Builds the quadrant-select command for a resolved quadrant mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMode`] for [`QuadrantMode::Auto`], which must be
    /// resolved before it can be emitted.
    pub fn select_quadrant(mode: QuadrantMode) -> Result<Self> {
        match mode {
            QuadrantMode::Single => Ok(Self::SingleQuadrant),
            QuadrantMode::Multi => Ok(Self::MultiQuadrant),
            QuadrantMode::Auto => Err(Error::invalid_mode("quadrant", mode.to_string())),
        }
    }

    /// Returns `true` for commands rendered in the `%...%` form.
    pub fn is_extended(&self) -> bool {
        matches!(
            self,
            Self::SetUnit(_)
                | Self::SetCoordinateFormat(_)
                | Self::DefineAperture { .. }
                | Self::BeginBlockAperture(_)
                | Self::EndBlockAperture
                | Self::LoadPolarity(_)
                | Self::LoadMirror(_)
                | Self::LoadRotation(_)
                | Self::LoadScale(_)
                | Self::BeginStepRepeat { .. }
                | Self::EndStepRepeat
                | Self::AddAttribute { .. }
                | Self::DeleteAttribute(_)
        )
    }

    /// Renders the command as one line, without a line terminator.
    pub fn render(&self) -> String {
        match self {
            Self::Interpolate { target, offset } => {
                let offset = offset
                    .map(|offset| offset.render(OFFSET_AXES))
                    .unwrap_or_default();
                format!("{}{offset}D01*", target.render(POSITION_AXES))
            }
            Self::Move { target } => format!("{}D02*", target.render(POSITION_AXES)),
            Self::Flash { target } => format!("{}D03*", target.render(POSITION_AXES)),
            Self::SelectAperture(dcode) => format!("{dcode}*"),
            Self::SetInterpolation(mode) => match mode {
                InterpMode::Linear => "G01*".to_string(),
                InterpMode::Clockwise => "G02*".to_string(),
                InterpMode::CounterClockwise => "G03*".to_string(),
            },
            Self::SingleQuadrant => "G74*".to_string(),
            Self::MultiQuadrant => "G75*".to_string(),
            Self::StartRegion => "G36*".to_string(),
            Self::EndRegion => "G37*".to_string(),
            Self::Comment(text) => format!("G04 {}*", sanitize(text)),
            Self::EndOfFile => "M02*".to_string(),

            Self::SetUnit(unit) => extended("MO", &[unit.code().to_string()]),
            Self::SetCoordinateFormat(format) => {
                let digits = format.render();
                extended("FSLA", &[format!("X{digits}Y{digits}")])
            }
            Self::DefineAperture {
                dcode,
                template,
                params,
            } => extended("AD", &[format!("{dcode}{template},{params}")]),
            Self::BeginBlockAperture(dcode) => extended("AB", &[dcode.to_string()]),
            Self::EndBlockAperture => extended("AB", &[]),
            Self::LoadPolarity(polarity) => extended("LP", &[polarity.code().to_string()]),
            Self::LoadMirror(mirror) => extended("LM", &[mirror.code().to_string()]),
            Self::LoadRotation(degrees) => extended("LR", &[format_decimal(*degrees)]),
            Self::LoadScale(factor) => extended("LS", &[format_decimal(*factor)]),
            Self::BeginStepRepeat {
                x_repeat,
                y_repeat,
                x_step,
                y_step,
            } => extended(
                "SR",
                &[format!(
                    "X{x_repeat}Y{y_repeat}I{}J{}",
                    format_decimal(*x_step),
                    format_decimal(*y_step)
                )],
            ),
            Self::EndStepRepeat => extended("SR", &[]),
            Self::AddAttribute { kind, name, values } => {
                let mut field = sanitize(name);
                for value in values {
                    field.push(',');
                    field.push_str(&sanitize(value));
                }
                extended(kind.add_opcode(), &[field])
            }
            Self::DeleteAttribute(name) => match name {
                Some(name) => extended("TD", &[sanitize(name)]),
                None => extended("TD", &[]),
            },
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Destination of generated commands.
///
/// Attribute records and other collaborators only ever append to a sink; they
/// never inspect what was written before.
pub trait CommandSink {
    /// Appends one command.
    fn push_command(&mut self, command: Command);
}

impl CommandSink for Vec<Command> {
    fn push_command(&mut self, command: Command) {
        self.push(command);
    }
}

/// Renders a real parameter rounded to [`PARAM_PRECISION`] decimal places.
///
/// Trailing zeros are dropped, so `0.050` renders as `0.05` and `3.0` as `3`.
pub fn format_decimal(value: f64) -> String {
    let factor = 10f64.powi(PARAM_PRECISION);
    let rounded = (value * factor).round() / factor;
    // avoid rendering "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    rounded.to_string()
}

fn extended(opcode: &str, data: &[String]) -> String {
    let mut line = String::with_capacity(16);
    line.push('%');
    line.push_str(opcode);
    line.push_str(&data.join("*"));
    line.push_str("*%");
    line
}

/// Drops the two characters that delimit commands.
fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '*' | '%')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_26() -> CoordinateFormat {
        CoordinateFormat::new(2, 6).unwrap()
    }

    #[test]
    fn test_operation_commands() {
        let format = format_26();
        let target = format.vector(1.0, 0.5);

        assert_eq!(
            Command::Move { target }.render(),
            "X01000000Y00500000D02*"
        );
        assert_eq!(
            Command::Flash { target }.render(),
            "X01000000Y00500000D03*"
        );
        assert_eq!(
            Command::Interpolate {
                target,
                offset: None
            }
            .render(),
            "X01000000Y00500000D01*"
        );
        assert_eq!(
            Command::Interpolate {
                target,
                offset: Some(format.vector(-0.5, 0.0)),
            }
            .render(),
            "X01000000Y00500000I-00500000J00000000D01*"
        );
    }

    #[test]
    fn test_mode_commands() {
        assert_eq!(
            Command::SetInterpolation(InterpMode::Linear).render(),
            "G01*"
        );
        assert_eq!(
            Command::SetInterpolation(InterpMode::Clockwise).render(),
            "G02*"
        );
        assert_eq!(
            Command::SetInterpolation(InterpMode::CounterClockwise).render(),
            "G03*"
        );
        assert_eq!(Command::SingleQuadrant.render(), "G74*");
        assert_eq!(Command::MultiQuadrant.render(), "G75*");
        assert_eq!(Command::StartRegion.render(), "G36*");
        assert_eq!(Command::EndRegion.render(), "G37*");
        assert_eq!(Command::EndOfFile.render(), "M02*");
    }

    #[test]
    fn test_select_quadrant_rejects_auto() {
        assert_eq!(
            Command::select_quadrant(QuadrantMode::Single).unwrap(),
            Command::SingleQuadrant
        );
        assert_eq!(
            Command::select_quadrant(QuadrantMode::Multi).unwrap(),
            Command::MultiQuadrant
        );
        assert!(matches!(
            Command::select_quadrant(QuadrantMode::Auto),
            Err(Error::InvalidMode { .. })
        ));
    }

    #[test]
    fn test_comment_strips_delimiters() {
        assert_eq!(
            Command::Comment("Region: R1".to_string()).render(),
            "G04 Region: R1*"
        );
        assert_eq!(
            Command::Comment("50% *done*".to_string()).render(),
            "G04 50 done*"
        );
    }

    #[test]
    fn test_header_commands() {
        assert_eq!(Command::SetUnit(Unit::Inch).render(), "%MOIN*%");
        assert_eq!(Command::SetUnit(Unit::Millimeter).render(), "%MOMM*%");
        assert_eq!(
            Command::SetCoordinateFormat(format_26()).render(),
            "%FSLAX26Y26*%"
        );
    }

    #[test]
    fn test_aperture_commands() {
        let dcode = DCode::new(3001);
        assert_eq!(
            Command::DefineAperture {
                dcode,
                template: 'C',
                params: "0.05".to_string(),
            }
            .render(),
            "%ADD3001C,0.05*%"
        );
        assert_eq!(Command::BeginBlockAperture(dcode).render(), "%ABD3001*%");
        assert_eq!(Command::EndBlockAperture.render(), "%AB*%");
        assert_eq!(Command::SelectAperture(dcode).render(), "D3001*");
    }

    #[test]
    fn test_transform_commands() {
        assert_eq!(Command::LoadPolarity(Polarity::Dark).render(), "%LPD*%");
        assert_eq!(Command::LoadMirror(Mirror::XY).render(), "%LMXY*%");
        assert_eq!(Command::LoadRotation(45.0).render(), "%LR45*%");
        assert_eq!(Command::LoadScale(0.8).render(), "%LS0.8*%");
        assert_eq!(
            Command::BeginStepRepeat {
                x_repeat: 3,
                y_repeat: 2,
                x_step: 5.0,
                y_step: 4.25,
            }
            .render(),
            "%SRX3Y2I5J4.25*%"
        );
        assert_eq!(Command::EndStepRepeat.render(), "%SR*%");
    }

    #[test]
    fn test_attribute_commands() {
        let add = Command::AddAttribute {
            kind: AttributeKind::File,
            name: ".GenerationSoftware".to_string(),
            values: vec!["Vendor".into(), "App".into(), "1.0".into()],
        };
        assert_eq!(add.render(), "%TF.GenerationSoftware,Vendor,App,1.0*%");

        let object = Command::AddAttribute {
            kind: AttributeKind::Object,
            name: ".N".to_string(),
            values: vec!["GND".into()],
        };
        assert_eq!(object.render(), "%TO.N,GND*%");

        assert_eq!(
            Command::DeleteAttribute(Some(".N".to_string())).render(),
            "%TD.N*%"
        );
        assert_eq!(Command::DeleteAttribute(None).render(), "%TD*%");
    }

    #[test]
    fn test_is_extended() {
        assert!(Command::SetUnit(Unit::Inch).is_extended());
        assert!(Command::DeleteAttribute(None).is_extended());
        assert!(!Command::EndOfFile.is_extended());
        assert!(!Command::Comment(String::new()).is_extended());
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(0.05), "0.05");
        assert_eq!(format_decimal(3.0), "3");
        assert_eq!(format_decimal(0.1234567), "0.123457");
        assert_eq!(format_decimal(-0.0000001), "0");
    }

    #[test]
    fn test_vec_is_a_command_sink() {
        let mut sink: Vec<Command> = Vec::new();
        sink.push_command(Command::EndOfFile);
        assert_eq!(sink, vec![Command::EndOfFile]);
    }
}
