//! Enumerations shared by the command model and the graphics state.
//!
//! Each type renders to the letters the target format expects and parses from
//! a lowercase name. Parsing an unrecognized name fails with
//! [`Error::InvalidMode`].

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::error::Error;

/// Linear unit of every coordinate in a file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Inch,
    Millimeter,
}

impl Unit {
    /// Returns the unit code used by the unit command.
    pub fn code(self) -> &'static str {
        match self {
            Self::Inch => "IN",
            Self::Millimeter => "MM",
        }
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inch" | "in" => Ok(Self::Inch),
            "millimeter" | "mm" => Ok(Self::Millimeter),
            _ => Err(Error::invalid_mode("unit", s)),
        }
    }
}

/// How the next interpolation connects the current point to its target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpMode {
    /// Straight line.
    #[default]
    Linear,
    /// Circular arc, clockwise.
    Clockwise,
    /// Circular arc, counterclockwise.
    CounterClockwise,
}

impl InterpMode {
    /// Returns `true` for both circular modes.
    pub fn is_arc(self) -> bool {
        matches!(self, Self::Clockwise | Self::CounterClockwise)
    }
}

impl FromStr for InterpMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "clockwise" | "cw" => Ok(Self::Clockwise),
            "counterclockwise" | "ccw" => Ok(Self::CounterClockwise),
            _ => Err(Error::invalid_mode("interpolation", s)),
        }
    }
}

impl fmt::Display for InterpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Clockwise => write!(f, "clockwise"),
            Self::CounterClockwise => write!(f, "counterclockwise"),
        }
    }
}

/// Whether arc center offsets are unsigned (single) or signed (multi).
///
/// [`QuadrantMode::Auto`] is only a request: it resolves to multi-quadrant for
/// arcs and to "not applicable" for linear interpolation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadrantMode {
    Single,
    Multi,
    #[default]
    Auto,
}

impl FromStr for QuadrantMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            "auto" => Ok(Self::Auto),
            _ => Err(Error::invalid_mode("quadrant", s)),
        }
    }
}

impl fmt::Display for QuadrantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Multi => write!(f, "multi"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Dark adds material, clear removes it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    #[default]
    Dark,
    Clear,
}

impl Polarity {
    /// Returns the opposite polarity.
    pub fn invert(self) -> Self {
        match self {
            Self::Dark => Self::Clear,
            Self::Clear => Self::Dark,
        }
    }

    /// Returns the letter used by the load-polarity command.
    pub fn code(self) -> &'static str {
        match self {
            Self::Dark => "D",
            Self::Clear => "C",
        }
    }
}

impl FromStr for Polarity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "clear" => Ok(Self::Clear),
            _ => Err(Error::invalid_mode("polarity", s)),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Clear => write!(f, "clear"),
        }
    }
}

/// Mirroring applied to subsequent objects by the load-mirror command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mirror {
    #[default]
    None,
    X,
    Y,
    XY,
}

impl Mirror {
    /// Returns the code used by the load-mirror command.
    pub fn code(self) -> &'static str {
        match self {
            Self::None => "N",
            Self::X => "X",
            Self::Y => "Y",
            Self::XY => "XY",
        }
    }
}

impl FromStr for Mirror {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "xy" => Ok(Self::XY),
            _ => Err(Error::invalid_mode("mirror", s)),
        }
    }
}
