//! Fixed-point coordinate values.
//!
//! The target format carries coordinates as integers with an implicit decimal
//! point. This module provides the types that hold and render those values.
//!
//! # Overview
//!
//! - [`CoordinateFormat`] - Number of integer and decimal digits of every coordinate
//! - [`Scalar`] - A signed fixed-point number bound to one [`CoordinateFormat`]
//! - [`Vector`] - A pair of [`Scalar`]s rendered with a pair of axis prefixes
//!
//! # Example
//!
//! ```
//! # use photoplot_core::numeric::{CoordinateFormat, POSITION_AXES};
//! let format = CoordinateFormat::new(2, 6).unwrap();
//! let point = format.vector(1.5, -0.25);
//!
//! assert_eq!(point.render(POSITION_AXES), "X01500000Y-00250000");
//! ```
//!
//! Every value remembers the format it was built under. Combining values of
//! different formats is a [`Error::Configuration`] error instead of a silent
//! rescale.

use std::fmt;

use crate::error::{Error, Result};

/// Axis prefixes of an absolute position (`X`, `Y`).
pub const POSITION_AXES: [char; 2] = ['X', 'Y'];

/// Axis prefixes of an arc center offset (`I`, `J`).
pub const OFFSET_AXES: [char; 2] = ['I', 'J'];

/// Number of integer and decimal digits used for every coordinate of a file.
///
/// Rendered as two adjacent digits, e.g. `26` for two integer and six decimal
/// digits. Declared once per file by the coordinate-format command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateFormat {
    integer_digits: u8,
    decimal_digits: u8,
}

impl CoordinateFormat {
    /// Creates a coordinate format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] unless `integer_digits` is in `1..=6`
    /// and `decimal_digits` is in `4..=6`.
    pub fn new(integer_digits: u8, decimal_digits: u8) -> Result<Self> {
        if !(1..=6).contains(&integer_digits) {
            return Err(Error::Configuration(format!(
                "integer digits must be in 1..=6, got {integer_digits}"
            )));
        }
        if !(4..=6).contains(&decimal_digits) {
            return Err(Error::Configuration(format!(
                "decimal digits must be in 4..=6, got {decimal_digits}"
            )));
        }

        Ok(Self {
            integer_digits,
            decimal_digits,
        })
    }

    /// Returns the number of integer digits.
    pub fn integer_digits(self) -> u8 {
        self.integer_digits
    }

    /// Returns the number of decimal digits.
    pub fn decimal_digits(self) -> u8 {
        self.decimal_digits
    }

    /// Total rendered width of an unsigned coordinate.
    pub fn width(self) -> usize {
        usize::from(self.integer_digits) + usize::from(self.decimal_digits)
    }

    /// Largest raw magnitude that still renders in [`width`](Self::width) digits.
    pub fn max_raw(self) -> u64 {
        10u64.pow(self.width() as u32) - 1
    }

    /// Number of internal units per real unit.
    fn scale_factor(self) -> f64 {
        10f64.powi(i32::from(self.decimal_digits))
    }

    /// Builds a [`Scalar`] from a real value in this format.
    pub fn scalar(self, value: f64) -> Scalar {
        Scalar::new(value, self)
    }

    /// Builds a [`Vector`] from real coordinates in this format.
    pub fn vector(self, x: f64, y: f64) -> Vector {
        Vector::new(x, y, self)
    }

    /// Renders the format as its two-digit code, e.g. `26`.
    pub fn render(self) -> String {
        format!("{}{}", self.integer_digits, self.decimal_digits)
    }
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// A signed fixed-point number.
///
/// Stored as `real_value * 10^decimal_digits` rounded to the nearest integer.
/// Two scalars are equal only if both the stored integer and the format match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scalar {
    raw: i64,
    format: CoordinateFormat,
}

impl Scalar {
    /// Creates a scalar from a real value, rounding to the nearest internal unit.
    pub fn new(value: f64, format: CoordinateFormat) -> Self {
        Self {
            raw: (value * format.scale_factor()).round() as i64,
            format,
        }
    }

    /// Creates a scalar from an already scaled integer value.
    pub fn from_raw(raw: i64, format: CoordinateFormat) -> Self {
        Self { raw, format }
    }

    /// Returns the scaled integer value.
    pub fn raw(self) -> i64 {
        self.raw
    }

    /// Returns the format this scalar was built under.
    pub fn format(self) -> CoordinateFormat {
        self.format
    }

    /// Returns the real value.
    pub fn to_f64(self) -> f64 {
        self.raw as f64 / self.format.scale_factor()
    }

    /// Checks that `other` was built under the same format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a format mismatch.
    pub fn ensure_compatible(self, other: Scalar) -> Result<()> {
        if self.format == other.format {
            Ok(())
        } else {
            Err(Error::Configuration(format!(
                "cannot combine values in coordinate formats {} and {}",
                self.format, other.format
            )))
        }
    }

    /// Adds two scalars of the same format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a format mismatch.
    pub fn checked_add(self, other: Scalar) -> Result<Self> {
        self.ensure_compatible(other)?;
        Ok(Self::from_raw(self.raw + other.raw, self.format))
    }

    /// Subtracts `other` from this scalar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a format mismatch.
    pub fn checked_sub(self, other: Scalar) -> Result<Self> {
        self.ensure_compatible(other)?;
        Ok(Self::from_raw(self.raw - other.raw, self.format))
    }

    /// Checks that this scalar was built under `format` and renders within
    /// its declared width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a format mismatch or if the value
    /// needs more integer digits than `format` declares.
    pub fn ensure_in(self, format: CoordinateFormat) -> Result<()> {
        if self.format != format {
            return Err(Error::Configuration(format!(
                "value {} is in coordinate format {}, expected {format}",
                self.to_f64(),
                self.format
            )));
        }
        if self.raw.unsigned_abs() > format.max_raw() {
            return Err(Error::Configuration(format!(
                "value {} does not fit {} integer digits",
                self.to_f64(),
                format.integer_digits()
            )));
        }
        Ok(())
    }

    /// Multiplies by a plain real, rounding to the nearest internal unit.
    pub fn scale(self, factor: f64) -> Self {
        Self::from_raw((self.raw as f64 * factor).round() as i64, self.format)
    }

    /// Divides by a plain real, rounding to the nearest internal unit.
    pub fn divide(self, divisor: f64) -> Self {
        Self::from_raw((self.raw as f64 / divisor).round() as i64, self.format)
    }

    /// Returns the absolute value.
    pub fn abs(self) -> Self {
        Self::from_raw(self.raw.abs(), self.format)
    }

    /// Returns `1` for zero and positive values, `-1` otherwise.
    ///
    /// Zero counts as non-negative.
    pub fn sign(self) -> i8 {
        if self.raw >= 0 { 1 } else { -1 }
    }

    /// Renders the fixed-width, zero-padded form without a decimal point.
    ///
    /// A leading `-` is emitted only for negative values. A value wider than
    /// the format renders with all its digits; [`ensure_in`](Self::ensure_in)
    /// rejects such values before they reach a file.
    pub fn render(self) -> String {
        let sign = if self.sign() < 0 { "-" } else { "" };
        format!(
            "{sign}{:0width$}",
            self.raw.unsigned_abs(),
            width = self.format.width()
        )
    }

    /// Parses the rendered form back into a scalar of the given format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `text` is not an optionally signed
    /// run of digits.
    pub fn parse(text: &str, format: CoordinateFormat) -> Result<Self> {
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Configuration(format!(
                "`{text}` is not a fixed-point coordinate"
            )));
        }

        let magnitude: i64 = digits.parse().map_err(|err| {
            Error::Configuration(format!("`{text}` is out of coordinate range: {err}"))
        })?;

        let raw = if negative { -magnitude } else { magnitude };
        Ok(Self::from_raw(raw, format))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// An ordered pair of [`Scalar`]s sharing one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    x: Scalar,
    y: Scalar,
}

impl Vector {
    /// Creates a vector from real coordinates.
    pub fn new(x: f64, y: f64, format: CoordinateFormat) -> Self {
        Self {
            x: Scalar::new(x, format),
            y: Scalar::new(y, format),
        }
    }

    /// Creates a vector from two scalars.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the scalars use different formats.
    pub fn from_scalars(x: Scalar, y: Scalar) -> Result<Self> {
        x.ensure_compatible(y)?;
        Ok(Self { x, y })
    }

    /// Returns the x component.
    pub fn x(self) -> Scalar {
        self.x
    }

    /// Returns the y component.
    pub fn y(self) -> Scalar {
        self.y
    }

    /// Returns the format of both components.
    pub fn format(self) -> CoordinateFormat {
        self.x.format()
    }

    /// Checks both components with [`Scalar::ensure_in`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a format mismatch or an overwide
    /// component.
    pub fn ensure_in(self, format: CoordinateFormat) -> Result<()> {
        self.x.ensure_in(format)?;
        self.y.ensure_in(format)
    }

    /// Component-wise addition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a format mismatch.
    pub fn checked_add(self, other: Vector) -> Result<Self> {
        Ok(Self {
            x: self.x.checked_add(other.x)?,
            y: self.y.checked_add(other.y)?,
        })
    }

    /// Component-wise subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a format mismatch.
    pub fn checked_sub(self, other: Vector) -> Result<Self> {
        Ok(Self {
            x: self.x.checked_sub(other.x)?,
            y: self.y.checked_sub(other.y)?,
        })
    }

    /// Multiplies both components by a plain real.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x.scale(factor),
            y: self.y.scale(factor),
        }
    }

    /// Divides both components by a plain real.
    pub fn divide(self, divisor: f64) -> Self {
        Self {
            x: self.x.divide(divisor),
            y: self.y.divide(divisor),
        }
    }

    /// Component-wise absolute value.
    pub fn abs(self) -> Self {
        Self {
            x: self.x.abs(),
            y: self.y.abs(),
        }
    }

    /// Renders both components, each preceded by its axis prefix.
    pub fn render(self, axes: [char; 2]) -> String {
        format!(
            "{}{}{}{}",
            axes[0],
            self.x.render(),
            axes[1],
            self.y.render()
        )
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x.to_f64(), self.y.to_f64())
    }
}
