use std::fmt;

use serde::Deserialize;

use photoplot_core::attribute::Attribute;

/// Board side a layer belongs to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Top,
    Inner,
    Bottom,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "Top",
            Self::Inner => "Inr",
            Self::Bottom => "Bot",
        })
    }
}

/// What a copper layer mostly carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopperType {
    Plane,
    Signal,
    Mixed,
    Hatched,
}

impl fmt::Display for CopperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plane => "Plane",
            Self::Signal => "Signal",
            Self::Mixed => "Mixed",
            Self::Hatched => "Hatched",
        })
    }
}

/// Layer span of a drill file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillSpan {
    #[default]
    Through,
    Blind,
    Buried,
}

/// Kind of holes in a drill file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillLabel {
    Drill,
    Route,
    Mixed,
}

impl fmt::Display for DrillLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Drill => "Drill",
            Self::Route => "Route",
            Self::Mixed => "Mixed",
        })
    }
}

/// Image polarity of a whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePolarity {
    Positive,
    Negative,
}

impl fmt::Display for FilePolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        })
    }
}

/// The physical aspect of the board a layer describes.
///
/// Drawn from `[layer.function]` tables by its `kind` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerKind {
    /// Board profile.
    Outline {
        #[serde(default)]
        plated: bool,
    },
    Copper {
        index: u32,
        #[serde(default)]
        side: Side,
        #[serde(default)]
        layer_type: Option<CopperType>,
    },
    PlatedDrill {
        from: u32,
        to: u32,
        #[serde(default)]
        span: DrillSpan,
        #[serde(default)]
        label: Option<DrillLabel>,
    },
    NonPlatedDrill {
        from: u32,
        to: u32,
        #[serde(default)]
        span: DrillSpan,
        #[serde(default)]
        label: Option<DrillLabel>,
    },
    Soldermask {
        #[serde(default)]
        side: Side,
        #[serde(default)]
        index: Option<u32>,
    },
    Legend {
        #[serde(default)]
        side: Side,
        #[serde(default)]
        index: Option<u32>,
    },
}

impl LayerKind {
    /// Default polarity of the file: soldermask is drawn negative.
    pub fn polarity(&self) -> FilePolarity {
        match self {
            Self::Soldermask { .. } => FilePolarity::Negative,
            _ => FilePolarity::Positive,
        }
    }

    /// Values of the `.FileFunction` attribute.
    pub fn file_function_values(&self) -> Vec<String> {
        let mut values = Vec::new();
        match self {
            Self::Outline { plated } => {
                values.push("Profile".to_string());
                values.push(if *plated { "P" } else { "NP" }.to_string());
            }
            Self::Copper {
                index,
                side,
                layer_type,
            } => {
                values.push("Copper".to_string());
                values.push(format!("L{index}"));
                values.push(side.to_string());
                values.extend(layer_type.map(|t| t.to_string()));
            }
            Self::PlatedDrill {
                from,
                to,
                span,
                label,
            } => {
                values.push("Plated".to_string());
                values.push(format!("L{from}"));
                values.push(format!("L{to}"));
                values.push(
                    match span {
                        DrillSpan::Through => "PTH",
                        DrillSpan::Blind => "Blind",
                        DrillSpan::Buried => "Buried",
                    }
                    .to_string(),
                );
                values.extend(label.map(|l| l.to_string()));
            }
            Self::NonPlatedDrill {
                from,
                to,
                span,
                label,
            } => {
                values.push("NonPlated".to_string());
                values.push(format!("L{from}"));
                values.push(format!("L{to}"));
                values.push(
                    match span {
                        DrillSpan::Through => "NPTH",
                        DrillSpan::Blind => "Blind",
                        DrillSpan::Buried => "Buried",
                    }
                    .to_string(),
                );
                values.extend(label.map(|l| l.to_string()));
            }
            Self::Soldermask { side, index } => {
                values.push("Soldermask".to_string());
                values.push(side.to_string());
                values.extend(index.map(|i| format!("L{i}")));
            }
            Self::Legend { side, index } => {
                values.push("Legend".to_string());
                values.push(side.to_string());
                values.extend(index.map(|i| format!("L{i}")));
            }
        }
        values
    }

    /// The `.FileFunction` file attribute.
    pub fn file_function(&self) -> Attribute {
        Attribute::file(".FileFunction", self.file_function_values())
    }
}
