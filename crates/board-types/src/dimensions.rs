use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Vec2Nm;

/// Placement of a dimension's label text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionText {
    pub position: Vec2Nm,
}

/// Measurement axis of an orthogonal dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrientation {
    Horizontal,
    Vertical,
}

impl Default for AxisOrientation {
    fn default() -> Self {
        AxisOrientation::Horizontal
    }
}

/// A dimension measured along the line between its two reference points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedDimension {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start: Vec2Nm,
    pub end: Vec2Nm,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub text: DimensionText,
}

/// A dimension measured along one workplane axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthogonalDimension {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start: Vec2Nm,
    pub end: Vec2Nm,
    #[serde(default)]
    pub orientation: AxisOrientation,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub text: DimensionText,
}

/// An arrow from a reference point to free-form label text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderDimension {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start: Vec2Nm,
    pub end: Vec2Nm,
    #[serde(default)]
    pub override_text: String,
    #[serde(default)]
    pub text: DimensionText,
}

/// A cross marker at a circle or arc center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterDimension {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub center: Vec2Nm,
    pub end: Vec2Nm,
}

/// A radius callout on a circle or arc. Ignored by the mapper (it references
/// curves, not points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialDimension {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start: Vec2Nm,
    pub end: Vec2Nm,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub text: DimensionText,
}

/// A dimension marker on the board, in the fixture wire form
/// `{"type": "aligned", "proto": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "proto", rename_all = "lowercase")]
pub enum Dimension {
    Aligned(AlignedDimension),
    Orthogonal(OrthogonalDimension),
    Leader(LeaderDimension),
    Center(CenterDimension),
    Radial(RadialDimension),
}

impl Dimension {
    pub fn id(&self) -> Uuid {
        match self {
            Dimension::Aligned(d) => d.id,
            Dimension::Orthogonal(d) => d.id,
            Dimension::Leader(d) => d.id,
            Dimension::Center(d) => d.id,
            Dimension::Radial(d) => d.id,
        }
    }

    /// The prefix text, for marker kinds that carry one.
    pub fn prefix(&self) -> Option<&str> {
        match self {
            Dimension::Aligned(d) => Some(&d.prefix),
            Dimension::Orthogonal(d) => Some(&d.prefix),
            Dimension::Radial(d) => Some(&d.prefix),
            Dimension::Leader(_) | Dimension::Center(_) => None,
        }
    }

    /// The suffix text, for marker kinds that carry one.
    pub fn suffix(&self) -> Option<&str> {
        match self {
            Dimension::Aligned(d) => Some(&d.suffix),
            Dimension::Orthogonal(d) => Some(&d.suffix),
            Dimension::Radial(d) => Some(&d.suffix),
            Dimension::Leader(_) | Dimension::Center(_) => None,
        }
    }

    pub fn override_text(&self) -> Option<&str> {
        match self {
            Dimension::Leader(d) => Some(&d.override_text),
            _ => None,
        }
    }

    /// First reference point. Center markers anchor on their `center` field.
    pub fn start(&self) -> Vec2Nm {
        match self {
            Dimension::Aligned(d) => d.start,
            Dimension::Orthogonal(d) => d.start,
            Dimension::Leader(d) => d.start,
            Dimension::Center(d) => d.center,
            Dimension::Radial(d) => d.start,
        }
    }

    pub fn end(&self) -> Vec2Nm {
        match self {
            Dimension::Aligned(d) => d.end,
            Dimension::Orthogonal(d) => d.end,
            Dimension::Leader(d) => d.end,
            Dimension::Center(d) => d.end,
            Dimension::Radial(d) => d.end,
        }
    }

    pub fn text_position(&self) -> Vec2Nm {
        match self {
            Dimension::Aligned(d) => d.text.position,
            Dimension::Orthogonal(d) => d.text.position,
            Dimension::Leader(d) => d.text.position,
            Dimension::Center(d) => d.center,
            Dimension::Radial(d) => d.text.position,
        }
    }

    pub fn set_start(&mut self, v: Vec2Nm) {
        match self {
            Dimension::Aligned(d) => d.start = v,
            Dimension::Orthogonal(d) => d.start = v,
            Dimension::Leader(d) => d.start = v,
            Dimension::Center(d) => d.center = v,
            Dimension::Radial(d) => d.start = v,
        }
    }

    pub fn set_end(&mut self, v: Vec2Nm) {
        match self {
            Dimension::Aligned(d) => d.end = v,
            Dimension::Orthogonal(d) => d.end = v,
            Dimension::Leader(d) => d.end = v,
            Dimension::Center(d) => d.end = v,
            Dimension::Radial(d) => d.end = v,
        }
    }

    pub fn set_text_position(&mut self, v: Vec2Nm) {
        match self {
            Dimension::Aligned(d) => d.text.position = v,
            Dimension::Orthogonal(d) => d.text.position = v,
            Dimension::Leader(d) => d.text.position = v,
            Dimension::Center(_) => {}
            Dimension::Radial(d) => d.text.position = v,
        }
    }
}
