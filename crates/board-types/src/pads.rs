use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Vec2Nm;

/// Outline family of a pad stack layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadShapeKind {
    Circle,
    Rectangle,
    Oval,
    Trapezoid,
    RoundRect,
    ChamferedRect,
    Custom,
    Unknown,
}

impl Default for PadShapeKind {
    fn default() -> Self {
        PadShapeKind::Unknown
    }
}

/// Which corners of a chamfered-rectangle layer are cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChamferedCorners {
    #[serde(default)]
    pub top_left: bool,
    #[serde(default)]
    pub top_right: bool,
    #[serde(default)]
    pub bottom_left: bool,
    #[serde(default)]
    pub bottom_right: bool,
}

impl ChamferedCorners {
    pub fn all() -> Self {
        Self {
            top_left: true,
            top_right: true,
            bottom_left: true,
            bottom_right: true,
        }
    }
}

/// The copper outline of a pad on one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadStackLayer {
    pub shape: PadShapeKind,
    pub size: Vec2Nm,
    /// Full trapezoid delta vector; the non-zero component selects the skew
    /// axis.
    #[serde(default)]
    pub trapezoid_delta: Vec2Nm,
    /// Chamfer size as a fraction of the smaller side.
    #[serde(default)]
    pub chamfer_ratio: f64,
    #[serde(default)]
    pub chamfered_corners: ChamferedCorners,
    /// Anchor outline for `Custom` layers.
    #[serde(default)]
    pub custom_anchor_shape: PadShapeKind,
}

/// Per-layer pad geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PadStack {
    pub copper_layers: Vec<PadStackLayer>,
}

/// A footprint pad: a shared position plus one outline per copper layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub number: String,
    pub position: Vec2Nm,
    pub padstack: PadStack,
}
