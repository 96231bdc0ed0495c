//! The active drawing tool.

use serde::{Deserialize, Serialize};

use crate::doc::ElementKind;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Pan the viewport.
    Hand,
    Frame,
    Rectangle,
    Ellipse,
    Polygon,
    Star,
    Line,
    Arrow,
    /// Freehand polyline.
    Pen,
    /// Bezier path with handles.
    Bezier,
    Connector,
    Text,
    Image,
}

impl Tool {
    /// Kind of element this tool creates on commit, if any.
    #[must_use]
    pub fn creates(self) -> Option<ElementKind> {
        match self {
            Self::Select | Self::Hand => None,
            Self::Frame => Some(ElementKind::Frame),
            Self::Rectangle => Some(ElementKind::Rectangle),
            Self::Ellipse => Some(ElementKind::Ellipse),
            Self::Polygon => Some(ElementKind::Polygon),
            Self::Star => Some(ElementKind::Star),
            Self::Line => Some(ElementKind::Line),
            Self::Arrow => Some(ElementKind::Arrow),
            Self::Pen => Some(ElementKind::Path),
            Self::Bezier => Some(ElementKind::Bezier),
            Self::Connector => Some(ElementKind::Connector),
            Self::Text => Some(ElementKind::Text),
            Self::Image => Some(ElementKind::Image),
        }
    }
}
