//! Document model: design elements, their paint, and sparse updates.
//!
//! This module defines what is on the canvas (`Element`, `Shape`), the paint
//! and effect attributes every element carries (`Fill`, `Stroke`, `Shadow`,
//! `BlendMode`), and a sparse-update type for incremental edits
//! (`ElementPatch`).
//!
//! Kind-specific data lives in the `Shape` sum type, flattened into the
//! element on the wire so an element serializes as a single JSON object keyed
//! by `type`. Point lists and group children are stored relative to the
//! owning element's origin, so moving an element never touches its payload.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{Bounds, Point};

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Identifier of a session participant (socket id or user id).
pub type ParticipantId = String;

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// Milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

// =============================================================
// Kinds
// =============================================================

/// Discriminant of an element, mirroring the `type` key on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Frame,
    Rectangle,
    Ellipse,
    Polygon,
    Star,
    Line,
    Arrow,
    Path,
    Bezier,
    Connector,
    Text,
    Image,
    Group,
    Component,
    Instance,
}

impl ElementKind {
    /// Every kind, in toolbar order.
    pub const ALL: [ElementKind; 15] = [
        Self::Frame,
        Self::Rectangle,
        Self::Ellipse,
        Self::Polygon,
        Self::Star,
        Self::Line,
        Self::Arrow,
        Self::Path,
        Self::Bezier,
        Self::Connector,
        Self::Text,
        Self::Image,
        Self::Group,
        Self::Component,
        Self::Instance,
    ];

    /// Human-readable label, used as the default layer name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Frame => "Frame",
            Self::Rectangle => "Rectangle",
            Self::Ellipse => "Ellipse",
            Self::Polygon => "Polygon",
            Self::Star => "Star",
            Self::Line => "Line",
            Self::Arrow => "Arrow",
            Self::Path => "Path",
            Self::Bezier => "Bezier",
            Self::Connector => "Connector",
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Group => "Group",
            Self::Component => "Component",
            Self::Instance => "Instance",
        }
    }

    /// Whether elements of this kind are drawn as open strokes with no fill.
    #[must_use]
    pub fn is_stroke_only(self) -> bool {
        matches!(self, Self::Line | Self::Arrow | Self::Path | Self::Bezier | Self::Connector)
    }
}

// =============================================================
// Paint and effects
// =============================================================

/// A colour stop in a gradient. `offset` runs from 0.0 to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
}

/// Interior paint of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Fill {
    None,
    Solid { color: String, opacity: f64 },
    LinearGradient { stops: Vec<GradientStop>, angle: f64, opacity: f64 },
    RadialGradient { stops: Vec<GradientStop>, opacity: f64 },
}

impl Fill {
    #[must_use]
    pub fn solid(color: &str) -> Self {
        Self::Solid { color: color.to_owned(), opacity: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DashStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Outline paint of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    #[serde(default)]
    pub dash: DashStyle,
    #[serde(default)]
    pub cap: LineCap,
    #[serde(default)]
    pub join: LineJoin,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: "#1F1A17".to_owned(),
            width: 1.0,
            dash: DashStyle::Solid,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
        }
    }
}

/// Drop shadow drawn beneath an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    #[serde(default)]
    pub spread: f64,
}

/// Compositing mode against the elements painted beneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

// =============================================================
// Kind-specific data
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowHead {
    None,
    #[default]
    Triangle,
    Open,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// An anchor on a bezier path with optional control handles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BezierPoint {
    pub anchor: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_in: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_out: Option<Point>,
}

/// Kind-specific payload of an element, keyed by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Shape {
    /// Container that may clip its contents.
    Frame { clip_content: bool },
    Rectangle { corner_radius: f64 },
    /// Ellipse inscribed within the bounding box.
    Ellipse,
    /// Regular polygon inscribed within the bounding box.
    Polygon { sides: u32 },
    /// Star with `num_points` tips; `inner_radius` is the inner-to-outer ratio.
    Star { num_points: u32, inner_radius: f64 },
    /// Straight segment between two points relative to the element origin.
    Line { start: Point, end: Point },
    Arrow { start: Point, end: Point, head: ArrowHead },
    /// Polyline through points relative to the element origin.
    Path { points: Vec<Point>, closed: bool },
    Bezier { points: Vec<BezierPoint>, closed: bool },
    /// Edge between two elements, routed through optional waypoints.
    Connector { from: Option<ElementId>, to: Option<ElementId>, waypoints: Vec<Point> },
    Text {
        content: String,
        font_family: String,
        font_size: f64,
        font_weight: u16,
        line_height: f64,
        align: TextAlign,
    },
    Image { src: String },
    /// Children are stored with coordinates relative to the group origin.
    Group { children: Vec<Element> },
    Component { description: String, children: Vec<Element> },
    /// Reference to the component this instance was stamped from.
    Instance { component_id: ElementId },
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Frame { .. } => ElementKind::Frame,
            Self::Rectangle { .. } => ElementKind::Rectangle,
            Self::Ellipse => ElementKind::Ellipse,
            Self::Polygon { .. } => ElementKind::Polygon,
            Self::Star { .. } => ElementKind::Star,
            Self::Line { .. } => ElementKind::Line,
            Self::Arrow { .. } => ElementKind::Arrow,
            Self::Path { .. } => ElementKind::Path,
            Self::Bezier { .. } => ElementKind::Bezier,
            Self::Connector { .. } => ElementKind::Connector,
            Self::Text { .. } => ElementKind::Text,
            Self::Image { .. } => ElementKind::Image,
            Self::Group { .. } => ElementKind::Group,
            Self::Component { .. } => ElementKind::Component,
            Self::Instance { .. } => ElementKind::Instance,
        }
    }

    /// Default payload for a freshly drawn element of `kind` inside `bounds`.
    ///
    /// Lines and arrows run corner to corner across the box.
    #[must_use]
    pub fn default_for(kind: ElementKind, bounds: Bounds) -> Self {
        let diagonal = Point::new(bounds.width, bounds.height);
        match kind {
            ElementKind::Frame => Self::Frame { clip_content: true },
            ElementKind::Rectangle => Self::Rectangle { corner_radius: 0.0 },
            ElementKind::Ellipse => Self::Ellipse,
            ElementKind::Polygon => Self::Polygon { sides: 6 },
            ElementKind::Star => Self::Star { num_points: 5, inner_radius: 0.5 },
            ElementKind::Line => Self::Line { start: Point::default(), end: diagonal },
            ElementKind::Arrow => Self::Arrow { start: Point::default(), end: diagonal, head: ArrowHead::Triangle },
            ElementKind::Path => Self::Path { points: Vec::new(), closed: false },
            ElementKind::Bezier => Self::Bezier { points: Vec::new(), closed: false },
            ElementKind::Connector => Self::Connector { from: None, to: None, waypoints: Vec::new() },
            ElementKind::Text => Self::Text {
                content: String::new(),
                font_family: "Inter".to_owned(),
                font_size: 16.0,
                font_weight: 400,
                line_height: 1.2,
                align: TextAlign::Left,
            },
            ElementKind::Image => Self::Image { src: String::new() },
            ElementKind::Group => Self::Group { children: Vec::new() },
            ElementKind::Component => Self::Component { description: String::new(), children: Vec::new() },
            ElementKind::Instance => Self::Instance { component_id: Uuid::nil() },
        }
    }

    /// Nested elements carried by groups and components.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        match self {
            Self::Group { children } | Self::Component { children, .. } => children,
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Element>> {
        match self {
            Self::Group { children } | Self::Component { children, .. } => Some(children),
            _ => None,
        }
    }
}

// =============================================================
// Element
// =============================================================

/// A design element as stored in the document and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier, stable for the session.
    pub id: ElementId,
    /// Display name shown in the layers panel.
    pub name: String,
    /// Left edge of the bounding box in world coordinates.
    pub x: f64,
    /// Top edge of the bounding box in world coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the bounding-box center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    pub fill: Fill,
    pub stroke: Stroke,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    /// Layer blur radius in world units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Overall opacity from 0.0 to 1.0.
    pub opacity: f64,
    pub visible: bool,
    pub locked: bool,
    #[serde(flatten)]
    pub shape: Shape,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: ParticipantId,
    pub last_modified_by: ParticipantId,
}

impl Element {
    /// Build a new element with a fresh id and kind-appropriate defaults.
    ///
    /// `bounds` is normalized first, so a box built from a reversed drag is
    /// accepted as-is.
    #[must_use]
    pub fn new(shape: Shape, bounds: Bounds, created_by: &str) -> Self {
        let bounds = bounds.normalized();
        let kind = shape.kind();
        let now = now_ms();
        let fill = match kind {
            ElementKind::Frame => Fill::solid("#FFFFFF"),
            ElementKind::Text | ElementKind::Image | ElementKind::Group => Fill::None,
            k if k.is_stroke_only() => Fill::None,
            _ => Fill::solid("#D9D9D9"),
        };
        let stroke = if kind == ElementKind::Text { Stroke { width: 0.0, ..Stroke::default() } } else { Stroke::default() };
        Self {
            id: Uuid::new_v4(),
            name: kind.label().to_owned(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            rotation: None,
            fill,
            stroke,
            shadow: None,
            blur: None,
            blend_mode: BlendMode::Normal,
            opacity: 1.0,
            visible: true,
            locked: false,
            shape,
            created_at: now,
            updated_at: now,
            created_by: created_by.to_owned(),
            last_modified_by: created_by.to_owned(),
        }
    }

    /// Build a new element of `kind` with the default payload for that kind.
    #[must_use]
    pub fn of_kind(kind: ElementKind, bounds: Bounds, created_by: &str) -> Self {
        let bounds = bounds.normalized();
        Self::new(Shape::default_for(kind, bounds), bounds, created_by)
    }

    /// Build a text element with the given content.
    #[must_use]
    pub fn text(content: &str, bounds: Bounds, created_by: &str) -> Self {
        let mut el = Self::of_kind(ElementKind::Text, bounds, created_by);
        if let Shape::Text { content: c, .. } = &mut el.shape {
            c.push_str(content);
        }
        el
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    /// Axis-aligned bounding box, normalized.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height).normalized()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Whether pointer hit-testing should consider this element.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.visible && !self.locked
    }

    /// Nested elements of a group or component; empty for other kinds.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        self.shape.children()
    }

    /// Identifiers of the direct children of a group or component.
    #[must_use]
    pub fn child_ids(&self) -> Vec<ElementId> {
        self.children().iter().map(|c| c.id).collect()
    }

    /// Take the children out of a group or component, leaving it empty.
    pub fn take_children(&mut self) -> Vec<Element> {
        self.shape.children_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Deep copy with fresh identifiers for this element and every descendant.
    #[must_use]
    pub fn duplicate(&self, by: &str) -> Element {
        let mut copy = self.clone();
        copy.refresh_identity(by, now_ms());
        copy
    }

    fn refresh_identity(&mut self, by: &str, now: i64) {
        self.id = Uuid::new_v4();
        self.created_at = now;
        self.updated_at = now;
        by.clone_into(&mut self.created_by);
        by.clone_into(&mut self.last_modified_by);
        if let Some(children) = self.shape.children_mut() {
            for child in children {
                child.refresh_identity(by, now);
            }
        }
    }

    /// Merge a sparse update into this element. Bookkeeping is left to the caller.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(ref name) = patch.name {
            name.clone_into(&mut self.name);
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = w;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
        if let Some(r) = patch.rotation {
            self.rotation = Some(r);
        }
        if let Some(ref fill) = patch.fill {
            self.fill = fill.clone();
        }
        if let Some(ref stroke) = patch.stroke {
            self.stroke = stroke.clone();
        }
        if let Some(ref shadow) = patch.shadow {
            self.shadow = Some(shadow.clone());
        }
        if let Some(blur) = patch.blur {
            self.blur = Some(blur);
        }
        if let Some(mode) = patch.blend_mode {
            self.blend_mode = mode;
        }
        if let Some(o) = patch.opacity {
            self.opacity = o;
        }
        if let Some(v) = patch.visible {
            self.visible = v;
        }
        if let Some(l) = patch.locked {
            self.locked = l;
        }
        if let Some(ref shape) = patch.shape {
            self.shape = shape.clone();
        }
    }
}

// =============================================================
// Sparse updates
// =============================================================

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Replacement kind-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
}

impl ElementPatch {
    /// Patch that moves an element's origin.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// Patch that sets the whole bounding box.
    #[must_use]
    pub fn bounds(b: Bounds) -> Self {
        Self { x: Some(b.x), y: Some(b.y), width: Some(b.width), height: Some(b.height), ..Default::default() }
    }

    /// Patch that overwrites every mutable attribute with `el`'s values.
    #[must_use]
    pub fn from_element(el: &Element) -> Self {
        Self {
            name: Some(el.name.clone()),
            x: Some(el.x),
            y: Some(el.y),
            width: Some(el.width),
            height: Some(el.height),
            rotation: el.rotation,
            fill: Some(el.fill.clone()),
            stroke: Some(el.stroke.clone()),
            shadow: el.shadow.clone(),
            blur: el.blur,
            blend_mode: Some(el.blend_mode),
            opacity: Some(el.opacity),
            visible: Some(el.visible),
            locked: Some(el.locked),
            shape: Some(el.shape.clone()),
        }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether applying this patch may move or resize the element.
    #[must_use]
    pub fn touches_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }

    /// Fold a later patch into this one; fields set in `later` win.
    pub fn merge(&mut self, later: ElementPatch) {
        fn take<T>(slot: &mut Option<T>, later: Option<T>) {
            if later.is_some() {
                *slot = later;
            }
        }
        take(&mut self.name, later.name);
        take(&mut self.x, later.x);
        take(&mut self.y, later.y);
        take(&mut self.width, later.width);
        take(&mut self.height, later.height);
        take(&mut self.rotation, later.rotation);
        take(&mut self.fill, later.fill);
        take(&mut self.stroke, later.stroke);
        take(&mut self.shadow, later.shadow);
        take(&mut self.blur, later.blur);
        take(&mut self.blend_mode, later.blend_mode);
        take(&mut self.opacity, later.opacity);
        take(&mut self.visible, later.visible);
        take(&mut self.locked, later.locked);
        take(&mut self.shape, later.shape);
    }

    /// Clear every field that `other` also sets.
    ///
    /// Used when a remote write lands on an element with unsent local
    /// changes: the remote value has been applied last, so the local value
    /// for the same field must not be sent afterwards.
    pub fn yield_to(&mut self, other: &ElementPatch) {
        fn clear<T>(slot: &mut Option<T>, other: &Option<T>) {
            if other.is_some() {
                *slot = None;
            }
        }
        clear(&mut self.name, &other.name);
        clear(&mut self.x, &other.x);
        clear(&mut self.y, &other.y);
        clear(&mut self.width, &other.width);
        clear(&mut self.height, &other.height);
        clear(&mut self.rotation, &other.rotation);
        clear(&mut self.fill, &other.fill);
        clear(&mut self.stroke, &other.stroke);
        clear(&mut self.shadow, &other.shadow);
        clear(&mut self.blur, &other.blur);
        clear(&mut self.blend_mode, &other.blend_mode);
        clear(&mut self.opacity, &other.opacity);
        clear(&mut self.visible, &other.visible);
        clear(&mut self.locked, &other.locked);
        clear(&mut self.shape, &other.shape);
    }
}
