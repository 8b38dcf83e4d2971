//! Core records for the workflow canvas.
//!
//! Nodes and connections are plain serializable values. Positions and sizes
//! are in canvas units; the viewport maps them to screen pixels. Nothing in
//! here refers back to UI objects, so the host can re-derive any view after
//! a mutation.

use crate::catalog::NodeKind;
use crate::id::{ConnectionId, NodeId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

// ─── Geometry ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Smallest rectangle covering every rect, or `None` for an empty set.
    pub fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        let mut any = false;

        for r in rects {
            any = true;
            min_x = min_x.min(r.x);
            min_y = min_y.min(r.y);
            max_x = max_x.max(r.right());
            max_y = max_y.max(r.bottom());
        }

        any.then(|| Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}

// ─── Colors & style overrides ────────────────────────────────────────────

/// RGBA color, 4 × f32 in [0.0, 1.0]. Serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let bytes = hex.strip_prefix('#').unwrap_or(hex).as_bytes();
        let channels: Vec<u8> = match bytes.len() {
            3 | 4 => bytes
                .iter()
                .map(|&c| hex_nibble(c).map(|v| v * 17))
                .collect::<Option<_>>()?,
            6 | 8 => bytes
                .chunks(2)
                .map(|pair| Some(hex_nibble(pair[0])? << 4 | hex_nibble(pair[1])?))
                .collect::<Option<_>>()?,
            _ => return None,
        };
        let alpha = channels.get(3).copied().unwrap_or(255);
        Some(Self::rgba(
            channels[0] as f32 / 255.0,
            channels[1] as f32 / 255.0,
            channels[2] as f32 / 255.0,
            alpha as f32 / 255.0,
        ))
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (to_byte(self.r), to_byte(self.g), to_byte(self.b), to_byte(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

/// Per-item visual overrides. Unset fields fall back to the host theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashed: Option<bool>,
}

impl Style {
    /// Overwrite only the fields that `other` sets.
    pub fn merge(&mut self, other: &Style) {
        if other.fill.is_some() {
            self.fill = other.fill;
        }
        if other.stroke.is_some() {
            self.stroke = other.stroke;
        }
        if other.stroke_width.is_some() {
            self.stroke_width = other.stroke_width;
        }
        if other.dashed.is_some() {
            self.dashed = other.dashed;
        }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Free-form node payload edited through the host's property panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

/// A workflow step on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Top-left corner in canvas units.
    pub position: Point,
    pub size: Size,
    pub data: NodeData,
}

impl Node {
    /// A node of `kind` with catalog defaults for size and label.
    pub fn new(id: NodeId, kind: NodeKind, position: Point) -> Self {
        Self {
            id,
            kind,
            position,
            size: kind.default_size(),
            data: NodeData {
                label: kind.default_label().to_string(),
                ..NodeData::default()
            },
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Geometric center, used as the connection endpoint.
    pub fn anchor(&self) -> Point {
        self.rect().center()
    }
}

/// Creation-time overrides merged over the catalog defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeOverrides {
    pub size: Option<Size>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub properties: BTreeMap<String, serde_json::Value>,
    pub style: Option<Style>,
}

impl NodeOverrides {
    pub(crate) fn apply(self, node: &mut Node) {
        if let Some(size) = self.size {
            node.size = size;
        }
        if let Some(label) = self.label {
            node.data.label = label;
        }
        if self.description.is_some() {
            node.data.description = self.description;
        }
        node.data.properties.extend(self.properties);
        if let Some(style) = self.style {
            node.data.style.get_or_insert_with(Style::default).merge(&style);
        }
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// How the connection path is drawn between two anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    Straight,
    #[default]
    Smooth,
    Step,
    Bezier,
}

/// A directed edge between two nodes. Parallel connections are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub curve: CurveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Optional settings for `GraphModel::add_connection`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    pub id: Option<ConnectionId>,
    pub curve: Option<CurveKind>,
    pub style: Option<Style>,
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert_eq!(c.to_hex(), "#6C5CE7");

        let short = Color::from_hex("#f00").unwrap();
        assert_eq!(short.to_hex(), "#FF0000");

        let translucent = Color::from_hex("#FF000080").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 0.01);
        assert_eq!(translucent.to_hex().len(), 9);

        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#GGGGGG").is_none());
    }

    #[test]
    fn node_defaults_from_catalog() {
        let node = Node::new(NodeId::intern("t1"), NodeKind::Task, Point::new(10.0, 20.0));
        assert_eq!(node.size, Size::new(180.0, 70.0));
        assert_eq!(node.data.label, "Task");
        assert_eq!(node.anchor(), Point::new(100.0, 55.0));
    }

    #[test]
    fn overrides_merge_over_defaults() {
        let mut node = Node::new(NodeId::intern("d1"), NodeKind::Decision, Point::ORIGIN);
        let mut properties = BTreeMap::new();
        properties.insert("expression".to_string(), serde_json::json!("amount > 1000"));
        NodeOverrides {
            size: Some(Size::new(150.0, 150.0)),
            label: Some("Over budget?".into()),
            properties,
            ..Default::default()
        }
        .apply(&mut node);

        assert_eq!(node.size, Size::new(150.0, 150.0));
        assert_eq!(node.data.label, "Over budget?");
        assert_eq!(node.data.description, None);
        assert_eq!(
            node.data.properties.get("expression"),
            Some(&serde_json::json!("amount > 1000"))
        );
    }

    #[test]
    fn union_of_rects() {
        let a = Rect::from_origin_size(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Rect::from_origin_size(Point::new(-5.0, 20.0), Size::new(10.0, 5.0));
        let u = Rect::union_all([a, b]).unwrap();
        assert_eq!(u, Rect { x: -5.0, y: 0.0, width: 15.0, height: 25.0 });
        assert!(Rect::union_all(Vec::<Rect>::new()).is_none());
    }

    #[test]
    fn style_serializes_colors_as_hex() {
        let style = Style {
            fill: Some(Color::rgba(1.0, 1.0, 1.0, 1.0)),
            ..Default::default()
        };
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, r##"{"fill":"#FFFFFF"}"##);
        let back: Style = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
    }
}
