//! Committed vector annotations
//!
//! A shape's geometry is stored in document space and never edited after
//! commit. To change a shape, undo it and draw a new one.

use crate::actor::Actor;
use crate::geometry::{Bounds, DocPoint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Drawing tool / shape kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Line,
    Rect,
    Ellipse,
    /// Text box without fill
    Text,
    /// Text box with a highlight fill
    TextFill,
}

impl ShapeKind {
    /// Whether completing a gesture with this tool asks the host for text
    pub fn needs_text(&self) -> bool {
        matches!(self, ShapeKind::Text | ShapeKind::TextFill)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Rect => "rect",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Text => "text",
            ShapeKind::TextFill => "text_fill",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape geometry, one variant per shape kind
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Segment between the two gesture points, in drag order
    Line { start: DocPoint, end: DocPoint },
    Rect { bounds: Bounds },
    /// Ellipse inscribed in `bounds`
    Ellipse { bounds: Bounds },
    Text { bounds: Bounds, text: String },
    TextFill { bounds: Bounds, text: String },
}

impl Geometry {
    /// Build the geometry for a gesture from `anchor` to `end`
    ///
    /// Box-shaped kinds normalize the corners. For text kinds `text` is used
    /// as the content; it is ignored for the others.
    pub fn from_gesture(kind: ShapeKind, anchor: DocPoint, end: DocPoint, text: String) -> Self {
        let bounds = Bounds::from_corners(anchor, end);
        match kind {
            ShapeKind::Line => Geometry::Line { start: anchor, end },
            ShapeKind::Rect => Geometry::Rect { bounds },
            ShapeKind::Ellipse => Geometry::Ellipse { bounds },
            ShapeKind::Text => Geometry::Text { bounds, text },
            ShapeKind::TextFill => Geometry::TextFill { bounds, text },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Line { .. } => ShapeKind::Line,
            Geometry::Rect { .. } => ShapeKind::Rect,
            Geometry::Ellipse { .. } => ShapeKind::Ellipse,
            Geometry::Text { .. } => ShapeKind::Text,
            Geometry::TextFill { .. } => ShapeKind::TextFill,
        }
    }

    /// Bounding box in document space
    pub fn bounding_box(&self) -> Bounds {
        match self {
            Geometry::Line { start, end } => Bounds::from_corners(*start, *end),
            Geometry::Rect { bounds }
            | Geometry::Ellipse { bounds }
            | Geometry::Text { bounds, .. }
            | Geometry::TextFill { bounds, .. } => *bounds,
        }
    }

    /// Text content for text kinds
    pub fn text(&self) -> Option<&str> {
        match self {
            Geometry::Text { text, .. } | Geometry::TextFill { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// A committed annotation attributed to an actor
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    geometry: Geometry,
    author: Arc<Actor>,
}

impl Shape {
    pub fn new(geometry: Geometry, author: Arc<Actor>) -> Self {
        Self { geometry, author }
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn author(&self) -> &Arc<Actor> {
        &self.author
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorRegistry;

    #[test]
    fn test_line_keeps_drag_order() {
        let geometry = Geometry::from_gesture(
            ShapeKind::Line,
            DocPoint::new(50.0, 80.0),
            DocPoint::new(10.0, 20.0),
            String::new(),
        );
        assert_eq!(
            geometry,
            Geometry::Line {
                start: DocPoint::new(50.0, 80.0),
                end: DocPoint::new(10.0, 20.0),
            }
        );
        assert_eq!(geometry.bounding_box().to_tuple(), (10.0, 20.0, 50.0, 80.0));
    }

    #[test]
    fn test_box_kinds_normalize() {
        let anchor = DocPoint::new(110.0, 60.0);
        let end = DocPoint::new(10.0, 10.0);
        for kind in [ShapeKind::Rect, ShapeKind::Ellipse, ShapeKind::Text, ShapeKind::TextFill] {
            let geometry = Geometry::from_gesture(kind, anchor, end, "note".to_string());
            assert_eq!(geometry.kind(), kind);
            assert_eq!(geometry.bounding_box().to_tuple(), (10.0, 10.0, 110.0, 60.0));
        }
    }

    #[test]
    fn test_text_only_on_text_kinds() {
        let a = DocPoint::new(0.0, 0.0);
        let b = DocPoint::new(5.0, 5.0);
        let rect = Geometry::from_gesture(ShapeKind::Rect, a, b, "ignored".to_string());
        let text = Geometry::from_gesture(ShapeKind::TextFill, a, b, "hello".to_string());
        assert_eq!(rect.text(), None);
        assert_eq!(text.text(), Some("hello"));
        assert!(ShapeKind::Text.needs_text());
        assert!(!ShapeKind::Ellipse.needs_text());
    }

    #[test]
    fn test_shape_shares_author() {
        let registry = ActorRegistry::new();
        let author = registry.default_actor();
        let shape = Shape::new(
            Geometry::Rect {
                bounds: Bounds::from_corners(DocPoint::new(0.0, 0.0), DocPoint::new(1.0, 1.0)),
            },
            Arc::clone(author),
        );
        assert!(Arc::ptr_eq(shape.author(), author));
        assert_eq!(shape.kind(), ShapeKind::Rect);
    }
}
