//! Mapping from stored shapes to output draw commands
//!
//! Export walks every non-empty page in ascending order and emits one command
//! per shape, in stored order, so the exported stacking matches the editor.
//! Colors are converted to normalized RGB; all geometry stays in document
//! space. Mapping cannot fail; errors only come from the writer.

use crate::config::ExportStyle;
use crate::geometry::{Bounds, DocPoint, RgbF};
use crate::shape::{Geometry, Shape};
use crate::store::ShapeStore;
use serde::Serialize;

/// A single drawing primitive in document space
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    StrokeLine {
        start: DocPoint,
        end: DocPoint,
        stroke: RgbF,
        width: f32,
    },
    StrokeRect {
        bounds: Bounds,
        stroke: RgbF,
        width: f32,
    },
    StrokeEllipse {
        bounds: Bounds,
        stroke: RgbF,
        width: f32,
    },
    /// Stroked box with optional fill and a text run inside it
    TextBox {
        bounds: Bounds,
        stroke: RgbF,
        width: f32,
        fill: Option<RgbF>,
        text: String,
        font_size: f32,
        text_color: RgbF,
    },
}

impl DrawCommand {
    /// Stroke color of the command, taken from the shape's author
    pub fn stroke(&self) -> RgbF {
        match self {
            DrawCommand::StrokeLine { stroke, .. }
            | DrawCommand::StrokeRect { stroke, .. }
            | DrawCommand::StrokeEllipse { stroke, .. }
            | DrawCommand::TextBox { stroke, .. } => *stroke,
        }
    }
}

/// Draw commands for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageCommands {
    pub page: usize,
    pub commands: Vec<DrawCommand>,
}

/// Sink for exported pages
///
/// Implementations merge the commands into the page's output and handle
/// all persistence.
pub trait DocumentWriter {
    type Error;

    fn write_page(&mut self, page: usize, commands: &[DrawCommand]) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Default)]
pub struct ExportMapper {
    style: ExportStyle,
}

impl ExportMapper {
    pub fn new(style: ExportStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ExportStyle {
        &self.style
    }

    pub fn map_shape(&self, shape: &Shape) -> DrawCommand {
        let stroke = shape.author().color().to_normalized();
        let width = self.style.stroke_width;

        match shape.geometry() {
            Geometry::Line { start, end } => DrawCommand::StrokeLine {
                start: *start,
                end: *end,
                stroke,
                width,
            },
            Geometry::Rect { bounds } => DrawCommand::StrokeRect {
                bounds: *bounds,
                stroke,
                width,
            },
            Geometry::Ellipse { bounds } => DrawCommand::StrokeEllipse {
                bounds: *bounds,
                stroke,
                width,
            },
            Geometry::Text { bounds, text } => self.text_box(*bounds, text, stroke, None),
            Geometry::TextFill { bounds, text } => self.text_box(
                *bounds,
                text,
                stroke,
                Some(self.style.highlight_fill.to_normalized()),
            ),
        }
    }

    pub fn map_page(&self, shapes: &[Shape]) -> Vec<DrawCommand> {
        shapes.iter().map(|shape| self.map_shape(shape)).collect()
    }

    /// Commands for every page that has shapes, ascending by page
    pub fn export(&self, store: &ShapeStore) -> Vec<PageCommands> {
        store
            .pages()
            .map(|page| PageCommands {
                page,
                commands: self.map_page(store.shapes_for(page)),
            })
            .filter(|page| !page.commands.is_empty())
            .collect()
    }

    /// Feed every non-empty page to `writer`, returning the number of pages written
    pub fn export_to<W: DocumentWriter>(
        &self,
        store: &ShapeStore,
        writer: &mut W,
    ) -> Result<usize, W::Error> {
        let pages = self.export(store);
        for page in &pages {
            writer.write_page(page.page, &page.commands)?;
        }
        tracing::debug!(pages = pages.len(), "export written");
        Ok(pages.len())
    }

    fn text_box(&self, bounds: Bounds, text: &str, stroke: RgbF, fill: Option<RgbF>) -> DrawCommand {
        DrawCommand::TextBox {
            bounds,
            stroke,
            width: self.style.stroke_width,
            fill,
            text: text.to_string(),
            font_size: self.style.font_size,
            text_color: self.style.text_color.to_normalized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorKind, ActorRegistry};
    use crate::shape::ShapeKind;
    use std::sync::Arc;

    fn shape(registry: &mut ActorRegistry, kind: ShapeKind, actor_kind: ActorKind) -> Shape {
        let author = registry.create("author", actor_kind).unwrap();
        Shape::new(
            Geometry::from_gesture(
                kind,
                DocPoint::new(10.0, 10.0),
                DocPoint::new(110.0, 60.0),
                "label".to_string(),
            ),
            author,
        )
    }

    #[test]
    fn test_empty_store_exports_nothing() {
        let mapper = ExportMapper::default();
        assert!(mapper.export(&ShapeStore::new()).is_empty());
    }

    #[test]
    fn test_order_and_color_preserved() {
        let mut registry = ActorRegistry::new();
        let mut store = ShapeStore::new();
        let a = shape(&mut registry, ShapeKind::Rect, ActorKind::Business);
        let b = shape(&mut registry, ShapeKind::Line, ActorKind::Government);
        let c = shape(&mut registry, ShapeKind::Ellipse, ActorKind::Gym);
        store.append(0, a.clone());
        store.append(0, b.clone());
        store.append(0, c.clone());

        let pages = ExportMapper::default().export(&store);
        assert_eq!(pages.len(), 1);
        let commands = &pages[0].commands;
        assert!(matches!(commands[0], DrawCommand::StrokeRect { .. }));
        assert!(matches!(commands[1], DrawCommand::StrokeLine { .. }));
        assert!(matches!(commands[2], DrawCommand::StrokeEllipse { .. }));

        for (command, shape) in commands.iter().zip([&a, &b, &c]) {
            let color = shape.author().color();
            let stroke = command.stroke();
            assert_eq!(stroke.r, f32::from(color.r) / 255.0);
            assert_eq!(stroke.g, f32::from(color.g) / 255.0);
            assert_eq!(stroke.b, f32::from(color.b) / 255.0);
        }
    }

    #[test]
    fn test_fixed_style_constants() {
        let mut registry = ActorRegistry::new();
        let mapper = ExportMapper::default();

        let line = mapper.map_shape(&shape(&mut registry, ShapeKind::Line, ActorKind::Gym));
        assert!(matches!(line, DrawCommand::StrokeLine { width, .. } if width == 2.0));

        let text = mapper.map_shape(&shape(&mut registry, ShapeKind::Text, ActorKind::Gym));
        match text {
            DrawCommand::TextBox {
                fill,
                font_size,
                text_color,
                text,
                width,
                ..
            } => {
                assert_eq!(fill, None);
                assert_eq!(font_size, 12.0);
                assert_eq!(width, 2.0);
                assert_eq!(text_color, RgbF { r: 0.0, g: 0.0, b: 0.0 });
                assert_eq!(text, "label");
            }
            other => panic!("expected text box, got {other:?}"),
        }
    }

    #[test]
    fn test_text_fill_uses_highlight_not_actor() {
        let mut registry = ActorRegistry::new();
        let filled = shape(&mut registry, ShapeKind::TextFill, ActorKind::Business);
        let command = ExportMapper::default().map_shape(&filled);

        match command {
            DrawCommand::TextBox { fill, stroke, .. } => {
                assert_eq!(fill, Some(RgbF { r: 1.0, g: 1.0, b: 0.0 }));
                assert_eq!(stroke, filled.author().color().to_normalized());
            }
            other => panic!("expected text box, got {other:?}"),
        }
    }

    #[derive(Default)]
    struct CollectingWriter {
        pages: Vec<(usize, usize)>,
    }

    impl DocumentWriter for CollectingWriter {
        type Error = String;

        fn write_page(&mut self, page: usize, commands: &[DrawCommand]) -> Result<(), String> {
            if page == 13 {
                return Err("unlucky page".to_string());
            }
            self.pages.push((page, commands.len()));
            Ok(())
        }
    }

    #[test]
    fn test_export_to_writer_in_page_order() {
        let mut registry = ActorRegistry::new();
        let mut store = ShapeStore::new();
        store.append(5, shape(&mut registry, ShapeKind::Rect, ActorKind::Gym));
        store.append(1, shape(&mut registry, ShapeKind::Rect, ActorKind::Gym));
        store.append(1, shape(&mut registry, ShapeKind::Line, ActorKind::Gym));

        let mut writer = CollectingWriter::default();
        let written = ExportMapper::default().export_to(&store, &mut writer).unwrap();
        assert_eq!(written, 2);
        assert_eq!(writer.pages, vec![(1, 2), (5, 1)]);
    }

    #[test]
    fn test_writer_error_propagates() {
        let registry = ActorRegistry::new();
        let mut store = ShapeStore::new();
        store.append(
            13,
            Shape::new(
                Geometry::from_gesture(
                    ShapeKind::Rect,
                    DocPoint::new(0.0, 0.0),
                    DocPoint::new(1.0, 1.0),
                    String::new(),
                ),
                Arc::clone(registry.default_actor()),
            ),
        );

        let mut writer = CollectingWriter::default();
        let result = ExportMapper::default().export_to(&store, &mut writer);
        assert_eq!(result, Err("unlucky page".to_string()));
    }
}
