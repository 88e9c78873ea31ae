//! PDF Annotator Core Library
//!
//! Annotation engine for paginated documents: per-page shape storage, the
//! pointer-driven drawing tools, view/document coordinate mapping, undo,
//! and the export mapping to draw commands.

pub mod actor;
pub mod config;
pub mod content_stream;
pub mod error;
pub mod export;
pub mod geometry;
pub mod renderer;
pub mod session;
pub mod shape;
pub mod store;
pub mod tool;
pub mod view;

pub use actor::{Actor, ActorId, ActorKind, ActorRegistry, DEFAULT_ACTOR_NAME, FALLBACK_COLOR};
pub use config::{AnnotatorConfig, ConfigError, ExportStyle, ZoomPolicy};
pub use content_stream::{ContentStreamWriter, WriterError};
pub use error::{AnnotatorError, AnnotatorResult};
pub use export::{DocumentWriter, DrawCommand, ExportMapper, PageCommands};
pub use geometry::{Bounds, Color, DocPoint, PageSize, RgbF, ViewPoint};
pub use renderer::{PageRenderer, StaticPages};
pub use session::AnnotationSession;
pub use shape::{Geometry, Shape, ShapeKind};
pub use store::ShapeStore;
pub use tool::{
    Gesture, GestureContext, NoPreview, PointerOutcome, PreviewSink, TextPrompt, ToolState,
    ToolStateMachine,
};
pub use view::ViewTransform;
