//! Pointer-driven drawing tool state machine
//!
//! Turns pointer down/move/up events into committed shapes:
//!
//! ```text
//! Idle --down (tool selected)--> Drawing --move--> Drawing (preview)
//!                                   |
//!                                   +--up--> Idle (commit, or discard)
//! ```
//!
//! The tool, actor and page are captured at pointer-down. Selection changes
//! made while a gesture is in progress only apply to the next gesture.

use crate::actor::Actor;
use crate::config::AnnotatorConfig;
use crate::geometry::{DocPoint, PageSize, ViewPoint};
use crate::shape::{Geometry, Shape, ShapeKind};
use crate::store::ShapeStore;
use crate::view::ViewTransform;
use std::sync::Arc;

/// Host collaborator that asks the user for text box content
pub trait TextPrompt {
    /// Returns `None` when the user cancels
    fn prompt_text(&mut self, kind: ShapeKind) -> Option<String>;
}

/// Host collaborator that displays transient previews
pub trait PreviewSink {
    /// Show `shape` as the live preview, replacing any previous one
    fn show_preview(&mut self, shape: &Shape);

    fn clear_preview(&mut self);

    /// The page's persisted shapes changed and should be redrawn
    fn request_redraw(&mut self) {}
}

/// Preview sink for hosts that do not draw previews
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreview;

impl PreviewSink for NoPreview {
    fn show_preview(&mut self, _shape: &Shape) {}

    fn clear_preview(&mut self) {}
}

/// What a pointer event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Not consumed by the tool; the host may pan or select instead
    PassThrough,
    /// A gesture began
    Started,
    /// The live preview was updated
    Previewed,
    /// A shape of this kind was appended to the store
    Committed(ShapeKind),
    /// The gesture ended without a shape
    Discarded,
}

/// Selection values captured when a gesture starts
#[derive(Debug, Clone)]
pub struct GestureContext {
    /// Active tool; `None` means pointer events pass through
    pub tool: Option<ShapeKind>,
    pub author: Arc<Actor>,
    pub page: usize,
    /// Known size of `page`, used for optional clipping
    pub page_size: Option<PageSize>,
}

/// An in-progress drawing gesture
#[derive(Debug, Clone)]
pub struct Gesture {
    kind: ShapeKind,
    author: Arc<Actor>,
    page: usize,
    page_size: Option<PageSize>,
    anchor: DocPoint,
    has_preview: bool,
}

impl Gesture {
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn author(&self) -> &Arc<Actor> {
        &self.author
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn anchor(&self) -> DocPoint {
        self.anchor
    }
}

#[derive(Debug, Clone, Default)]
pub enum ToolState {
    #[default]
    Idle,
    Drawing(Gesture),
}

/// Drives one gesture at a time from raw pointer events
#[derive(Debug, Clone, Default)]
pub struct ToolStateMachine {
    state: ToolState,
    clip_to_page: bool,
    allow_empty_text: bool,
}

impl ToolStateMachine {
    pub fn new(config: &AnnotatorConfig) -> Self {
        Self {
            state: ToolState::Idle,
            clip_to_page: config.clip_to_page,
            allow_empty_text: config.allow_empty_text,
        }
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, ToolState::Drawing(_))
    }

    /// Start a gesture if a tool is selected
    ///
    /// A press while already drawing restarts the gesture at the new point.
    pub fn pointer_down(
        &mut self,
        point: ViewPoint,
        view: &ViewTransform,
        context: GestureContext,
        preview: &mut dyn PreviewSink,
    ) -> PointerOutcome {
        if let ToolState::Drawing(gesture) = &self.state {
            if gesture.has_preview {
                preview.clear_preview();
            }
            self.state = ToolState::Idle;
        }

        let Some(kind) = context.tool else {
            return PointerOutcome::PassThrough;
        };

        let Some(anchor) = self.resolve(point, view, context.page_size) else {
            tracing::warn!(?point, "ignoring pointer-down with non-finite coordinates");
            return PointerOutcome::Discarded;
        };

        tracing::trace!(%kind, page = context.page, ?anchor, "gesture started");
        self.state = ToolState::Drawing(Gesture {
            kind,
            author: context.author,
            page: context.page,
            page_size: context.page_size,
            anchor,
            has_preview: false,
        });
        PointerOutcome::Started
    }

    /// Update the live preview for the gesture in progress
    pub fn pointer_move(
        &mut self,
        point: ViewPoint,
        view: &ViewTransform,
        preview: &mut dyn PreviewSink,
    ) -> PointerOutcome {
        let ToolState::Drawing(gesture) = &self.state else {
            return PointerOutcome::PassThrough;
        };

        let Some(end) = self.resolve(point, view, gesture.page_size) else {
            tracing::warn!(?point, "discarding gesture with non-finite coordinates");
            self.cancel(preview);
            return PointerOutcome::Discarded;
        };

        let shape = Shape::new(
            Geometry::from_gesture(gesture.kind, gesture.anchor, end, String::new()),
            Arc::clone(&gesture.author),
        );
        if gesture.has_preview {
            preview.clear_preview();
        }
        preview.show_preview(&shape);

        if let ToolState::Drawing(gesture) = &mut self.state {
            gesture.has_preview = true;
        }
        PointerOutcome::Previewed
    }

    /// Finish the gesture, committing a shape into `store` unless discarded
    ///
    /// Text kinds ask `prompt` for content first. A cancelled prompt, or an
    /// empty answer when empty text is not allowed, discards the gesture.
    pub fn pointer_up(
        &mut self,
        point: ViewPoint,
        view: &ViewTransform,
        prompt: &mut dyn TextPrompt,
        preview: &mut dyn PreviewSink,
        store: &mut ShapeStore,
    ) -> PointerOutcome {
        let ToolState::Drawing(gesture) = std::mem::take(&mut self.state) else {
            return PointerOutcome::PassThrough;
        };
        if gesture.has_preview {
            preview.clear_preview();
        }

        let Some(end) = self.resolve(point, view, gesture.page_size) else {
            tracing::warn!(?point, "discarding gesture with non-finite coordinates");
            return PointerOutcome::Discarded;
        };

        let text = if gesture.kind.needs_text() {
            match prompt.prompt_text(gesture.kind) {
                None => {
                    tracing::debug!(kind = %gesture.kind, "text prompt cancelled");
                    return PointerOutcome::Discarded;
                }
                Some(text) if text.is_empty() && !self.allow_empty_text => {
                    tracing::debug!(kind = %gesture.kind, "empty text rejected");
                    return PointerOutcome::Discarded;
                }
                Some(text) => text,
            }
        } else {
            String::new()
        };

        let shape = Shape::new(
            Geometry::from_gesture(gesture.kind, gesture.anchor, end, text),
            gesture.author,
        );
        tracing::debug!(
            kind = %gesture.kind,
            page = gesture.page,
            author = %shape.author().name(),
            "shape committed"
        );
        store.append(gesture.page, shape);
        preview.request_redraw();
        PointerOutcome::Committed(gesture.kind)
    }

    /// Drop any gesture in progress without touching the store
    pub fn cancel(&mut self, preview: &mut dyn PreviewSink) {
        if let ToolState::Drawing(gesture) = std::mem::take(&mut self.state) {
            if gesture.has_preview {
                preview.clear_preview();
            }
        }
    }

    fn resolve(
        &self,
        point: ViewPoint,
        view: &ViewTransform,
        page_size: Option<PageSize>,
    ) -> Option<DocPoint> {
        let doc = view.to_document(point);
        if !doc.is_finite() {
            return None;
        }
        match page_size {
            Some(size) if self.clip_to_page => Some(doc.clamp_to(size)),
            _ => Some(doc),
        }
    }
}
