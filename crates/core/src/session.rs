//! Per-document annotation session
//!
//! The session owns everything the engine needs for one open document: the
//! actor registry, the shape store, the view transform, the tool state
//! machine and the page source. There is no process-wide state; a host
//! creates one session and forwards UI events to it.

use crate::actor::{Actor, ActorId, ActorKind, ActorRegistry};
use crate::config::AnnotatorConfig;
use crate::error::{AnnotatorError, AnnotatorResult};
use crate::export::{DocumentWriter, ExportMapper, PageCommands};
use crate::geometry::{PageSize, ViewPoint};
use crate::renderer::PageRenderer;
use crate::shape::{Shape, ShapeKind};
use crate::store::ShapeStore;
use crate::tool::{GestureContext, PointerOutcome, PreviewSink, TextPrompt, ToolStateMachine};
use crate::view::ViewTransform;
use std::sync::Arc;

pub struct AnnotationSession {
    config: AnnotatorConfig,
    actors: ActorRegistry,
    store: ShapeStore,
    view: ViewTransform,
    tools: ToolStateMachine,
    exporter: ExportMapper,
    renderer: Option<Box<dyn PageRenderer>>,
    current_page: usize,
    selected_tool: Option<ShapeKind>,
    selected_actor: ActorId,
}

impl AnnotationSession {
    /// Create a session with no document open
    ///
    /// Drawing still works before a document is opened; shapes land on
    /// page 0.
    ///
    /// # Errors
    /// Returns [`AnnotatorError::InvalidConfig`] if `config` fails
    /// [`AnnotatorConfig::validate`].
    pub fn new(config: AnnotatorConfig) -> AnnotatorResult<Self> {
        config
            .validate()
            .map_err(|err| AnnotatorError::InvalidConfig(err.to_string()))?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: AnnotatorConfig) -> Self {
        let actors = ActorRegistry::new();
        let selected_actor = actors.default_actor().id();
        Self {
            view: ViewTransform::new(config.zoom),
            tools: ToolStateMachine::new(&config),
            exporter: ExportMapper::new(config.export),
            config,
            actors,
            store: ShapeStore::new(),
            renderer: None,
            current_page: 0,
            selected_tool: None,
            selected_actor,
        }
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn actors(&self) -> &ActorRegistry {
        &self.actors
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    /// Open a new document
    ///
    /// Resets the page to 0 and zoom to 1.0, drops all shapes and any
    /// in-progress gesture. Actors and the tool/actor selection are kept.
    /// `preview` is told to clear a live preview of a cancelled gesture.
    pub fn open_document<R: PageRenderer + 'static>(
        &mut self,
        renderer: R,
        preview: &mut dyn PreviewSink,
    ) {
        tracing::info!(pages = renderer.page_count(), "document opened");
        self.tools.cancel(preview);
        self.store.clear();
        self.view.reset();
        self.current_page = 0;
        self.renderer = Some(Box::new(renderer));
    }

    /// Number of pages, or `None` when no document is open
    pub fn page_count(&self) -> Option<usize> {
        self.renderer.as_ref().map(|renderer| renderer.page_count())
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn current_page_size(&self) -> Option<PageSize> {
        self.renderer
            .as_ref()
            .and_then(|renderer| renderer.page_size(self.current_page))
    }

    /// Move to the next page; returns false at the last page
    pub fn next_page(&mut self) -> bool {
        match self.page_count() {
            Some(count) if self.current_page + 1 < count => {
                self.current_page += 1;
                true
            }
            _ => false,
        }
    }

    /// Move to the previous page; returns false at the first page
    pub fn prev_page(&mut self) -> bool {
        if self.renderer.is_some() && self.current_page > 0 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to_page(&mut self, page: usize) -> AnnotatorResult<()> {
        let page_count = self.page_count().unwrap_or(1);
        if page >= page_count {
            return Err(AnnotatorError::PageOutOfRange { page, page_count });
        }
        self.current_page = page;
        Ok(())
    }

    pub fn select_tool(&mut self, tool: Option<ShapeKind>) {
        self.selected_tool = tool;
    }

    pub fn selected_tool(&self) -> Option<ShapeKind> {
        self.selected_tool
    }

    pub fn select_actor(&mut self, id: ActorId) -> AnnotatorResult<()> {
        if self.actors.get(id).is_none() {
            return Err(AnnotatorError::UnknownActor(id));
        }
        self.selected_actor = id;
        Ok(())
    }

    pub fn selected_actor(&self) -> &Arc<Actor> {
        self.actors
            .get(self.selected_actor)
            .unwrap_or_else(|| self.actors.default_actor())
    }

    /// Register a new actor; it is not selected automatically
    pub fn create_actor(&mut self, name: &str, kind: ActorKind) -> AnnotatorResult<Arc<Actor>> {
        self.actors.create(name, kind)
    }

    pub fn pointer_down(&mut self, point: ViewPoint, preview: &mut dyn PreviewSink) -> PointerOutcome {
        let context = GestureContext {
            tool: self.selected_tool,
            author: Arc::clone(self.selected_actor()),
            page: self.current_page,
            page_size: self.current_page_size(),
        };
        self.tools.pointer_down(point, &self.view, context, preview)
    }

    pub fn pointer_move(&mut self, point: ViewPoint, preview: &mut dyn PreviewSink) -> PointerOutcome {
        self.tools.pointer_move(point, &self.view, preview)
    }

    pub fn pointer_up(
        &mut self,
        point: ViewPoint,
        prompt: &mut dyn TextPrompt,
        preview: &mut dyn PreviewSink,
    ) -> PointerOutcome {
        self.tools
            .pointer_up(point, &self.view, prompt, preview, &mut self.store)
    }

    pub fn is_drawing(&self) -> bool {
        self.tools.is_drawing()
    }

    /// Remove the most recent shape on the current page
    pub fn undo(&mut self) -> Option<Shape> {
        let undone = self.store.undo_last(self.current_page);
        if let Some(shape) = &undone {
            tracing::debug!(page = self.current_page, kind = %shape.kind(), "undo");
        }
        undone
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.view.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.view.zoom_out()
    }

    pub fn set_zoom(&mut self, factor: f32) -> AnnotatorResult<f32> {
        self.view.set_zoom(factor)
    }

    pub fn current_zoom(&self) -> f32 {
        self.view.zoom()
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Persisted shapes for the current page, in drawing order
    pub fn shapes_for_current_page(&self) -> &[Shape] {
        self.store.shapes_for(self.current_page)
    }

    pub fn export(&self) -> Vec<PageCommands> {
        self.exporter.export(&self.store)
    }

    pub fn export_to<W: DocumentWriter>(&self, writer: &mut W) -> Result<usize, W::Error> {
        self.exporter.export_to(&self.store, writer)
    }
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self::with_valid_config(AnnotatorConfig::default())
    }
}
