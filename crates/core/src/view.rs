//! View/document coordinate conversion under zoom
//!
//! The renderer scales document space up by the zoom factor, so pointer
//! positions are divided by it to get back to document space. Zoom changes
//! never touch stored geometry.

use crate::config::ZoomPolicy;
use crate::error::{AnnotatorError, AnnotatorResult};
use crate::geometry::{DocPoint, ViewPoint};

pub const DEFAULT_ZOOM: f32 = 1.0;

/// Current zoom factor and the policy bounding it
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    zoom: f32,
    policy: ZoomPolicy,
}

impl ViewTransform {
    pub fn new(policy: ZoomPolicy) -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            policy,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn policy(&self) -> &ZoomPolicy {
        &self.policy
    }

    /// Map a pointer position to document space
    pub fn to_document(&self, point: ViewPoint) -> DocPoint {
        DocPoint::new(point.x / self.zoom, point.y / self.zoom)
    }

    /// Map a document-space point to view space
    pub fn to_view(&self, point: DocPoint) -> ViewPoint {
        ViewPoint::new(point.x * self.zoom, point.y * self.zoom)
    }

    /// Set an absolute zoom factor, clamped to the policy bounds
    ///
    /// Returns the zoom actually applied.
    pub fn set_zoom(&mut self, factor: f32) -> AnnotatorResult<f32> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(AnnotatorError::invalid(format!(
                "zoom factor must be positive and finite, got {factor}"
            )));
        }
        Ok(self.apply(factor))
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.apply(self.zoom * self.policy.step_in)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.apply(self.zoom * self.policy.step_out)
    }

    /// Back to 100%
    pub fn reset(&mut self) {
        self.zoom = self.policy.clamp(DEFAULT_ZOOM);
    }

    fn apply(&mut self, factor: f32) -> f32 {
        let clamped = self.policy.clamp(factor);
        if clamped != factor {
            tracing::debug!(requested = factor, applied = clamped, "zoom clamped");
        }
        tracing::debug!(from = self.zoom, to = clamped, "zoom changed");
        self.zoom = clamped;
        self.zoom
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(ZoomPolicy::default())
    }
}
