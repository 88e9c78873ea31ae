//! Engine configuration.
//!
//! Configuration can be created programmatically, loaded from a TOML file,
//! or overridden from environment variables. Every field has a default, so a
//! file only needs the keys it changes:
//!
//! ```toml
//! clip_to_page = true
//!
//! [zoom]
//! min = 0.25
//! max = 4.0
//!
//! [export]
//! stroke_width = 1.5
//! ```

use crate::geometry::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Limits and step factors for zooming
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomPolicy {
    /// Smallest allowed zoom factor
    pub min: f32,
    /// Largest allowed zoom factor
    pub max: f32,
    /// Multiplier applied by zoom in
    pub step_in: f32,
    /// Multiplier applied by zoom out
    pub step_out: f32,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 10.0,
            step_in: 1.25,
            step_out: 0.8,
        }
    }
}

impl ZoomPolicy {
    /// Clamp a factor into `[min, max]`
    ///
    /// Never panics: with inverted bounds `max` wins, and a NaN bound is
    /// ignored.
    pub fn clamp(&self, factor: f32) -> f32 {
        factor.max(self.min).min(self.max)
    }
}

/// Fixed drawing parameters applied to every exported shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportStyle {
    /// Stroke width for all shapes, in document units
    pub stroke_width: f32,
    /// Font size for text boxes, in document units
    pub font_size: f32,
    /// Glyph color for text boxes
    pub text_color: Color,
    /// Fill behind `TextFill` boxes, independent of the actor color
    pub highlight_fill: Color,
}

impl Default for ExportStyle {
    fn default() -> Self {
        Self {
            stroke_width: 2.0,
            font_size: 12.0,
            text_color: Color::BLACK,
            highlight_fill: Color::YELLOW,
        }
    }
}

/// Top-level configuration for an annotation session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    pub zoom: ZoomPolicy,
    pub export: ExportStyle,
    /// Accept an empty string from the text prompt as a valid text shape
    pub allow_empty_text: bool,
    /// Clamp gesture points into the page when its size is known
    pub clip_to_page: bool,
}

impl AnnotatorConfig {
    /// Sets the zoom bounds.
    ///
    /// The bounds are checked by [`AnnotatorConfig::validate`], which
    /// `AnnotationSession::new` runs.
    pub fn with_zoom_bounds(mut self, min: f32, max: f32) -> Self {
        self.zoom.min = min;
        self.zoom.max = max;
        self
    }

    /// Sets the export style.
    pub fn with_export_style(mut self, style: ExportStyle) -> Self {
        self.export = style;
        self
    }

    /// Sets whether an empty prompt answer still commits a text shape.
    pub fn with_allow_empty_text(mut self, allow: bool) -> Self {
        self.allow_empty_text = allow;
        self
    }

    /// Sets whether gesture points are clamped to the page.
    pub fn with_clip_to_page(mut self, clip: bool) -> Self {
        self.clip_to_page = clip;
        self
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(ConfigError::IoError)?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment variable overrides on top of `self`.
    ///
    /// Environment variables:
    /// - `PDF_ANNOTATOR_MIN_ZOOM` / `PDF_ANNOTATOR_MAX_ZOOM`: zoom bounds
    /// - `PDF_ANNOTATOR_STROKE_WIDTH`: export stroke width
    /// - `PDF_ANNOTATOR_FONT_SIZE`: export font size
    /// - `PDF_ANNOTATOR_CLIP_TO_PAGE`: `true` / `false`
    /// - `PDF_ANNOTATOR_ALLOW_EMPTY_TEXT`: `true` / `false`
    ///
    /// # Errors
    /// Returns an error if any variable holds an unparsable value or the
    /// result fails validation.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(min) = env_value::<f32>("PDF_ANNOTATOR_MIN_ZOOM")? {
            self.zoom.min = min;
        }
        if let Some(max) = env_value::<f32>("PDF_ANNOTATOR_MAX_ZOOM")? {
            self.zoom.max = max;
        }
        if let Some(width) = env_value::<f32>("PDF_ANNOTATOR_STROKE_WIDTH")? {
            self.export.stroke_width = width;
        }
        if let Some(size) = env_value::<f32>("PDF_ANNOTATOR_FONT_SIZE")? {
            self.export.font_size = size;
        }
        if let Some(clip) = env_value::<bool>("PDF_ANNOTATOR_CLIP_TO_PAGE")? {
            self.clip_to_page = clip;
        }
        if let Some(allow) = env_value::<bool>("PDF_ANNOTATOR_ALLOW_EMPTY_TEXT")? {
            self.allow_empty_text = allow;
        }

        self.validate()?;
        Ok(self)
    }

    /// Loads the defaults with environment variable overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Checks that numeric settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        if !(zoom.min.is_finite() && zoom.min > 0.0) {
            return Err(ConfigError::InvalidValue("zoom.min".to_string()));
        }
        if !(zoom.max.is_finite() && zoom.max >= zoom.min) {
            return Err(ConfigError::InvalidValue("zoom.max".to_string()));
        }
        if !(zoom.step_in.is_finite() && zoom.step_in > 0.0) {
            return Err(ConfigError::InvalidValue("zoom.step_in".to_string()));
        }
        if !(zoom.step_out.is_finite() && zoom.step_out > 0.0) {
            return Err(ConfigError::InvalidValue("zoom.step_out".to_string()));
        }
        if !(self.export.stroke_width.is_finite() && self.export.stroke_width > 0.0) {
            return Err(ConfigError::InvalidValue("export.stroke_width".to_string()));
        }
        if !(self.export.font_size.is_finite() && self.export.font_size > 0.0) {
            return Err(ConfigError::InvalidValue("export.font_size".to_string()));
        }
        Ok(())
    }
}

fn env_value<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        Err(_) => Ok(None),
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {0}")]
    InvalidValue(String),
}
