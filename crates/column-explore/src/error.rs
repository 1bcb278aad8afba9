//! Custom error types for column exploration.
//!
//! Classification itself never fails; errors originate from loading data,
//! rasterizing charts and writing report files. They are built with
//! `thiserror` and are serializable so a host application can forward them
//! as `{code, message}` pairs.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for column exploration.
#[derive(Error, Debug)]
pub enum ExploreError {
    /// Column was not found in the loaded dataset.
    #[error("Column '{name}' not found in dataset (available: {available})")]
    ColumnNotFound { name: String, available: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A chart could not be rasterized.
    #[error("Failed to render chart: {0}")]
    ChartRenderingFailed(String),

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PNG encoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ExploreError>,
    },
}

impl ExploreError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ExploreError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound { .. } => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ChartRenderingFailed(_) => "CHART_RENDERING_FAILED",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Image(_) => "IMAGE_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is caused by user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::ColumnNotFound { .. } | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_user_error(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for ExploreError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        ExploreError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ExploreError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ExploreError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for exploration operations.
pub type Result<T> = std::result::Result<T, ExploreError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ExploreError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ExploreError::Io(e).with_context(context))
    }
}
