//! Core error types for earlybird-core.
//!
//! Engine operations return [`EngineError`] directly; everything that touches
//! ingestion, configuration or I/O funnels into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::clock::Instant;

/// Core error type for earlybird-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Incentive engine errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Task record validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of a single engine call.
///
/// None of these are transient: the same inputs always fail the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A date string did not parse to a valid calendar date
    #[error("Invalid date: '{input}'")]
    InvalidDate { input: String },

    /// Deadline is not strictly after start
    #[error("Degenerate window: deadline ({deadline}) must be after start ({start})")]
    DegenerateWindow { start: Instant, deadline: Instant },

    /// Reward requested for a task that has not been completed
    #[error("Task '{task_id}' is not completed")]
    NotCompleted { task_id: String },
}

/// Task record validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `completed` and `completedDate` disagree
    #[error("Task '{task_id}': completed flag and completion date disagree")]
    InconsistentCompletion { task_id: String },

    /// Completion requested twice
    #[error("Task '{task_id}' is already completed")]
    AlreadyCompleted { task_id: String },

    /// Task lookup failed
    #[error("Task '{0}' not found")]
    TaskNotFound(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home directory could not be determined
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
