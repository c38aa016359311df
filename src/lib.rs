/// VidTube Service Library
///
/// Backend for a video sharing platform: video publishing and discovery,
/// comments, short text posts (tweets), likes, and channel subscriptions.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Data structures for videos, comments, tweets, likes
/// - `services`: Business logic layer
/// - `db`: Database access layer and repositories
/// - `storage`: External media store abstraction
/// - `auth`: Access-token verification and request extractors
/// - `response`: Success envelope shared by all endpoints
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod response;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::{AppError, Result};
