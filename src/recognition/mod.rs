//! Food image recognition through an external classification service.

pub mod client;
pub mod dto;
pub mod fallback;
pub mod handlers;
pub mod services;

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use serde_json::{Map, Value};

use crate::state::AppState;
use dto::Classification;

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    /// The service answered with a non-success status.
    #[error("recognition service returned {0}")]
    Status(reqwest::StatusCode),

    /// The request never got an answer (connect, DNS, TLS, broken body).
    #[error("recognition service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// A success response whose body could not be read as expected.
    #[error("unexpected recognition response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait FoodRecognizer: Send + Sync {
    async fn classify(&self, image: Bytes) -> Result<Classification, RecognitionError>;

    async fn recipe_nutrition(&self, recipe_id: i64)
        -> Result<Map<String, Value>, RecognitionError>;
}

pub fn router() -> Router<AppState> {
    handlers::recognition_routes()
}
