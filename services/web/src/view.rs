//! Views handed to the rendering layer
//!
//! A handler answers with a template name and the model attributes for it.
//! Rendering is outside this service: the view travels as a JSON document
//! `{"view": "<template>", "model": {...}}` that a template front end turns
//! into a page.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::error;

/// Template name plus model attributes
#[derive(Debug, Clone)]
pub struct View {
    name: &'static str,
    model: Map<String, Value>,
    status: StatusCode,
}

impl View {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            model: Map::new(),
            status: StatusCode::OK,
        }
    }

    /// Add a model attribute
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            error!("Failed to serialize model attribute {}: {}", key, e);
            Value::Null
        });
        self.model.insert(key.to_string(), value);
        self
    }

    /// Add a model attribute when present
    pub fn with_opt(self, key: &str, value: Option<impl Serialize>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "view": self.name,
            "model": self.model,
        }));

        (self.status, body).into_response()
    }
}
