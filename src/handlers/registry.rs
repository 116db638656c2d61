//! Action dispatch by the JSON-LD `@type` discriminator.
//!
//! Each action kind maps to one [`ActionHandler`]. Adding a kind means
//! registering another handler; [`ActionRegistry::dispatch`] never changes.

use std::{collections::HashMap, sync::Arc};

use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use crate::{error::ServiceError, models::action::SemanticAction};

const TYPE_FIELD: &str = "@type";

pub trait ActionHandler: Send + Sync {
    /// Handles one envelope whose `@type` matched this handler's kind.
    fn handle(&self, envelope: Value) -> BoxFuture<'_, Result<SemanticAction, ServiceError>>;
}

#[derive(Default, Clone)]
pub struct ActionRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, replacing any earlier registration.
    pub fn register(&mut self, kind: impl Into<String>, handler: Arc<dyn ActionHandler>) -> &mut Self {
        self.handlers.insert(kind.into(), handler);
        self
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub async fn dispatch(&self, envelope: Value) -> Result<SemanticAction, ServiceError> {
        if !envelope.is_object() {
            return Err(ServiceError::InvalidBody(
                "action envelope must be a JSON object".to_string(),
            ));
        }

        let kind = action_kind(&envelope)?;
        let handler = self
            .handlers
            .get(kind)
            .cloned()
            .ok_or_else(|| ServiceError::UnsupportedAction(kind.to_string()))?;

        debug!(action_type = kind, "Dispatching action");

        handler.handle(envelope).await
    }
}

/// Reads the string discriminator, naming the offending value otherwise.
fn action_kind(envelope: &Value) -> Result<&str, ServiceError> {
    match envelope.get(TYPE_FIELD) {
        Some(Value::String(kind)) => Ok(kind),
        Some(other) => Err(ServiceError::UnsupportedAction(other.to_string())),
        None => Err(ServiceError::UnsupportedAction("<missing>".to_string())),
    }
}
