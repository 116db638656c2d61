use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::info;

use crate::{
    clients::{loader::TemplateLoader, template::TemplateEngine},
    error::ServiceError,
    handlers::registry::ActionHandler,
    models::{
        action::SemanticAction, parameters::resolve_parameters, template::TemplateSource,
    },
};

/// Renders the template described by a `ReplaceAction` envelope.
pub struct ReplaceActionHandler {
    loader: TemplateLoader,
    engine: TemplateEngine,
}

impl ReplaceActionHandler {
    pub fn new(loader: TemplateLoader, engine: TemplateEngine) -> Self {
        Self { loader, engine }
    }

    pub async fn replace(&self, action: SemanticAction) -> Result<SemanticAction, ServiceError> {
        let object = action
            .object
            .as_ref()
            .ok_or(ServiceError::MissingField("object"))?;

        let source = TemplateSource::from_fields(object.text.as_deref(), object.reference())
            .ok_or(ServiceError::MissingField("object.text or object.contentUrl"))?;

        let text = self.loader.load(&source).await?;

        let parameters =
            resolve_parameters(action.parameter_source(), object.properties.as_ref());

        let result = self
            .engine
            .render(&text, &parameters, object.encoding_format.as_deref())?;

        info!(
            content_size = result.content_size,
            encoding_format = %result.encoding_format,
            from_reference = matches!(source, TemplateSource::Reference(_)),
            "Rendered template"
        );

        Ok(action.complete(result))
    }
}

impl ActionHandler for ReplaceActionHandler {
    fn handle(&self, envelope: Value) -> BoxFuture<'_, Result<SemanticAction, ServiceError>> {
        Box::pin(async move {
            let action = serde_json::from_value::<SemanticAction>(envelope)?;
            self.replace(action).await
        })
    }
}
