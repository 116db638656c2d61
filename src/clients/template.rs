use std::error::Error as StdError;

use serde_json::Value;
use tera::{Context, Tera};
use tracing::debug;

use crate::{
    error::ServiceError,
    models::{parameters::Parameters, template::RenderResult},
};

const INLINE_TEMPLATE_NAME: &str = "__inline__";

/// A template that parsed successfully and is ready to execute.
pub struct CompiledTemplate {
    tera: Tera,
}

/// Thin wrapper over tera exposing separate parse and execute steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, text: &str) -> Result<CompiledTemplate, ServiceError> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());

        tera.add_raw_template(INLINE_TEMPLATE_NAME, text)
            .map_err(|e| ServiceError::Parse(error_chain(&e)))?;

        Ok(CompiledTemplate { tera })
    }

    pub fn execute(
        &self,
        template: &CompiledTemplate,
        parameters: &Parameters,
    ) -> Result<String, ServiceError> {
        let context = Context::from_value(Value::Object(parameters.clone()))
            .map_err(|e| ServiceError::Internal(error_chain(&e)))?;

        template
            .tera
            .render(INLINE_TEMPLATE_NAME, &context)
            .map_err(|e| ServiceError::Execute(error_chain(&e)))
    }

    pub fn render(
        &self,
        text: &str,
        parameters: &Parameters,
        encoding_format: Option<&str>,
    ) -> Result<RenderResult, ServiceError> {
        debug!(
            template_bytes = text.len(),
            parameter_count = parameters.len(),
            "Rendering template"
        );

        let compiled = self.parse(text)?;
        let output = self.execute(&compiled, parameters)?;

        Ok(RenderResult::new(output, encoding_format))
    }
}

/// Joins an error with all of its sources. Tera keeps the useful detail
/// (line, column, missing variable) in the source chain.
fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(cause.to_string().trim());
        source = cause.source();
    }

    message
}
