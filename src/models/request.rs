use serde_json::{Map, Value};

use crate::{
    error::ServiceError,
    models::{
        action::{MEDIA_OBJECT, MediaObject, SemanticAction},
        parameters::ParameterSource,
    },
};

/// `(canonical, legacy alias)` field names accepted by the flat REST body.
const TEXT_FIELD: (&str, &str) = ("text", "template");
const IDENTIFIER_FIELD: (&str, &str) = ("identifier", "templateId");
const PARAMETERS_FIELD: (&str, &str) = ("templateParameters", "parameters");

/// Flat render request after alias normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRequest {
    pub text: Option<String>,
    pub identifier: Option<String>,
    pub template_parameters: Option<ParameterSource>,
    pub encoding_format: Option<String>,
}

impl NormalizedRequest {
    /// Normalizes an untyped request body. Never fails on missing fields;
    /// see [`NormalizedRequest::validate`].
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, ServiceError> {
        let text = aliased(body, TEXT_FIELD).map(string_field).transpose()?;
        let identifier = aliased(body, IDENTIFIER_FIELD)
            .map(string_field)
            .transpose()?;
        let template_parameters = aliased(body, PARAMETERS_FIELD)
            .cloned()
            .map(serde_json::from_value::<ParameterSource>)
            .transpose()?;
        let encoding_format = present(body.get("encodingFormat"))
            .map(string_field)
            .transpose()?;

        Ok(Self {
            text,
            identifier,
            template_parameters,
            encoding_format,
        })
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        let populated = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());

        if populated(&self.text) || populated(&self.identifier) {
            Ok(())
        } else {
            Err(ServiceError::MissingField("template or templateId"))
        }
    }

    /// Wraps the request into a `ReplaceAction` envelope.
    pub fn into_action(self) -> SemanticAction {
        let object = MediaObject {
            object_type: Some(MEDIA_OBJECT.to_string()),
            text: self.text.filter(|text| !text.is_empty()),
            content_url: self.identifier.filter(|id| !id.is_empty()),
            encoding_format: self.encoding_format,
            ..Default::default()
        };

        SemanticAction::replace(object).with_parameters(self.template_parameters)
    }
}

/// Canonical value when populated, otherwise the alias value when present.
fn aliased<'a>(body: &'a Map<String, Value>, (canonical, alias): (&str, &str)) -> Option<&'a Value> {
    present(body.get(canonical)).or_else(|| present(body.get(alias)))
}

/// Treats `null` and `""` the same as a missing field.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

fn string_field(value: &Value) -> Result<String, ServiceError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ServiceError::InvalidBody(format!("expected a string, got {}", value)))
}
