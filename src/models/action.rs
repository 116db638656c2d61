//! JSON-LD action envelope types (Schema.org vocabulary).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{
    parameters::{ParameterSource, Parameters},
    template::RenderResult,
};

pub const SCHEMA_ORG_CONTEXT: &str = "https://schema.org";
pub const REPLACE_ACTION: &str = "ReplaceAction";
pub const MEDIA_OBJECT: &str = "MediaObject";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    #[serde(
        rename = "PotentialActionStatus",
        alias = "https://schema.org/PotentialActionStatus",
        alias = "http://schema.org/PotentialActionStatus"
    )]
    Potential,
    #[serde(
        rename = "ActiveActionStatus",
        alias = "https://schema.org/ActiveActionStatus",
        alias = "http://schema.org/ActiveActionStatus"
    )]
    Active,
    #[serde(
        rename = "CompletedActionStatus",
        alias = "https://schema.org/CompletedActionStatus",
        alias = "http://schema.org/CompletedActionStatus"
    )]
    Completed,
    #[serde(
        rename = "FailedActionStatus",
        alias = "https://schema.org/FailedActionStatus",
        alias = "http://schema.org/FailedActionStatus"
    )]
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticAction {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(rename = "@type")]
    pub action_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Template source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<MediaObject>,

    /// Primary parameter source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_collection: Option<ParameterSource>,

    /// Used as the parameter source when `targetCollection` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_property: Option<ParameterSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_status: Option<ActionStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MediaObject>,

    /// Fields this service does not interpret, echoed back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObject {
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_size: Option<usize>,

    /// Secondary parameter source; overrides the action-level one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Parameters>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SemanticAction {
    pub fn replace(object: MediaObject) -> Self {
        Self {
            context: Some(Value::String(SCHEMA_ORG_CONTEXT.to_string())),
            action_type: REPLACE_ACTION.to_string(),
            object: Some(object),
            ..Default::default()
        }
    }

    pub fn with_parameters(mut self, parameters: Option<ParameterSource>) -> Self {
        self.target_collection = parameters;
        self
    }

    /// The action-level parameter source, preferring `targetCollection`.
    pub fn parameter_source(&self) -> Option<&ParameterSource> {
        self.target_collection
            .as_ref()
            .or(self.additional_property.as_ref())
    }

    pub fn complete(mut self, result: RenderResult) -> Self {
        self.result = Some(MediaObject::from(result));
        self.action_status = Some(ActionStatus::Completed);
        self
    }

    /// Reads the rendered result back out of a completed action.
    pub fn render_result(&self) -> Option<RenderResult> {
        let result = self.result.as_ref()?;
        let output = result.text.clone()?;

        Some(RenderResult::new(output, result.encoding_format.as_deref()))
    }
}

impl MediaObject {
    /// Template reference: `contentUrl`, falling back to `identifier`.
    pub fn reference(&self) -> Option<&str> {
        self.content_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or(self.identifier.as_deref())
    }
}

impl From<RenderResult> for MediaObject {
    fn from(result: RenderResult) -> Self {
        Self {
            object_type: Some(MEDIA_OBJECT.to_string()),
            text: Some(result.output),
            encoding_format: Some(result.encoding_format),
            content_size: Some(result.content_size),
            ..Default::default()
        }
    }
}
