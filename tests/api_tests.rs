use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::common::{post_json, send, test_app};

/// Test: Flat REST body renders the canonical greeting
#[tokio::test]
async fn test_rest_render_inline_template() -> Result<()> {
    let (status, body) = post_json(
        test_app(None)?,
        "/v1/api/render",
        &json!({"template": "Hello {{Name}}!", "parameters": {"Name": "World"}}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"output": "Hello World!", "encodingFormat": "text/plain", "contentSize": 12})
    );

    Ok(())
}

/// Test: Canonical field names work the same as the legacy aliases
#[tokio::test]
async fn test_rest_render_canonical_fields() -> Result<()> {
    let (status, body) = post_json(
        test_app(None)?,
        "/v1/api/render",
        &json!({
            "text": "{{ greeting }}, {{ who }}",
            "templateParameters": [
                {"name": "greeting", "value": "Hi"},
                {"name": "who", "value": "there"}
            ],
            "encodingFormat": "text/markdown"
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "Hi, there");
    assert_eq!(body["encodingFormat"], "text/markdown");

    Ok(())
}

/// Test: Missing template text and reference is a missing-field error
#[tokio::test]
async fn test_rest_render_missing_template() -> Result<()> {
    let (status, body) = post_json(
        test_app(None)?,
        "/v1/api/render",
        &json!({"parameters": {"Name": "World"}}),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "missing_field");
    assert_eq!(body["error"], "template or templateId is required");

    Ok(())
}

/// Test: Unbalanced delimiters report a parse failure
#[tokio::test]
async fn test_rest_render_parse_failure() -> Result<()> {
    let (status, body) = post_json(
        test_app(None)?,
        "/v1/api/render",
        &json!({"template": "Hello {{ Name"}),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "parse_failure");
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("template syntax error")),
        "unexpected error: {}",
        body["error"]
    );

    Ok(())
}

/// Test: Undefined variables report an execution failure
#[tokio::test]
async fn test_rest_render_execution_failure() -> Result<()> {
    let (status, body) = post_json(
        test_app(None)?,
        "/v1/api/render",
        &json!({"template": "Hello {{ Name }}", "parameters": {}}),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "execution_failure");
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("template execution error")),
        "unexpected error: {}",
        body["error"]
    );

    Ok(())
}

/// Test: Body that is not a JSON object is rejected
#[tokio::test]
async fn test_rest_render_invalid_body() -> Result<()> {
    let (status, body) = post_json(test_app(None)?, "/v1/api/render", &json!(["nope"])).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_body");

    Ok(())
}

/// Test: Semantic endpoint returns the completed action with its result
#[tokio::test]
async fn test_semantic_replace_action() -> Result<()> {
    let (status, body) = post_json(
        test_app(None)?,
        "/v1/api/semantic/action",
        &json!({
            "@context": "https://schema.org",
            "@type": "ReplaceAction",
            "identifier": "render-1",
            "object": {
                "@type": "MediaObject",
                "text": "{% for item in items %}{{ item }};{% endfor %}",
                "encodingFormat": "text/csv"
            },
            "targetCollection": {"items": ["a", "b"]},
            "agent": {"@type": "Person", "name": "Ada"}
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["@type"], "ReplaceAction");
    assert_eq!(body["identifier"], "render-1");
    assert_eq!(body["actionStatus"], "CompletedActionStatus");
    assert_eq!(
        body["result"],
        json!({"@type": "MediaObject", "text": "a;b;", "encodingFormat": "text/csv", "contentSize": 4})
    );
    assert_eq!(body["agent"]["name"], "Ada", "unknown fields are echoed back");

    Ok(())
}

/// Test: Schema.org IRI action statuses are accepted on input
#[tokio::test]
async fn test_semantic_accepts_iri_action_status() -> Result<()> {
    let (status, body) = post_json(
        test_app(None)?,
        "/v1/api/semantic/action",
        &json!({
            "@type": "ReplaceAction",
            "actionStatus": "https://schema.org/PotentialActionStatus",
            "object": {"text": "ok"}
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actionStatus"], "CompletedActionStatus");
    assert_eq!(body["result"]["text"], "ok");

    Ok(())
}

/// Test: Unknown fields inside the object are echoed back
#[tokio::test]
async fn test_semantic_echoes_object_fields() -> Result<()> {
    let (status, body) = post_json(
        test_app(None)?,
        "/v1/api/semantic/action",
        &json!({
            "@type": "ReplaceAction",
            "object": {
                "@type": "MediaObject",
                "@id": "urn:template:welcome",
                "name": "welcome",
                "text": "hi"
            }
        }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["object"]["@id"], "urn:template:welcome");
    assert_eq!(body["object"]["name"], "welcome");
    assert_eq!(body["object"]["text"], "hi");

    Ok(())
}

/// Test: Unsupported action kinds are named in the error
#[tokio::test]
async fn test_semantic_unsupported_action() -> Result<()> {
    let (status, body) = post_json(
        test_app(None)?,
        "/v1/api/semantic/action",
        &json!({"@type": "TransferAction", "object": {"text": "x"}}),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "unsupported_action");
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.contains("TransferAction")),
        "error should name the action type: {}",
        body["error"]
    );

    Ok(())
}

/// Test: Envelope without an object is a missing-field error
#[tokio::test]
async fn test_semantic_missing_object() -> Result<()> {
    let (status, body) = post_json(
        test_app(None)?,
        "/v1/api/semantic/action",
        &json!({"@type": "ReplaceAction"}),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "object is required");

    Ok(())
}

/// Test: API key gate protects render routes but not health
#[tokio::test]
async fn test_api_key_required_when_configured() -> Result<()> {
    let request = json!({"template": "ok"});

    let (status, body) = send(
        test_app(Some("secret"))?,
        "POST",
        "/v1/api/render",
        Some(&request),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthorized");

    let (status, _) = send(
        test_app(Some("secret"))?,
        "POST",
        "/v1/api/semantic/action",
        Some(&json!({"@type": "ReplaceAction", "object": {"text": "ok"}})),
        Some("wrong"),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        test_app(Some("secret"))?,
        "POST",
        "/v1/api/render",
        Some(&request),
        Some("secret"),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "ok");

    let (status, _) = send(test_app(Some("secret"))?, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

/// Test: Health endpoint reports the template engine check
#[tokio::test]
async fn test_health_check() -> Result<()> {
    let (status, body) = send(test_app(None)?, "GET", "/health", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["template_engine"]["status"], "healthy");
    assert!(body["timestamp"].is_string());
    assert_ne!(body["checks"]["template_engine"]["response_time_ms"], Value::Null);

    Ok(())
}
