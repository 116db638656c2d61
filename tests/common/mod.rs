use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use template_service::{
    api::{API_KEY_HEADER, AppState, router},
    clients::{loader::TemplateLoader, template::TemplateEngine},
    config::Config,
    handlers::default_registry,
};
use tower::ServiceExt;

/// Config with a short retry budget so failing fetches finish quickly.
pub fn test_config() -> Config {
    Config {
        template_fetch_timeout_seconds: 2,
        max_retry_attempts: 2,
        initial_retry_delay_ms: 10,
        max_retry_delay_ms: 20,
        ..Config::default()
    }
}

pub fn test_app(api_key: Option<&str>) -> Result<Router> {
    let config = Config {
        api_key: api_key.map(str::to_string),
        ..test_config()
    };

    Ok(router(Arc::new(AppState::new(&config)?)))
}

pub fn test_loader() -> Result<TemplateLoader> {
    TemplateLoader::new(&test_config())
}

pub fn test_registry() -> Result<template_service::handlers::registry::ActionRegistry> {
    Ok(default_registry(test_loader()?, TemplateEngine::new()))
}

pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&Value>,
    api_key: Option<&str>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(key) = api_key {
        builder = builder.header(API_KEY_HEADER, key);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, json))
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Result<(StatusCode, Value)> {
    send(app, "POST", uri, Some(body), None).await
}
