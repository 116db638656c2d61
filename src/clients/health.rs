use std::{collections::HashMap, time::Instant};

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    clients::template::TemplateEngine,
    models::health::{HealthCheckResponse, HealthStatus, ServiceHealth},
};

const PROBE_TEMPLATE: &str = "{% if ok %}{{ status }}{% endif %}";

pub struct HealthChecker {
    engine: TemplateEngine,
}

impl HealthChecker {
    pub fn new(engine: TemplateEngine) -> Self {
        Self { engine }
    }

    pub fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        checks.insert("template_engine".to_string(), self.check_engine());

        let status = Self::determine_overall_status(&checks);

        HealthCheckResponse {
            status,
            timestamp: Utc::now(),
            checks,
        }
    }

    fn check_engine(&self) -> ServiceHealth {
        let start = Instant::now();
        let probe = json!({"ok": true, "status": "ready"});
        let parameters = probe.as_object().cloned().unwrap_or_default();

        match self.engine.render(PROBE_TEMPLATE, &parameters, None) {
            Ok(result) if result.output == "ready" => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "Template engine health check passed");
                ServiceHealth::healthy(elapsed)
            }
            Ok(result) => {
                warn!(output = %result.output, "Template engine returned unexpected probe output");
                ServiceHealth::unhealthy(format!("Unexpected probe output: {}", result.output))
            }
            Err(e) => {
                warn!(error = %e, "Template engine health check failed");
                ServiceHealth::unhealthy(e.to_string())
            }
        }
    }

    fn determine_overall_status(checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
        if checks
            .values()
            .any(|health| health.status == HealthStatus::Unhealthy)
        {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        }
    }
}
