//! `/api` handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info};

use super::AppState;
use super::error::ApiError;
use crate::output::CopilotOutput;

const MESSAGE_REQUIRED: &str = "message is required";

/// Liveness check
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

/// Answer one seller question
///
/// Body: `{"message": "...", "neighborhoodContextEnabled": true}`. The flag is
/// optional and anything but `true` counts as off.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CopilotOutput>, ApiError> {
    debug!("chat: called");
    let Json(body) = body.map_err(|e| {
        debug!(error = %e, "chat: body rejected");
        ApiError::BadRequest(MESSAGE_REQUIRED.to_string())
    })?;

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::BadRequest(MESSAGE_REQUIRED.to_string()))?;
    let neighborhood = body.get("neighborhoodContextEnabled").is_some_and(truthy);

    let Some(agent) = state.agent.as_ref() else {
        return Err(ApiError::MissingApiKey(state.api_key_env.clone()));
    };

    info!(question = %message, %neighborhood, "Question");
    let reply = agent.run(message, neighborhood).await?;
    info!(
        request_id = %reply.request_id,
        metrics = reply.output.metrics.len(),
        actions = reply.output.actions.len(),
        "Answer delivered"
    );
    Ok(Json(reply.output))
}

/// Loose flag reading as browsers send it: `false`, `0`, `""` and `null` are off
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
