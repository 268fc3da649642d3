use crate::error::LlmError;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const MISSING_MODEL_PHRASES: &[&str] = &["not found", "does not exist", "no such model", "unknown model"];

/// Build the connection pool shared by every call a client makes.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::ProviderUnavailable(format!("Failed to build HTTP client: {e}")))
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Read a response body and decode it as `T`.
///
/// Non-success statuses become `ModelUnknown` on a 404 for a model request or
/// when the body names the requested model as missing, `ProviderUnavailable`
/// otherwise. A success status with a
/// body we cannot decode is a protocol error.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
    model: Option<&str>,
) -> Result<T, LlmError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| LlmError::from_transport(context, e))?;

    if !status.is_success() {
        return Err(classify_failure(status, &body, context, model));
    }

    serde_json::from_str(&body)
        .map_err(|e| LlmError::ProviderProtocol(format!("{context}: unexpected payload: {e}")))
}

fn classify_failure(status: StatusCode, body: &str, context: &str, model: Option<&str>) -> LlmError {
    if let Some(model) = model {
        if status == StatusCode::NOT_FOUND || reports_missing_model(body, model) {
            return LlmError::model_unknown(model);
        }
    }
    LlmError::ProviderUnavailable(format!("{context} returned {status}: {}", body.trim()))
}

fn reports_missing_model(body: &str, model: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains(&model.to_lowercase()) && MISSING_MODEL_PHRASES.iter().any(|p| lower.contains(p))
}
