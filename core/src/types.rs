use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::{CompareError, CompareResult};

/// Paired traditional-LLM and agent answers for one query, plus the
/// agent's reasoning trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub traditional_response: String,
    #[serde(default)]
    pub parlant_response: String,
    #[serde(default)]
    pub reasoning: String,
}

/// Body of `POST /api/compare`
#[derive(Serialize, Debug)]
pub struct CompareRequest<'a> {
    pub query: &'a str,
}

/// Payload of `GET /api/demo-queries`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoQueriesData {
    #[serde(default)]
    pub queries: Vec<String>,
}

/// Payload of `GET /api/health`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthData {
    #[serde(default)]
    pub initialized: Option<bool>,
    #[serde(default)]
    pub parlant_ready: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Readiness of the comparison backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    pub ready: bool,
}

impl HealthStatus {
    /// Reads the readiness flag from whichever envelope shape arrived.
    /// The HTTP status is ignored: an unhealthy backend answers 503 with a
    /// perfectly readable body.
    pub fn from_envelope(envelope: &ResponseEnvelope) -> Self {
        let data = match envelope {
            ResponseEnvelope::Standard(env) if !env.status => return Self { ready: false },
            ResponseEnvelope::Standard(env) => &env.data,
            ResponseEnvelope::Legacy(body) => body,
        };
        let ready = HealthData::deserialize(data)
            .map(|health| health.parlant_ready)
            .unwrap_or(false);
        Self { ready }
    }
}

/// The `{ status, status_code, message, data }` wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct StandardEnvelope {
    #[serde(default)]
    pub status: bool,
    pub status_code: u16,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    pub data: Value,
}

impl StandardEnvelope {
    pub fn is_failure(&self) -> bool {
        !self.status || self.status_code >= 400
    }
}

/// A backend response body in one of the two shapes the API has shipped.
#[derive(Debug, Clone)]
pub enum ResponseEnvelope {
    Standard(StandardEnvelope),
    /// Payload fields sit directly at the top level
    Legacy(Value),
}

impl ResponseEnvelope {
    /// Classifies a body. A body is standard when it carries a non-zero
    /// numeric `status_code` and an object `data`; anything else is legacy.
    pub fn from_value(value: Value) -> Self {
        if !looks_standard(&value) {
            return ResponseEnvelope::Legacy(value);
        }

        match serde_json::from_value::<StandardEnvelope>(value.clone()) {
            Ok(envelope) => ResponseEnvelope::Standard(envelope),
            Err(e) => {
                warn!("Envelope has status_code and data but is malformed ({}), reading it as legacy", e);
                ResponseEnvelope::Legacy(value)
            }
        }
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, ResponseEnvelope::Standard(_))
    }

    /// Normalizes either shape into the payload type.
    ///
    /// Standard envelopes fail on `status == false` or `status_code >= 400`
    /// with the envelope message. Legacy bodies fail on a non-success HTTP
    /// status with their `message` or `error` field. `fallback` is used when
    /// the body gives no message of its own.
    pub fn into_payload<T: DeserializeOwned>(
        self,
        http_status: StatusCode,
        fallback: &str,
    ) -> CompareResult<T> {
        match self {
            ResponseEnvelope::Standard(env) => {
                if env.is_failure() {
                    return Err(CompareError::ServerError {
                        status_code: env.status_code,
                        message: non_empty(env.message).unwrap_or_else(|| fallback.to_string()),
                    });
                }
                serde_json::from_value(env.data).map_err(|e| {
                    CompareError::ParsingError(format!("Unexpected payload in envelope: {}", e))
                })
            }
            ResponseEnvelope::Legacy(body) => {
                if !http_status.is_success() {
                    let message = ["message", "error"]
                        .iter()
                        .find_map(|key| body.get(*key).and_then(Value::as_str))
                        .filter(|m| !m.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| fallback.to_string());
                    return Err(CompareError::ServerError {
                        status_code: http_status.as_u16(),
                        message,
                    });
                }
                serde_json::from_value(body).map_err(|e| {
                    CompareError::ParsingError(format!("Unexpected response body: {}", e))
                })
            }
        }
    }
}

fn looks_standard(value: &Value) -> bool {
    let has_code = value
        .get("status_code")
        .and_then(Value::as_u64)
        .is_some_and(|code| code != 0);
    let has_data = value.get("data").is_some_and(Value::is_object);
    has_code && has_data
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.is_empty())
}
