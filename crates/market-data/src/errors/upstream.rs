use reqwest::StatusCode;
use serde_json::Value;

/// Classification of a failed upstream HTTP call.
///
/// Used purely for logging: whatever the class, the provider method that
/// made the call degrades to an empty result.
///
/// | Class | Status | Body hint |
/// |-------|--------|-----------|
/// | `Unauthorized` | 401 | |
/// | `PlanRestricted` | 403 | `https_access_restricted` sets `https_only` |
/// | `NotFound` | 404 | `invalid_api_function` sets `invalid_endpoint` |
/// | `MonthlyQuotaExceeded` | 429 | `too_many_requests` |
/// | `RateLimited` | 429 | anything else |
/// | `Other` | any other non-2xx | |
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UpstreamFailure {
    /// Bad API key or suspended account.
    Unauthorized,

    /// The endpoint is not part of the current subscription plan.
    PlanRestricted { https_only: bool },

    /// Unknown resource or endpoint.
    NotFound { invalid_endpoint: bool },

    /// The monthly request allowance is used up.
    MonthlyQuotaExceeded,

    /// Too many requests per second.
    RateLimited,

    /// Any other non-success status.
    Other { status: u16, message: String },
}

impl UpstreamFailure {
    /// Classify a non-success response from its status and raw body.
    pub fn classify(status: StatusCode, body: &str) -> Self {
        let message = error_message(body);
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::PlanRestricted {
                https_only: message.contains("https_access_restricted"),
            },
            StatusCode::NOT_FOUND => Self::NotFound {
                invalid_endpoint: message.contains("invalid_api_function"),
            },
            StatusCode::TOO_MANY_REQUESTS => {
                if message.contains("too_many_requests") {
                    Self::MonthlyQuotaExceeded
                } else {
                    Self::RateLimited
                }
            }
            other => Self::Other {
                status: other.as_u16(),
                message,
            },
        }
    }

    /// Human readable description for log lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Unauthorized => "Unauthorized: check your API key or account status".to_string(),
            Self::PlanRestricted { https_only: true } => {
                "HTTPS access not supported on current plan".to_string()
            }
            Self::PlanRestricted { https_only: false } => {
                "This API endpoint is not supported on current plan".to_string()
            }
            Self::NotFound {
                invalid_endpoint: true,
            } => "Invalid API endpoint".to_string(),
            Self::NotFound {
                invalid_endpoint: false,
            } => "Resource not found".to_string(),
            Self::MonthlyQuotaExceeded => "Monthly API request limit reached".to_string(),
            Self::RateLimited => "Rate limit reached".to_string(),
            Self::Other { status, message } if message.is_empty() => format!("HTTP {}", status),
            Self::Other { status, message } => format!("HTTP {} - {}", status, message),
        }
    }
}

/// Pull the upstream error code and message out of a JSON error body.
///
/// Understands `{"error": {"code": .., "message": ..}}` and
/// `{"error": "..."}`; falls back to the raw body text.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    match value.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Object(error)) => {
            let parts: Vec<&str> = ["code", "message"]
                .iter()
                .filter_map(|field| error.get(*field).and_then(Value::as_str))
                .collect();
            parts.join(": ")
        }
        _ => body.trim().to_string(),
    }
}
