//! HTTP Request/Response Types

use fortress_core::domain::{LogTail, OutputFileEntry, SaveEntry};
use fortress_core::error::AppError;
use serde::Serialize;
use serde_json::Value;

/// Body of POST /api/start, /api/stop and /api/restart
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ServiceRequest {
    pub service: Option<String>,
}

impl ServiceRequest {
    /// Fields are read one by one; an absent body targets every service
    pub fn from_body(body: Option<&Value>) -> Result<Self, AppError> {
        Ok(Self {
            service: service_field(body)?,
        })
    }
}

/// Body of POST /api/build
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildRequest {
    pub service: Option<String>,
    pub no_cache: bool,
}

impl BuildRequest {
    pub fn from_body(body: Option<&Value>) -> Result<Self, AppError> {
        Ok(Self {
            service: service_field(body)?,
            no_cache: body
                .and_then(|b| b.get("no_cache"))
                .is_some_and(is_truthy),
        })
    }
}

/// Empty-ish JSON values (null, false, 0, "", [], {}) read as unset
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// `service` as a compose service name; strings and numbers pass through
fn service_field(body: Option<&Value>) -> Result<Option<String>, AppError> {
    let Some(value) = body.and_then(|b| b.get("service")) else {
        return Ok(None);
    };
    if !is_truthy(value) {
        return Ok(None);
    }
    match value {
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(AppError::Validation(format!(
            "service must be a string, got {}",
            other
        ))),
    }
}

/// Query of GET /api/logs on the management API
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LogsQuery {
    pub service: Option<String>,
    pub lines: Option<usize>,
}

impl LogsQuery {
    /// Parse `service=` and `lines=`; an unparsable `lines` is ignored
    pub fn parse(query: Option<&str>) -> Self {
        let mut parsed = Self::default();
        let Some(query) = query else {
            return parsed;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "service" if !value.is_empty() => parsed.service = Some(value.into_owned()),
                "lines" => parsed.lines = value.parse().ok(),
                _ => {}
            }
        }
        parsed
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SavesResponse {
    pub saves: Vec<SaveEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<LogTail>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputFilesResponse {
    pub files: Vec<OutputFileEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigUpdateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConfigUpdateResponse {
    pub fn updated() -> Self {
        Self {
            success: true,
            message: Some("Configuration updated".to_string()),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_logs_query() {
        assert_eq!(LogsQuery::parse(None), LogsQuery::default());
        assert_eq!(
            LogsQuery::parse(Some("service=dwarf-fortress&lines=20")),
            LogsQuery {
                service: Some("dwarf-fortress".to_string()),
                lines: Some(20),
            }
        );
        assert_eq!(
            LogsQuery::parse(Some("service=&lines=abc")),
            LogsQuery::default()
        );
    }

    #[test]
    fn test_build_request_defaults() {
        assert_eq!(BuildRequest::from_body(None).unwrap(), BuildRequest::default());
        assert_eq!(
            BuildRequest::from_body(Some(&json!({}))).unwrap(),
            BuildRequest::default()
        );
    }

    #[test]
    fn test_fields_read_independently() {
        let build =
            BuildRequest::from_body(Some(&json!({"service": "dashy", "no_cache": "yes"}))).unwrap();
        assert_eq!(build.service.as_deref(), Some("dashy"));
        assert!(build.no_cache);

        let build = BuildRequest::from_body(Some(&json!({"service": 7, "no_cache": 0}))).unwrap();
        assert_eq!(build.service.as_deref(), Some("7"));
        assert!(!build.no_cache);

        let stop = ServiceRequest::from_body(Some(&json!({"service": ""}))).unwrap();
        assert!(stop.service.is_none());
    }

    #[test]
    fn test_structured_service_rejected() {
        let result = ServiceRequest::from_body(Some(&json!({"service": ["a", "b"]})));
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = ServiceRequest::from_body(Some(&json!({"service": true})));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_config_response_shape() {
        let ok = serde_json::to_value(ConfigUpdateResponse::updated()).unwrap();
        assert_eq!(
            ok,
            json!({"success": true, "message": "Configuration updated"})
        );

        let err = serde_json::to_value(ConfigUpdateResponse::rejected("bad")).unwrap();
        assert_eq!(err, json!({"success": false, "error": "bad"}));
    }
}
