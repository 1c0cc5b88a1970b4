//! Prediction wire model
//!
//! Browser forms post numbers as strings, so numeric fields accept either a
//! JSON number or a numeric string. Missing fields take the documented
//! defaults; anything present but unusable is an error.

use serde::Serialize;
use serde_json::{Map, Value};

use rul_core::constants::{DEFAULT_ERROR_COUNT, DEFAULT_TEMPERATURE, DEFAULT_USAGE_HOURS};
use rul_core::{DeviceKind, PredictionResult};

use crate::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct PredictRequest {
    pub device: String,
    pub usage_hours: f64,
    pub temperature: f64,
    pub error_count: u32,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub result: PredictionResult,
    /// Server wall-clock time, HH:MM:SS
    pub time: String,
}

impl PredictRequest {
    /// Parse a raw request body
    pub fn from_json(body: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::InvalidInput(format!("Invalid JSON body: {}", e)))?;

        match value {
            Value::Object(fields) => Self::from_fields(&fields),
            other => Err(AppError::InvalidInput(format!(
                "Expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Result<Self, AppError> {
        let device = match fields.get("device") {
            None => DeviceKind::default().name().to_string(),
            Some(Value::String(s)) => s.clone(),
            // Not a name; stays unrecognized
            Some(other) => other.to_string(),
        };

        let usage_hours = match fields.get("usage_hours") {
            None => DEFAULT_USAGE_HOURS,
            Some(v) => real("usage_hours", v)?,
        };

        let temperature = match fields.get("temperature") {
            None => DEFAULT_TEMPERATURE,
            Some(v) => real("temperature", v)?,
        };

        let error_count = match fields.get("error_count") {
            None => DEFAULT_ERROR_COUNT,
            Some(v) => count("error_count", v)?,
        };

        Ok(Self { device, usage_hours, temperature, error_count })
    }
}

fn real(field: &str, value: &Value) -> Result<f64, AppError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::InvalidInput(format!("{} must be a number, got {}", field, value)))
}

fn count(field: &str, value: &Value) -> Result<u32, AppError> {
    let parsed: Option<i64> = match value {
        Value::Number(n) => n
            .as_i64()
            // floats truncate toward zero
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n >= 0 => u32::try_from(n)
            .map_err(|_| AppError::InvalidInput(format!("{} is too large: {}", field, value))),
        Some(_) => Err(AppError::InvalidInput(format!("{} must be non-negative, got {}", field, value))),
        None => Err(AppError::InvalidInput(format!("{} must be an integer, got {}", field, value))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<PredictRequest, AppError> {
        PredictRequest::from_json(body.as_bytes())
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let request = parse("{}").unwrap();
        assert_eq!(
            request,
            PredictRequest {
                device: "ECG Monitor".to_string(),
                usage_hours: 1000.0,
                temperature: 40.0,
                error_count: 0,
            }
        );
    }

    #[test]
    fn test_form_strings_are_coerced() {
        let request = parse(
            r#"{"device":"Ventilator","usage_hours":"1200","temperature":"45.0","error_count":"1"}"#,
        )
        .unwrap();
        assert_eq!(request.device, "Ventilator");
        assert_eq!(request.usage_hours, 1200.0);
        assert_eq!(request.temperature, 45.0);
        assert_eq!(request.error_count, 1);
    }

    #[test]
    fn test_numeric_fields() {
        let request = parse(r#"{"usage_hours":3500.5,"temperature":-3,"error_count":2.9}"#).unwrap();
        assert_eq!(request.usage_hours, 3500.5);
        assert_eq!(request.temperature, -3.0);
        assert_eq!(request.error_count, 2);
    }

    #[test]
    fn test_malformed_fields() {
        assert!(parse(r#"{"usage_hours":"lots"}"#).is_err());
        assert!(parse(r#"{"temperature":null}"#).is_err());
        assert!(parse(r#"{"temperature":true}"#).is_err());
        assert!(parse(r#"{"error_count":"1.5"}"#).is_err());
        assert!(parse(r#"{"error_count":-1}"#).is_err());
        assert!(parse(r#"{"error_count":99999999999}"#).is_err());
    }

    #[test]
    fn test_oversized_count_reports_sent_value() {
        let message = parse(r#"{"error_count":1e30}"#).unwrap_err().to_string();
        assert!(message.contains("1e30"), "{}", message);
        assert!(!message.contains(&i64::MAX.to_string()));

        let message = parse(r#"{"error_count":"-4"}"#).unwrap_err().to_string();
        assert!(message.contains("\"-4\""), "{}", message);
    }

    #[test]
    fn test_body_must_be_an_object() {
        assert!(parse("not json").is_err());
        let err = parse("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_non_string_device_is_kept_as_text() {
        let request = parse(r#"{"device":3}"#).unwrap();
        assert_eq!(request.device, "3");
    }
}
