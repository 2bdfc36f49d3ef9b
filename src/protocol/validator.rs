//! Validation of decoded envelopes before the rest of the crate trusts them.
//!
//! Both validators walk their rules in a fixed order and stop at the first
//! violation, reporting it as a human-readable reason. A body that passes
//! the rules is then decoded into the typed envelope; a decode failure is
//! the final rule.

use serde_json::Value;
use thiserror::Error;

use super::envelope::{RequestEnvelope, ResponseEnvelope};
use super::types::MessageType;
use crate::capability::CapabilityDescriptor;

const REQUEST_FIELDS: [&str; 6] = ["version", "id", "timestamp", "type", "sender", "payload"];
const RESPONSE_FIELDS: [&str; 5] = ["version", "id", "timestamp", "type", "payload"];

/// First rule an envelope violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ValidationError {
    reason: String,
}

impl ValidationError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

type Result<T> = std::result::Result<T, ValidationError>;

/// Validate an inbound request addressed to `capability`.
pub fn validate_request(raw: &Value, capability: &CapabilityDescriptor) -> Result<RequestEnvelope> {
    require_fields(raw, &REQUEST_FIELDS)?;
    require_type(raw, MessageType::Request)?;

    let payload = &raw["payload"];
    let service = payload
        .get("service")
        .ok_or_else(|| ValidationError::new("Missing 'service' in payload"))?;
    if service.as_str() != Some(capability.name.as_str()) {
        return Err(ValidationError::new("Unknown service requested"));
    }

    let schema = &capability.input_schema;
    for field in &schema.required {
        let value = payload
            .get(field)
            .ok_or_else(|| ValidationError::new(format!("Missing '{}' in payload", field)))?;

        if schema.is_string(field) && value.as_str().map_or(true, |s| s.trim().is_empty()) {
            return Err(ValidationError::new(format!(
                "'{}' must be a non-empty string",
                field
            )));
        }
    }

    serde_json::from_value(raw.clone())
        .map_err(|e| ValidationError::new(format!("Malformed request envelope: {}", e)))
}

/// Validate a response against the ID of the request that was sent.
pub fn validate_response(raw: &Value, request_id: &str) -> Result<ResponseEnvelope> {
    require_fields(raw, &RESPONSE_FIELDS)?;
    require_type(raw, MessageType::Response)?;

    if raw.get("correlation_id").and_then(Value::as_str) != Some(request_id) {
        return Err(ValidationError::new("Correlation ID mismatch"));
    }

    if !raw["payload"].get("success").is_some_and(Value::is_boolean) {
        return Err(ValidationError::new("Missing 'success' in response payload"));
    }

    let envelope: ResponseEnvelope = serde_json::from_value(raw.clone())
        .map_err(|e| ValidationError::new(format!("Malformed response envelope: {}", e)))?;

    if envelope.payload.outcome().is_none() {
        return Err(ValidationError::new(
            "Response payload must carry exactly one of 'result' or 'error'",
        ));
    }

    Ok(envelope)
}

fn require_fields(raw: &Value, fields: &[&str]) -> Result<()> {
    match fields.iter().find(|field| raw.get(**field).is_none()) {
        Some(field) => Err(ValidationError::new(format!("Missing required field: {}", field))),
        None => Ok(()),
    }
}

fn require_type(raw: &Value, expected: MessageType) -> Result<()> {
    if raw["type"].as_str() == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new(format!(
            "Message type must be '{}'",
            expected.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::FoodSafetyHandler;
    use crate::capability::CapabilityHandler;
    use crate::protocol::envelope::{build_request, build_response, ReplyTo};
    use crate::protocol::types::{AgentIdentity, CapabilityInput, ErrorBody, Outcome};
    use serde_json::json;

    fn descriptor() -> CapabilityDescriptor {
        FoodSafetyHandler::default().descriptor().clone()
    }

    fn raw_request(food_item: Value) -> Value {
        let mut input = CapabilityInput::new();
        input.insert("food_item".to_string(), food_item);
        let request = build_request(
            AgentIdentity::new("client", "Client"),
            AgentIdentity::new("service", "Service"),
            "chicken_food_safety_check",
            input,
        );
        serde_json::to_value(request).unwrap()
    }

    fn reason(raw: &Value) -> String {
        validate_request(raw, &descriptor()).unwrap_err().reason().to_string()
    }

    #[test]
    fn test_built_request_is_valid() {
        let raw = raw_request(json!("corn"));
        let envelope = validate_request(&raw, &descriptor()).unwrap();
        assert_eq!(envelope.payload.input["food_item"], "corn");
        assert_eq!(envelope.id, raw["id"].as_str().unwrap());
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        for field in REQUEST_FIELDS {
            let mut raw = raw_request(json!("corn"));
            raw.as_object_mut().unwrap().remove(field);
            assert_eq!(reason(&raw), format!("Missing required field: {}", field));
        }

        let mut raw = raw_request(json!("corn"));
        raw.as_object_mut().unwrap().remove("id");
        raw.as_object_mut().unwrap().remove("version");
        assert_eq!(reason(&raw), "Missing required field: version");
    }

    #[test]
    fn test_non_object_body_is_missing_fields() {
        assert_eq!(reason(&json!([1, 2, 3])), "Missing required field: version");
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut raw = raw_request(json!("corn"));
        raw["type"] = json!("response");
        assert_eq!(reason(&raw), "Message type must be 'request'");

        raw["type"] = json!("broadcast");
        assert_eq!(reason(&raw), "Message type must be 'request'");
    }

    #[test]
    fn test_service_rules() {
        let mut raw = raw_request(json!("corn"));
        raw["payload"].as_object_mut().unwrap().remove("service");
        assert_eq!(reason(&raw), "Missing 'service' in payload");

        raw["payload"]["service"] = json!("weather_forecast");
        assert_eq!(reason(&raw), "Unknown service requested");
    }

    #[test]
    fn test_food_item_rules() {
        let mut raw = raw_request(json!("corn"));
        raw["payload"].as_object_mut().unwrap().remove("food_item");
        assert_eq!(reason(&raw), "Missing 'food_item' in payload");

        for bad in [json!(""), json!("   "), json!(42), json!(null)] {
            let raw = raw_request(bad);
            assert_eq!(reason(&raw), "'food_item' must be a non-empty string");
        }
    }

    #[test]
    fn test_malformed_sender_fails_typed_decode() {
        let mut raw = raw_request(json!("corn"));
        raw["sender"] = json!("just-a-string");
        assert!(reason(&raw).starts_with("Malformed request envelope:"));

        let mut raw = raw_request(json!("corn"));
        raw["timestamp"] = json!("yesterday");
        assert!(reason(&raw).starts_with("Malformed request envelope:"));
    }

    #[test]
    fn test_validation_does_not_mutate_input() {
        let raw = raw_request(json!("  Corn "));
        let before = raw.clone();
        validate_request(&raw, &descriptor()).unwrap();
        assert_eq!(raw, before);
    }

    fn raw_response(request_id: &str, outcome: Outcome) -> Value {
        let origin = ReplyTo {
            correlation_id: Some(request_id.to_string()),
            recipient: None,
        };
        let response = build_response(&origin, AgentIdentity::new("service", "Service"), "svc", outcome);
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_valid_response() {
        let raw = raw_response("req-1", Outcome::Success(json!({"status": "safe"})));
        let envelope = validate_response(&raw, "req-1").unwrap();
        assert!(envelope.payload.success);
    }

    #[test]
    fn test_response_correlation_mismatch() {
        let raw = raw_response("req-1", Outcome::Success(json!({"status": "safe"})));
        let err = validate_response(&raw, "req-2").unwrap_err();
        assert_eq!(err.reason(), "Correlation ID mismatch");

        let mut raw = raw;
        raw.as_object_mut().unwrap().remove("correlation_id");
        assert_eq!(validate_response(&raw, "req-1").unwrap_err().reason(), "Correlation ID mismatch");
    }

    #[test]
    fn test_response_rules_in_order() {
        let mut raw = raw_response("req-1", Outcome::Failure(ErrorBody::internal()));
        raw.as_object_mut().unwrap().remove("timestamp");
        assert_eq!(
            validate_response(&raw, "req-1").unwrap_err().reason(),
            "Missing required field: timestamp"
        );

        let mut raw = raw_response("req-1", Outcome::Failure(ErrorBody::internal()));
        raw["type"] = json!("request");
        assert_eq!(
            validate_response(&raw, "req-1").unwrap_err().reason(),
            "Message type must be 'response'"
        );

        let mut raw = raw_response("req-1", Outcome::Failure(ErrorBody::internal()));
        raw["payload"]["success"] = json!("false");
        assert_eq!(
            validate_response(&raw, "req-1").unwrap_err().reason(),
            "Missing 'success' in response payload"
        );
    }

    #[test]
    fn test_response_without_sender_or_service_is_accepted() {
        let raw = json!({
            "version": "1.0",
            "id": "resp-1",
            "timestamp": "2026-10-16T12:00:00Z",
            "type": "response",
            "correlation_id": "req-1",
            "payload": {
                "success": true,
                "result": {"food_item": "corn", "status": "safe"}
            }
        });

        let envelope = validate_response(&raw, "req-1").unwrap();
        assert_eq!(envelope.sender, AgentIdentity::default());
        assert!(envelope.payload.service.is_empty());
        assert_eq!(
            envelope.payload.outcome(),
            Some(Outcome::Success(json!({"food_item": "corn", "status": "safe"})))
        );
    }

    #[test]
    fn test_request_still_requires_sender() {
        let mut raw = raw_request(json!("corn"));
        raw.as_object_mut().unwrap().remove("sender");
        assert_eq!(reason(&raw), "Missing required field: sender");
    }

    #[test]
    fn test_response_with_both_result_and_error_rejected() {
        let mut raw = raw_response("req-1", Outcome::Success(json!({})));
        raw["payload"]["error"] = json!({"code": "X", "message": "y"});
        let err = validate_response(&raw, "req-1").unwrap_err();
        assert!(err.reason().contains("exactly one"));
    }
}
