//! Wire messages exchanged over a places channel.
//!
//! Requests are `{action, payload, id}`; responses are `{id, result}` or
//! `{id, error}`. Messages travel as JSON values so the transport never needs
//! to know their shape.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Correlation id of one call. Allocated from 1 upward, never reused.
pub type CallId = u64;

/// A request from a client surface to the store endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub action: String,
    #[serde(default)]
    pub payload: JsonValue,
    /// Absent for fire-and-forget requests, which get no response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CallId>,
}

impl Request {
    pub fn new(action: impl Into<String>, payload: JsonValue, id: CallId) -> Self {
        Self {
            action: action.into(),
            payload,
            id: Some(id),
        }
    }
}

/// A reply from the store endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: CallId,
    #[serde(default)]
    pub result: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok(id: CallId, result: JsonValue) -> Self {
        Self {
            id,
            result,
            error: None,
        }
    }

    pub fn err(id: CallId, message: impl Into<String>) -> Self {
        Self {
            id,
            result: JsonValue::Null,
            error: Some(message.into()),
        }
    }

    /// Decode an inbound message. Anything without a numeric `id` is `None`.
    pub fn from_message(message: JsonValue) -> Option<Self> {
        serde_json::from_value(message).ok()
    }

    /// The result, or the endpoint's error message.
    pub fn into_outcome(self) -> Result<JsonValue, String> {
        match self.error {
            Some(message) => Err(message),
            None => Ok(self.result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = Request::new("getAllPlaces", json!({}), 7);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"action": "getAllPlaces", "payload": {}, "id": 7})
        );
    }

    #[test]
    fn test_request_without_id_omits_field() {
        let request: Request = serde_json::from_value(json!({"action": "deleteAllHistory"})).unwrap();
        assert_eq!(request.id, None);
        assert_eq!(request.payload, JsonValue::Null);
        assert!(serde_json::to_value(&request).unwrap().get("id").is_none());
    }

    #[test]
    fn test_response_from_message_requires_id() {
        assert!(Response::from_message(json!({"result": 1})).is_none());
        assert!(Response::from_message(json!({"id": "seven", "result": 1})).is_none());
        assert!(Response::from_message(json!("noise")).is_none());

        let response = Response::from_message(json!({"id": 3})).unwrap();
        assert_eq!(response.id, 3);
        assert_eq!(response.result, JsonValue::Null);
    }

    #[test]
    fn test_response_outcome() {
        assert_eq!(Response::ok(1, json!([1])).into_outcome(), Ok(json!([1])));
        assert_eq!(
            Response::err(1, "boom").into_outcome(),
            Err("boom".to_string())
        );
    }
}
