//! JSON request/response adapter around `EnvelopeCipher`.
//!
//! Accepts the same event shapes a function-as-a-service entry point
//! receives:
//!
//! - a JSON string holding the request document,
//! - an object whose `body` field is such a string,
//! - the request object itself.
//!
//! Responses are `{ "statusCode": u16, "body": "<json string>" }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::crypto::EntropySource;
use crate::errors::{FieldSealError, Result};
use crate::registry::KeyRegistry;
use crate::service::{EnvelopeCipher, ALGORITHM};

/// Request body for an encrypt call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest {
    pub plaintext: String,
    pub key_name: String,
}

/// Request body for a decrypt call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    pub envelope: String,
    pub key_name: String,
    /// Who is asking; recorded in the log only.
    #[serde(default)]
    pub request_user: Option<String>,
}

/// Handler response, shaped like an HTTP gateway reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl Response {
    fn ok(body: Value) -> Self {
        Self {
            status_code: 200,
            body: body.to_string(),
        }
    }

    fn failure(status_code: u16, code: &str, message: &str) -> Self {
        Self {
            status_code,
            body: json!({ "error": code, "message": message }).to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// The body parsed back into JSON.
    pub fn body_json(&self) -> Result<Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| FieldSealError::SerializationError(format!("response body: {e}")))
    }
}

/// Decode a request document from any of the supported event shapes.
pub fn parse_event<T: DeserializeOwned>(event: &Value) -> Result<T> {
    let parsed = match event {
        Value::String(doc) => serde_json::from_str(doc),
        Value::Object(map) => match map.get("body") {
            Some(Value::String(doc)) => serde_json::from_str(doc),
            _ => serde_json::from_value(event.clone()),
        },
        _ => {
            return Err(FieldSealError::InvalidRequest(
                "event must be a JSON object or string".into(),
            ))
        }
    };

    parsed.map_err(|e| FieldSealError::InvalidRequest(e.to_string()))
}

/// Handle an encrypt event.
pub fn handle_encrypt<R, E>(cipher: &EnvelopeCipher<R, E>, event: &Value) -> Response
where
    R: KeyRegistry + ?Sized,
    E: EntropySource,
{
    let result = parse_event::<EncryptRequest>(event).and_then(|req| {
        if req.plaintext.is_empty() {
            return Err(FieldSealError::InvalidRequest(
                "plaintext cannot be empty".into(),
            ));
        }
        log::info!("[encrypt] request for key '{}'", req.key_name);

        let envelope = cipher.encrypt(&req.plaintext, &req.key_name)?;
        Ok(json!({
            "envelope": envelope,
            "algorithm": ALGORITHM,
            "keyName": req.key_name,
        }))
    });

    into_response(result, "ENCRYPTION_FAILED")
}

/// Handle a decrypt event.
pub fn handle_decrypt<R, E>(cipher: &EnvelopeCipher<R, E>, event: &Value) -> Response
where
    R: KeyRegistry + ?Sized,
    E: EntropySource,
{
    let result = parse_event::<DecryptRequest>(event).and_then(|req| {
        log::info!(
            "[decrypt] request for key '{}' by {}",
            req.key_name,
            req.request_user.as_deref().unwrap_or("<anonymous>")
        );

        let decrypted = cipher.decrypt(&req.envelope, &req.key_name)?;
        Ok(json!({ "decrypted": decrypted }))
    });

    into_response(result, "DECRYPTION_FAILED")
}

fn into_response(result: Result<Value>, failure_code: &str) -> Response {
    match result {
        Ok(body) => Response::ok(body),
        Err(e) => {
            log::warn!("{failure_code}: {e}");
            match e {
                FieldSealError::InvalidRequest(_) => {
                    Response::failure(400, "INVALID_REQUEST", &e.to_string())
                }
                FieldSealError::KeyNotFound(_) => {
                    Response::failure(404, "KEY_NOT_FOUND", &e.to_string())
                }
                _ => Response::failure(500, failure_code, &e.to_string()),
            }
        }
    }
}
