//! Mapping of raw HTTP answers onto the client error taxonomy.
//!
//! Everything here works on `(status, body text)` so it can be exercised
//! without a server.

use diq_core::{DiqError, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) const DEFAULT_LOGIN_ERROR: &str = "Wrong username or password";
pub(crate) const DEFAULT_REGISTER_ERROR: &str = "Registration failed";
pub(crate) const MISSING_TOKEN_ERROR: &str = "No access token in response";

/// Registration field errors are checked in this order.
const REGISTER_FIELD_PRIORITY: [&str; 3] = ["username", "email", "password"];

fn parse_json(body: &str) -> Option<Value> {
    serde_json::from_str(body).ok()
}

/// `detail`, then `error`, from a JSON error body.
fn detail_or_error(body: &str) -> Option<String> {
    let value = parse_json(body)?;
    ["detail", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Message for a rejected login.
pub(crate) fn login_error_message(body: &str) -> String {
    detail_or_error(body).unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string())
}

/// First field-level message from a rejected registration.
///
/// Field values are usually arrays of strings and are joined with a space.
pub(crate) fn register_error_message(body: &str) -> String {
    let Some(value) = parse_json(body) else {
        return DEFAULT_REGISTER_ERROR.to_string();
    };

    REGISTER_FIELD_PRIORITY
        .iter()
        .find_map(|field| value.get(*field).and_then(field_message))
        .unwrap_or_else(|| DEFAULT_REGISTER_ERROR.to_string())
}

fn field_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        _ => None,
    }
}

/// Error for a non-2xx answer on a protected route.
pub(crate) fn protected_error(status: StatusCode, body: &str) -> DiqError {
    let message = detail_or_error(body)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        DiqError::unauthorized(message)
    } else {
        DiqError::server_rejected(status.as_u16(), message)
    }
}

/// Decodes a 2xx body, mapping decode failures to `MalformedResponse`.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| DiqError::malformed(format!("Invalid {} payload: {}", what, e)))
}

/// Extracts the `access` token from a successful login body.
pub(crate) fn access_token(body: &str) -> Result<String> {
    parse_json(body)
        .as_ref()
        .and_then(|v| v.get("access"))
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DiqError::malformed(MISSING_TOKEN_ERROR))
}

/// DELETE succeeds on 204 or any other 2xx.
pub(crate) fn is_delete_success(status: StatusCode) -> bool {
    status == StatusCode::NO_CONTENT || status.is_success()
}

#[cfg(test)]
mod tests {
    use super::*;
    use diq_core::decision::DecisionRecord;

    #[test]
    fn test_login_error_prefers_detail() {
        let body = r#"{"detail":"No active account found with the given credentials"}"#;
        assert_eq!(
            login_error_message(body),
            "No active account found with the given credentials"
        );
    }

    #[test]
    fn test_login_error_falls_back_to_error_then_default() {
        assert_eq!(login_error_message(r#"{"error":"locked"}"#), "locked");
        assert_eq!(login_error_message("<html>oops</html>"), DEFAULT_LOGIN_ERROR);
        assert_eq!(login_error_message(""), DEFAULT_LOGIN_ERROR);
    }

    #[test]
    fn test_register_error_field_priority() {
        let body = r#"{
            "password": ["This password is too short."],
            "email": ["Enter a valid email address."],
            "username": ["A user with that username already exists.", "Try another."]
        }"#;
        assert_eq!(
            register_error_message(body),
            "A user with that username already exists. Try another."
        );

        let body = r#"{"password":["Too common."],"email":["Enter a valid email address."]}"#;
        assert_eq!(register_error_message(body), "Enter a valid email address.");

        let body = r#"{"password":["Too common."]}"#;
        assert_eq!(register_error_message(body), "Too common.");
    }

    #[test]
    fn test_register_error_default() {
        assert_eq!(register_error_message(r#"{"other":["x"]}"#), DEFAULT_REGISTER_ERROR);
        assert_eq!(register_error_message("not json"), DEFAULT_REGISTER_ERROR);
    }

    #[test]
    fn test_protected_error_mapping() {
        let err = protected_error(
            StatusCode::UNAUTHORIZED,
            r#"{"detail":"Given token not valid for any token type"}"#,
        );
        assert_eq!(
            err,
            DiqError::unauthorized("Given token not valid for any token type")
        );

        let err = protected_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(err, DiqError::server_rejected(500, "boom"));

        let err = protected_error(StatusCode::NOT_FOUND, "");
        assert_eq!(err, DiqError::server_rejected(404, "Not Found"));
    }

    #[test]
    fn test_access_token() {
        assert_eq!(access_token(r#"{"access":"a.b.c","refresh":"r"}"#).unwrap(), "a.b.c");
        assert_eq!(
            access_token(r#"{"refresh":"r"}"#).unwrap_err(),
            DiqError::malformed(MISSING_TOKEN_ERROR)
        );
        assert!(access_token("").unwrap_err().is_malformed());
    }

    #[test]
    fn test_parse_body_malformed() {
        let err = parse_body::<DecisionRecord>("{not json", "decision").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_delete_success_statuses() {
        assert!(is_delete_success(StatusCode::NO_CONTENT));
        assert!(is_delete_success(StatusCode::OK));
        assert!(!is_delete_success(StatusCode::NOT_FOUND));
    }
}
