//! Input validation for identifiers, resources and addresses, and
//! sanitization of caller-supplied detail values.

use std::net::IpAddr;

use serde_json::{Map, Value};

use crate::error::ValidationError;

pub const MAX_USER_ID_LEN: usize = 100;
pub const MAX_RESOURCE_LEN: usize = 500;
pub const MAX_DETAIL_LEN: usize = 1024;

/// Accept 1-100 characters drawn from ASCII letters, digits, `@`, `.`,
/// `_` and `-`.
pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    let len = user_id.chars().count();
    if len == 0 || len > MAX_USER_ID_LEN {
        return Err(ValidationError::InvalidUserId);
    }
    if user_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-'))
    {
        Ok(())
    } else {
        Err(ValidationError::InvalidUserId)
    }
}

/// Accept 1-500 path-safe characters (ASCII alphanumerics, `/`, `_`,
/// `.`, `-`). Any `..` is rejected outright.
pub fn validate_resource(resource: &str) -> Result<(), ValidationError> {
    let len = resource.chars().count();
    if len == 0 || len > MAX_RESOURCE_LEN || resource.contains("..") {
        return Err(ValidationError::InvalidResource);
    }
    if resource
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-'))
    {
        Ok(())
    } else {
        Err(ValidationError::InvalidResource)
    }
}

pub fn validate_ip_address(ip: &str) -> Result<(), ValidationError> {
    ip.parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidIpAddress(ip.to_string()))
}

/// Validate the optional actor fields shared by every logging call.
pub fn validate_actor(
    user_id: Option<&str>,
    resource: Option<&str>,
    source_ip: Option<&str>,
) -> Result<(), ValidationError> {
    if let Some(user_id) = user_id {
        validate_user_id(user_id)?;
    }
    if let Some(resource) = resource {
        validate_resource(resource)?;
    }
    if let Some(ip) = source_ip {
        validate_ip_address(ip)?;
    }
    Ok(())
}

/// Strip control characters from string values (recursively) and cap
/// each string at [`MAX_DETAIL_LEN`] characters. Keys are kept as given.
pub fn sanitize_details(details: Map<String, Value>) -> Map<String, Value> {
    details
        .into_iter()
        .map(|(key, value)| (key, sanitize_value(value)))
        .collect()
}

fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_text(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(sanitize_details(map)),
        other => other,
    }
}

fn sanitize_text(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control())
        .take(MAX_DETAIL_LEN)
        .collect()
}
