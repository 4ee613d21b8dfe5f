//! Error types surfaced by generated request code at runtime.
//!
//! These are the "ValidationError" family: they are always returned to the
//! caller of a generated method, never a process abort.

use thiserror::Error;

/// Parameter-building error returned by generated `get_parameters` /
/// `get_query_parameters` / `get_slug_parameters` methods.
#[derive(Debug, Error)]
pub enum ParamError {
    /// A required string field was left empty.
    #[error("{key} is required, empty string given")]
    RequiredEmpty { key: String },

    /// A required integer field was left at zero.
    #[error("{key} is required, 0 given")]
    RequiredZero { key: String },

    /// A field value fell outside its valid-values set.
    #[error("{key} value {value} is invalid")]
    InvalidValue { key: String, value: String },

    /// A field value could not be serialized into the parameter map.
    #[error("parameter serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParamError {
    pub fn required_empty(key: impl Into<String>) -> Self {
        Self::RequiredEmpty { key: key.into() }
    }

    pub fn required_zero(key: impl Into<String>) -> Self {
        Self::RequiredZero { key: key.into() }
    }

    pub fn invalid_value(key: impl Into<String>, value: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

/// Transport-level error raised by an [`ApiClient`](crate::ApiClient)
/// implementation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be constructed.
    #[error("request build error: {0}")]
    Build(String),

    /// The transport failed to deliver the request.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The API gateway answered with an error status.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
}

/// Error returned by a generated dispatch (`do_request`) method.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// Decoding the response (or the nested response-data payload) failed.
    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The decoded response failed its validation capability.
    #[error("response validation failed: {0}")]
    Validation(String),

    /// Dynamic path resolution failed.
    #[error("dynamic path error: {0}")]
    DynamicPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_error_messages_name_the_key() {
        let err = ParamError::required_empty("symbol");
        assert_eq!(err.to_string(), "symbol is required, empty string given");

        let err = ParamError::required_zero("page");
        assert_eq!(err.to_string(), "page is required, 0 given");
    }

    #[test]
    fn test_invalid_value_names_key_and_value() {
        let err = ParamError::invalid_value("side", "hold");
        let msg = err.to_string();
        assert!(msg.contains("side"));
        assert!(msg.contains("hold"));
    }

    #[test]
    fn test_request_error_wraps_param_error() {
        let err: RequestError = ParamError::required_empty("symbol").into();
        assert!(err.to_string().contains("symbol"));
    }
}
