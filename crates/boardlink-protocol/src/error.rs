//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means "this line from the server could not be
//! understood". The client logs it and drops the line; it is never fatal
//! to the connection.

/// Errors that can occur while decoding a server line.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The line does not start with any known keyword.
    #[error("unrecognized line: {0:?}")]
    Unrecognized(String),

    /// The `{...}` or `[...]` payload could not be parsed.
    #[error("malformed {kind} payload: {reason}")]
    MalformedPayload { kind: &'static str, reason: String },

    /// A required field is absent from the payload.
    #[error("{kind} payload is missing field {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// A field that should hold a number does not.
    #[error("field {field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// A list payload is not a valid string array.
    #[error("malformed list: {0}")]
    List(#[source] serde_json::Error),
}
