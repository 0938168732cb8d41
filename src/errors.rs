use std::io;

/// All error types that can occur when talking to Yeelight bulbs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bulb address could not be resolved or the connection could not be
    /// established in time. Also raised when the discovery socket cannot be set up.
    #[error("cannot connect to {addr}: {err}")]
    Connect { addr: String, err: io::Error },

    /// Failed to serialize a command to JSON.
    #[error("failed to encode command: {0}")]
    Encode(serde_json::Error),

    /// The bulb answered with something unusable, or rejected the command.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// No known device matches the token and it is not a literal address.
    #[error("no light matches {0:?}; run discovery or pass an IP address")]
    NotFound(String),

    /// A caller-supplied argument failed a client-side precondition.
    #[error("invalid argument: {0}")]
    Validation(String),
}

/// Failures of the request/response exchange once a connection is up.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The bulb closed the connection before a full line arrived.
    #[error("connection closed before a response line arrived")]
    Closed,

    /// Writing the request or reading the response failed.
    #[error("socket {action} failed: {err}")]
    Io { action: &'static str, err: io::Error },

    /// No response line arrived within the read timeout.
    #[error("no response within {0:?}")]
    TimedOut(std::time::Duration),

    /// The response line is not valid JSON for a response.
    #[error("malformed response: {0}")]
    Malformed(serde_json::Error),

    /// The response carries an id that does not belong to the sent command.
    #[error("response id {got} does not match command id {expected}")]
    IdMismatch { expected: u32, got: u32 },

    /// The result payload does not have the shape the method declares.
    #[error("unexpected result for {method}: {result}")]
    UnexpectedResult { method: String, result: String },

    /// The result holds fewer values than requested.
    #[error("short result: expected {expected} values, got {got}")]
    ShortResult { expected: usize, got: usize },

    /// A result value has the wrong type or cannot be parsed.
    #[error("bad value for {field}: {value}")]
    BadValue { field: &'static str, value: String },

    /// The bulb understood the request and refused it.
    #[error("device rejected command ({code}): {message}")]
    Rejected { code: i64, message: String },
}

impl Error {
    /// Create a new connect error
    pub fn connect(addr: &str, err: io::Error) -> Self {
        Error::Connect {
            addr: addr.to_string(),
            err,
        }
    }

    /// Create a new validation error
    pub fn validation(reason: impl Into<String>) -> Self {
        Error::Validation(reason.into())
    }

    /// Returns `true` when the device itself refused the command, as opposed
    /// to a transport or decoding failure.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Error::Protocol(ProtocolError::Rejected { .. }))
    }
}

impl ProtocolError {
    pub(crate) fn io(action: &'static str, err: io::Error) -> Self {
        ProtocolError::Io { action, err }
    }

    pub(crate) fn bad_value(field: &'static str, value: impl ToString) -> Self {
        ProtocolError::BadValue {
            field,
            value: value.to_string(),
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
