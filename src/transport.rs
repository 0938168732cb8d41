//! One-shot TCP request/response exchange with a bulb.

use log::{debug, trace};
use serde_json::Value;

use crate::command::{Command, Response};
use crate::config::Timeouts;
use crate::errors::{Error, ProtocolError};
use crate::runtime::{self, AsyncTcpStream, TcpStream};

type Result<T> = std::result::Result<T, Error>;

/// Send one command to the bulb at `location` and wait for its response.
///
/// Each call opens a fresh connection, writes the request line, reads one
/// response line and drops the connection on every exit path. Unsolicited
/// `props` notifications arriving before the response are skipped.
///
/// The returned [`Response`] may still carry a device-side error; use
/// [`Response::into_reply`] to surface it.
///
/// # Delivery
///
/// Delivery is at most once. If the response does not arrive before the read
/// timeout the command may nevertheless have been executed by the bulb. The
/// client never retries, so toggle-style commands are not applied twice.
pub async fn send(location: &str, command: &Command, timeouts: &Timeouts) -> Result<Response> {
    let line = command.encode()?;

    let mut stream = runtime::timeout(timeouts.connect_timeout(), TcpStream::connect(location))
        .await
        .map_err(|_| {
            Error::connect(
                location,
                std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timeout"),
            )
        })?
        .map_err(|e| Error::connect(location, e))?;

    trace!("TCP send to {}: {}", location, line.trim_end());
    stream
        .write_all(line.as_bytes())
        .await
        .map_err(|e| ProtocolError::io("write", e))?;

    let response = runtime::timeout(timeouts.read_timeout(), read_response(&mut stream))
        .await
        .map_err(|_| ProtocolError::TimedOut(timeouts.read_timeout()))??;

    if response.id != command.id {
        return Err(ProtocolError::IdMismatch {
            expected: command.id,
            got: response.id,
        }
        .into());
    }

    debug!("TCP response from {}: {:?}", location, response);
    Ok(response)
}

async fn read_response(stream: &mut TcpStream) -> Result<Response> {
    loop {
        let mut line = String::new();
        let read = stream
            .read_line(&mut line)
            .await
            .map_err(|e| ProtocolError::io("read", e))?;
        if read == 0 || !line.ends_with('\n') {
            return Err(ProtocolError::Closed.into());
        }

        if is_notification(&line) {
            trace!("Skipping notification: {}", line.trim_end());
            continue;
        }
        return Response::decode(&line);
    }
}

/// Bulbs push `{"method":"props","params":{..}}` to connected clients when
/// their state changes. Those lines carry no id.
fn is_notification(line: &str) -> bool {
    serde_json::from_str::<Value>(line)
        .map(|v| v.get("method").is_some() && v.get("id").is_none())
        .unwrap_or(false)
}
