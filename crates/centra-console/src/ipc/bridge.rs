//! NDJSON bridge between a UI process and the console backend.
//!
//! Each input line is one envelope:
//!
//! ```json
//! {"id": 7, "request": "authenticate", "payload": {"username": "admin", "password": "..."}}
//! ```
//!
//! Each output line answers one envelope, in completion order:
//!
//! ```json
//! {"id": 7, "response": {"success": true, "user": {...}}}
//! {"id": 8, "error": "Unknown request: frobnicate"}
//! ```

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::channel::ConsoleHandle;
use super::types::{Request, Response};

/// A parsed input line.
#[derive(Debug)]
pub struct Incoming {
    pub id: Value,
    pub request: Request,
}

/// Why an input line could not be turned into a request. Carries the id when
/// one could be read so the error can still be correlated.
#[derive(Debug, PartialEq, Eq)]
pub struct BridgeError {
    pub id: Value,
    pub reason: String,
}

/// Parse one NDJSON input line.
pub fn parse_line(line: &str) -> Result<Incoming, BridgeError> {
    let raw: Value = serde_json::from_str(line).map_err(|e| BridgeError {
        id: Value::Null,
        reason: format!("Invalid JSON: {e}"),
    })?;

    let Value::Object(mut fields) = raw else {
        return Err(BridgeError {
            id: Value::Null,
            reason: "Envelope must be a JSON object".to_string(),
        });
    };

    let id = fields.remove("id").unwrap_or(Value::Null);
    let Some(name) = fields.get("request").and_then(Value::as_str) else {
        return Err(BridgeError {
            id,
            reason: "Missing 'request' field".to_string(),
        });
    };
    let name = name.to_string();
    let payload = fields.remove("payload").unwrap_or(Value::Null);

    match Request::parse(&name, payload) {
        Ok(request) => Ok(Incoming { id, request }),
        Err(e) => Err(BridgeError {
            id,
            reason: e.to_string(),
        }),
    }
}

pub fn response_line(id: &Value, response: &Response) -> String {
    json!({ "id": id, "response": response }).to_string()
}

pub fn error_line(err: &BridgeError) -> String {
    json!({ "id": err.id, "error": err.reason }).to_string()
}

/// Decode one raw input line. Invalid UTF-8 becomes an error with no id.
pub fn decode_line(raw: &[u8]) -> Result<&str, BridgeError> {
    std::str::from_utf8(raw).map(str::trim).map_err(|e| BridgeError {
        id: Value::Null,
        reason: format!("Invalid UTF-8: {e}"),
    })
}

/// Serve envelopes from `reader` until EOF, writing responses to `writer`.
///
/// A line that cannot be decoded or parsed is answered with an error line
/// and reading continues. Only EOF or an I/O error ends the loop. Returns
/// once every accepted request has been answered and flushed.
pub async fn serve<R, W>(handle: ConsoleHandle, mut reader: R, writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (out_tx, out_rx) = mpsc::channel::<String>(64);
    let writer_task = tokio::spawn(write_lines(writer, out_rx));
    let mut pending = JoinSet::new();
    let mut buf = Vec::new();

    loop {
        // Bytes read before a reaping branch wins stay in `buf`; the next
        // `read_until` appends to them.
        let read = tokio::select! {
            read = reader.read_until(b'\n', &mut buf) => read?,
            Some(_) = pending.join_next(), if !pending.is_empty() => continue,
        };

        if !buf.is_empty() {
            let parsed = decode_line(&buf).and_then(|line| {
                if line.is_empty() {
                    Ok(None)
                } else {
                    parse_line(line).map(Some)
                }
            });
            buf.clear();

            match parsed {
                Ok(None) => {}
                Ok(Some(Incoming { id, request })) => {
                    debug!(request = request.name(), "Request received");
                    let handle = handle.clone();
                    let out_tx = out_tx.clone();
                    pending.spawn(async move {
                        let out = match handle.invoke(request).await {
                            Ok(response) => response_line(&id, &response),
                            Err(e) => error_line(&BridgeError {
                                id,
                                reason: e.to_string(),
                            }),
                        };
                        let _ = out_tx.send(out).await;
                    });
                }
                Err(err) => {
                    warn!(reason = %err.reason, "Rejected input line");
                    let _ = out_tx.send(error_line(&err)).await;
                }
            }
        }

        if read == 0 {
            break;
        }
    }

    while pending.join_next().await.is_some() {}
    drop(out_tx);

    writer_task
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?
}

async fn write_lines<W>(mut writer: W, mut rx: mpsc::Receiver<String>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ipc::types::{Outcome, names};

    #[test]
    fn parses_envelope_with_payload() {
        let incoming = parse_line(
            r#"{"id": 3, "request": "authenticate", "payload": {"username": "admin", "password": "x"}}"#,
        )
        .unwrap();
        assert_eq!(incoming.id, json!(3));
        assert_eq!(incoming.request.name(), names::AUTHENTICATE);
    }

    #[test]
    fn payload_is_optional_for_plain_requests() {
        let incoming = parse_line(r#"{"id": "a", "request": "getBotStatus"}"#).unwrap();
        assert_eq!(incoming.request, Request::GetBotStatus);
    }

    #[test]
    fn malformed_json_has_no_id() {
        let err = parse_line("{nope").unwrap_err();
        assert_eq!(err.id, Value::Null);
        assert!(err.reason.starts_with("Invalid JSON"));
    }

    #[test]
    fn unknown_request_keeps_id() {
        let err = parse_line(r#"{"id": 9, "request": "frobnicate"}"#).unwrap_err();
        assert_eq!(err.id, json!(9));
        assert_eq!(err.reason, "Unknown request: frobnicate");
    }

    #[test]
    fn missing_request_name() {
        let err = parse_line(r#"{"id": 1, "payload": {}}"#).unwrap_err();
        assert_eq!(err.reason, "Missing 'request' field");

        let err = parse_line("[1, 2]").unwrap_err();
        assert_eq!(err.reason, "Envelope must be a JSON object");
    }

    #[test]
    fn invalid_utf8_is_an_error_without_id() {
        let err = decode_line(b"\xff\xfe garbage\n").unwrap_err();
        assert_eq!(err.id, Value::Null);
        assert!(err.reason.starts_with("Invalid UTF-8"));

        assert_eq!(decode_line(b"  {}\r\n").unwrap(), "{}");
    }

    #[test]
    fn output_lines_are_single_json_objects() {
        let line = response_line(&json!(4), &Response::Outcome(Outcome::ok()));
        assert!(!line.contains('\n'));
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, json!({"id": 4, "response": {"success": true}}));
    }
}
