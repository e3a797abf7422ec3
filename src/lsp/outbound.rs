//! Server to client rewriting.
//!
//! Some servers send `window/logMessage` with a non-string `params.message`,
//! which strict clients reject. The value is replaced by its JSON text.
//! Every other body is forwarded as the original bytes, never re-serialized.

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

use crate::lsp::transport::Rewrite;
use crate::lsp::types::Envelope;

#[derive(Debug, Default, Clone, Copy)]
pub struct OutboundSanitizer;

impl OutboundSanitizer {
    pub fn sanitize(&self, body: Bytes) -> Bytes {
        let Envelope::LogMessage { message, mut value } = Envelope::parse(&body) else {
            return body;
        };

        let text = match serde_json::to_string(&message) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to stringify log message, forwarding original");
                return body;
            }
        };
        let Some(slot) = value.pointer_mut("/params/message") else {
            return body;
        };
        *slot = Value::String(text);

        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                debug!("Stringified non-string window/logMessage payload");
                Bytes::from(bytes)
            }
            Err(e) => {
                warn!(error = %e, "Failed to re-serialize log message, forwarding original");
                body
            }
        }
    }
}

impl Rewrite for OutboundSanitizer {
    fn rewrite(&self, body: Bytes) -> Vec<Bytes> {
        vec![self.sanitize(body)]
    }
}
