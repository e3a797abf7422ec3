//! Client to server rewriting: Windows URI normalization.
//!
//! Lifecycle notifications are mirrored (original first, then a copy carrying the
//! normalized URI) so the server tracks the document under both keys. Completion
//! requests are replaced by the normalized copy, since a request must not be sent
//! twice.

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::lsp::transport::Rewrite;
use crate::lsp::types::{set_document_uri, DocumentMethod, Envelope};
use crate::lsp::uri::normalize_file_uri;

#[derive(Debug, Default, Clone, Copy)]
pub struct InboundTransformer;

impl Rewrite for InboundTransformer {
    fn rewrite(&self, body: Bytes) -> Vec<Bytes> {
        let Envelope::Document {
            kind,
            method,
            uri,
            mut value,
        } = Envelope::parse(&body)
        else {
            trace!(body_len = body.len(), "Forwarding client message unchanged");
            return vec![body];
        };

        let Some(normalized) = normalize_file_uri(&uri).filter(|n| *n != uri) else {
            trace!(method = %method, uri = %uri, "URI needs no normalization");
            return vec![body];
        };

        // `value` is parsed from the body, so editing it leaves `body` intact.
        if !set_document_uri(&mut value, normalized.clone()) {
            return vec![body];
        }
        let rewritten = match serde_json::to_vec(&value) {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                warn!(method = %method, error = %e, "Failed to re-serialize message, forwarding original");
                return vec![body];
            }
        };

        match kind {
            DocumentMethod::Lifecycle => {
                debug!(method = %method, from = %uri, to = %normalized, "Mirroring lifecycle notification");
                vec![body, rewritten]
            }
            DocumentMethod::Completion => {
                debug!(method = %method, from = %uri, to = %normalized, "Normalizing completion request");
                vec![rewritten]
            }
        }
    }
}
