//! Recognized message shapes.
//!
//! Bodies are decoded into one of a few tagged variants. Anything that does not
//! match a variant exactly is [`Envelope::Opaque`] and is forwarded untouched.

use lsp_types::notification::{
    DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument, DidSaveTextDocument,
    LogMessage, Notification, WillSaveTextDocument,
};
use lsp_types::request::{Completion, Request};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text document lifecycle notifications.
pub const LIFECYCLE_METHODS: [&str; 5] = [
    DidOpenTextDocument::METHOD,
    DidChangeTextDocument::METHOD,
    DidCloseTextDocument::METHOD,
    WillSaveTextDocument::METHOD,
    DidSaveTextDocument::METHOD,
];

/// Which document method a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentMethod {
    /// didOpen / didChange / didClose / willSave / didSave.
    Lifecycle,
    /// textDocument/completion.
    Completion,
}

impl DocumentMethod {
    pub fn classify(method: &str) -> Option<Self> {
        if LIFECYCLE_METHODS.contains(&method) {
            Some(Self::Lifecycle)
        } else if method == Completion::METHOD {
            Some(Self::Completion)
        } else {
            None
        }
    }
}

#[derive(Deserialize)]
struct MethodProbe {
    method: String,
}

#[derive(Deserialize)]
struct DocumentShape {
    params: DocumentParams,
}

#[derive(Deserialize)]
struct DocumentParams {
    #[serde(rename = "textDocument")]
    text_document: TextDocumentRef,
}

#[derive(Deserialize)]
struct TextDocumentRef {
    uri: String,
}

#[derive(Deserialize)]
struct LogMessageShape {
    params: LogMessageParams,
}

#[derive(Deserialize)]
struct LogMessageParams {
    #[serde(default, deserialize_with = "present")]
    message: Option<Value>,
}

// Distinguishes an explicit `null` (Some(Null)) from a missing field (None).
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A decoded message body.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// A document notification or request with a string `params.textDocument.uri`.
    Document {
        kind: DocumentMethod,
        method: String,
        uri: String,
        /// Parsed copy of the body; independent of the raw bytes.
        value: Value,
    },
    /// `window/logMessage` whose `params.message` is present but not a string.
    LogMessage { message: Value, value: Value },
    /// Anything else, including non-JSON bodies.
    Opaque,
}

impl Envelope {
    pub fn parse(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Self::Opaque;
        };
        // Derived structs also accept sequences; envelopes are always objects.
        if !value.is_object() {
            return Self::Opaque;
        }
        let Ok(MethodProbe { method }) = MethodProbe::deserialize(&value) else {
            return Self::Opaque;
        };

        if let Some(kind) = DocumentMethod::classify(&method) {
            return match DocumentShape::deserialize(&value) {
                Ok(shape) => Self::Document {
                    kind,
                    method,
                    uri: shape.params.text_document.uri,
                    value,
                },
                Err(_) => Self::Opaque,
            };
        }

        if method == LogMessage::METHOD {
            if let Ok(LogMessageShape {
                params:
                    LogMessageParams {
                        message: Some(message),
                    },
            }) = LogMessageShape::deserialize(&value)
            {
                if !message.is_string() {
                    return Self::LogMessage { message, value };
                }
            }
        }

        Self::Opaque
    }
}

/// Replace `params.textDocument.uri` in an already-classified document message.
pub fn set_document_uri(value: &mut Value, uri: String) -> bool {
    match value.pointer_mut("/params/textDocument/uri") {
        Some(slot) => {
            *slot = Value::String(uri);
            true
        }
        None => false,
    }
}
