//! Stdio proxy between an LSP client and a wrapped language server.
//!
//! Client to server, Windows `file:` URIs in document lifecycle notifications and
//! completion requests are normalized to the `file:///d%3A/...` form. Server to
//! client, `window/logMessage` payloads with a non-string `message` are
//! stringified. Everything else passes through untouched.

pub mod app;
pub mod cli;
pub mod error;
pub mod lsp;

pub use error::{Result, ShimError};
