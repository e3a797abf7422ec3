//! LSP stream plumbing: framing, message shapes, rewrites, and pumps.
//!
//! ## Design Notes
//!
//! - JSON-RPC framing: `Content-Length: N\r\n\r\n{json}`
//! - Method names come from `lsp-types`
//! - Messages that are not understood are forwarded byte for byte

pub mod framed;
pub mod inbound;
pub mod outbound;
pub mod pump;
pub mod stdio_transport;
pub mod transport;
pub mod types;
pub mod uri;
