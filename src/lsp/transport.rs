//! Per-direction rewrite abstraction.
use bytes::Bytes;
use std::fmt;

/// Rewrites one frame body into the ordered bodies to forward.
/// - Input is the raw body exactly as received (not necessarily JSON).
/// - Returning the input untouched is the pass-through path.
pub trait Rewrite: Send + Sync {
    fn rewrite(&self, body: Bytes) -> Vec<Bytes>;
}

/// Which way a pump moves bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client stdin to server stdin.
    Inbound,
    /// Server stdout to client stdout.
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => f.write_str("client->server"),
            Direction::Outbound => f.write_str("server->client"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Rewrite};
    use bytes::Bytes;

    struct Doubler;

    impl Rewrite for Doubler {
        fn rewrite(&self, body: Bytes) -> Vec<Bytes> {
            vec![body.clone(), body]
        }
    }

    #[test]
    fn rewrite_is_object_safe() {
        let rewriters: Vec<Box<dyn Rewrite>> = vec![Box::new(Doubler)];
        let out = rewriters[0].rewrite(Bytes::from_static(b"{}"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn direction_labels() {
        assert_eq!(Direction::Inbound.to_string(), "client->server");
        assert_eq!(Direction::Outbound.to_string(), "server->client");
    }
}
