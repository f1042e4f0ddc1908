//! Channel transport between a client surface and the store endpoint.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc;

use places_core::Result;

/// One end of a bidirectional, in-order-per-direction message channel.
#[derive(Debug)]
pub struct Channel {
    /// Messages written to the peer.
    pub outbound: mpsc::UnboundedSender<JsonValue>,
    /// Messages received from the peer.
    pub inbound: mpsc::UnboundedReceiver<JsonValue>,
}

impl Channel {
    /// Create two connected ends: what one sends, the other receives.
    pub fn pair() -> (Channel, Channel) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();
        (
            Channel {
                outbound: a_tx,
                inbound: b_rx,
            },
            Channel {
                outbound: b_tx,
                inbound: a_rx,
            },
        )
    }
}

/// Performs the one-time handshake that yields a client's channel.
///
/// Implementations return `Error::Transport` when the port cannot be opened.
#[async_trait]
pub trait PortOpener: Send + Sync {
    async fn open(&self) -> Result<Channel>;
}
