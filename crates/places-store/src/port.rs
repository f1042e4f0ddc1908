//! In-process port: serves a store on a fresh channel per open.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use places_core::{PlacesStore, Result};
use places_rpc::{serve, Channel, PortOpener};

/// `PortOpener` that spawns an endpoint task for `store` on every open.
///
/// Must be opened from within a tokio runtime.
#[derive(Clone)]
pub struct LocalPort {
    store: Arc<dyn PlacesStore>,
}

impl LocalPort {
    pub fn new(store: Arc<dyn PlacesStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PortOpener for LocalPort {
    async fn open(&self) -> Result<Channel> {
        let (client, server) = Channel::pair();
        tokio::spawn(serve(server, Arc::clone(&self.store)));
        debug!(subsystem = "endpoint", "Local port opened");
        Ok(client)
    }
}
