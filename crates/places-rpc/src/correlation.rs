//! Correlation of concurrent calls over one shared channel.
//!
//! Every call gets a fresh id and a pending slot. A single reader task owns
//! the inbound side of the channel and routes each response to the slot with
//! the matching id, so responses may arrive in any order.
//!
//! ## Lifecycle
//!
//! 1. The first `connect` (explicit or implied by `issue`) opens the channel
//!    through the `PortOpener` and spawns the reader. Concurrent callers share
//!    the same attempt. A failed attempt is not cached.
//! 2. `issue` registers the pending slot *before* sending the request.
//! 3. The reader resolves and removes the slot when the response arrives.
//!    Responses without an id, or with an id nobody is waiting on, are dropped.
//! 4. If the channel closes, every outstanding call fails with a transport
//!    error and later calls are refused. Marking the link closed and draining
//!    the slots happen under the pending lock, the same lock `issue` holds
//!    while it checks the flag and registers its slot.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use serde_json::Value as JsonValue;
use tokio::sync::{mpsc, oneshot, OnceCell};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use places_core::{Error, Result};

use crate::transport::{Channel, PortOpener};
use crate::wire::{CallId, Request, Response};

type CallOutcome = std::result::Result<JsonValue, String>;
type PendingMap = HashMap<CallId, oneshot::Sender<CallOutcome>>;

fn lock(pending: &Mutex<PendingMap>) -> MutexGuard<'_, PendingMap> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The open channel and its reader.
struct Link {
    outbound: mpsc::UnboundedSender<JsonValue>,
    closed: Arc<AtomicBool>,
    reader: JoinHandle<()>,
}

/// Multiplexes independent calls over one lazily opened channel.
pub struct CorrelationClient {
    opener: Arc<dyn PortOpener>,
    link: OnceCell<Link>,
    pending: Arc<Mutex<PendingMap>>,
    next_id: AtomicU64,
}

impl CorrelationClient {
    pub fn new(opener: Arc<dyn PortOpener>) -> Self {
        Self {
            opener,
            link: OnceCell::new(),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Open the channel if it is not open yet.
    pub async fn connect(&self) -> Result<()> {
        self.link().await.map(|_| ())
    }

    pub fn is_connected(&self) -> bool {
        self.link
            .get()
            .is_some_and(|link| !link.closed.load(Ordering::Acquire))
    }

    /// Number of calls still waiting for a response.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    async fn link(&self) -> Result<&Link> {
        self.link.get_or_try_init(|| self.open_link()).await
    }

    async fn open_link(&self) -> Result<Link> {
        let Channel { outbound, inbound } = self.opener.open().await?;
        let closed = Arc::new(AtomicBool::new(false));
        let reader = tokio::spawn(route_responses(
            inbound,
            Arc::clone(&self.pending),
            Arc::clone(&closed),
        ));
        info!(subsystem = "rpc", "Places channel connected");
        Ok(Link {
            outbound,
            closed,
            reader,
        })
    }

    /// Send a request and return a future for its reply.
    ///
    /// The request is on the wire when this returns, so calls issued in
    /// sequence reach the endpoint in that sequence.
    #[instrument(skip(self, payload), fields(subsystem = "rpc", call_id = tracing::field::Empty))]
    pub async fn issue(&self, action: &str, payload: JsonValue) -> Result<PendingReply> {
        let link = self.link().await?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::Span::current().record("call_id", id);

        let (tx, rx) = oneshot::channel();
        {
            // The reader sets `closed` and drains under this lock, so a slot
            // inserted here is either drained or answered.
            let mut pending = lock(&self.pending);
            if link.closed.load(Ordering::Acquire) {
                return Err(Error::Transport("places channel is closed".to_string()));
            }
            pending.insert(id, tx);
        }

        let message = serde_json::to_value(Request::new(action, payload, id))?;
        if link.outbound.send(message).is_err() {
            lock(&self.pending).remove(&id);
            warn!(call_id = id, action, "Places channel rejected request");
            return Err(Error::Transport(format!(
                "failed to send {action} request: channel closed"
            )));
        }

        debug!(call_id = id, action, "Request sent");
        Ok(PendingReply { id, rx })
    }

    /// Send a request and wait for its reply.
    pub async fn call(&self, action: &str, payload: JsonValue) -> Result<JsonValue> {
        self.issue(action, payload).await?.await
    }
}

impl Drop for CorrelationClient {
    fn drop(&mut self) {
        if let Some(link) = self.link.get() {
            link.reader.abort();
        }
    }
}

/// Reader loop: route each response to its pending slot.
async fn route_responses(
    mut inbound: mpsc::UnboundedReceiver<JsonValue>,
    pending: Arc<Mutex<PendingMap>>,
    closed: Arc<AtomicBool>,
) {
    while let Some(message) = inbound.recv().await {
        let Some(response) = Response::from_message(message) else {
            debug!(subsystem = "rpc", "Dropping message without correlation id");
            continue;
        };

        let id = response.id;
        let slot = lock(&pending).remove(&id);
        match slot {
            // The caller may have stopped waiting; that is fine.
            Some(tx) => {
                let _ = tx.send(response.into_outcome());
            }
            None => debug!(subsystem = "rpc", call_id = id, "Dropping response with unknown id"),
        }
    }

    let orphaned: Vec<_> = {
        let mut pending = lock(&pending);
        closed.store(true, Ordering::Release);
        pending.drain().collect()
    };
    warn!(
        subsystem = "rpc",
        pending = orphaned.len(),
        "Places channel closed"
    );
}

/// A call in flight. Resolves with the endpoint's result.
///
/// Dropping it abandons the call; the slot is released when the response
/// arrives or the channel closes.
#[derive(Debug)]
pub struct PendingReply {
    id: CallId,
    rx: oneshot::Receiver<CallOutcome>,
}

impl PendingReply {
    pub fn id(&self) -> CallId {
        self.id
    }
}

impl Future for PendingReply {
    type Output = Result<JsonValue>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => Err(Error::Store(message)),
            Err(_) => Err(Error::Transport(format!(
                "channel closed before reply to call {id}"
            ))),
        })
    }
}
