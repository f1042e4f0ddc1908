//! # places-rpc
//!
//! Turns one bidirectional, unordered message channel into many concurrent,
//! independently awaitable calls against a places store.
//!
//! This crate provides:
//! - The `{action, payload, id}` / `{id, result}` wire messages
//! - A channel abstraction and the `PortOpener` seam that establishes it
//! - `CorrelationClient`, which assigns ids and resolves pending calls
//! - `PlacesClient`, the typed facade used by UI surfaces
//! - `serve`, the store-side loop answering requests for any `PlacesStore`
//!
//! ## Example
//!
//! ```ignore
//! use places_rpc::PlacesClient;
//! use places_store::{LocalPort, MemoryPlacesStore};
//!
//! let port = LocalPort::new(Arc::new(MemoryPlacesStore::default()));
//! let places = PlacesClient::new(Arc::new(port));
//!
//! places.upsert(RecordPatch::new("https://example.com/").with_bookmarked(true)).await?;
//! let records = places.fetch_all().await?;
//! ```

pub mod client;
pub mod correlation;
pub mod endpoint;
pub mod transport;
pub mod wire;

pub use client::PlacesClient;
pub use correlation::{CorrelationClient, PendingReply};
pub use endpoint::{dispatch, serve};
pub use transport::{Channel, PortOpener};
pub use wire::{CallId, Request, Response};
