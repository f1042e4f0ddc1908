//! # places-store
//!
//! Concrete places stores and an in-process endpoint for them.
//!
//! - [`MemoryPlacesStore`]: volatile store for tests and ephemeral sessions
//! - [`JsonFilePlacesStore`]: store persisted as one JSON document
//! - [`LocalPort`]: `PortOpener` that serves any store on an in-process channel

pub mod file;
pub mod memory;
pub mod port;
mod table;

pub use file::JsonFilePlacesStore;
pub use memory::MemoryPlacesStore;
pub use port::LocalPort;
