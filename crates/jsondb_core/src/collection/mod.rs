//! Collection handles.
//!
//! A collection is one JSON file. Both handle kinds run the same
//! transforms from [`ops`] inside the same load → transform → save cycle,
//! and differ only in whether file I/O blocks the thread or suspends a
//! task:
//!
//! - [`Collection`]: `std::fs`, for synchronous callers
//! - [`AsyncCollection`]: `tokio::fs`, for async callers
//!
//! Writes to one collection are serialized by its [`MutationGate`].

mod blocking;
mod engine;
mod gate;
mod nonblocking;
mod ops;

pub use blocking::Collection;
pub use gate::MutationGate;
pub use nonblocking::AsyncCollection;

pub(crate) use engine::CollectionCore;
pub(crate) use gate::GateRegistry;
