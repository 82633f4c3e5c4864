//! Object storage backends for result documents.

pub mod gcs;
pub mod memory;

pub use gcs::GcsObjectStore;
pub use memory::{InMemoryObjectStore, StoredObject};
