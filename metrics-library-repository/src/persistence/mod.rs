//! Persistence backends for library items.
//!
//! - [`MockPersistence`]: in-memory, for tests and local development
//! - [`FilePersistence`]: one JSON document per item under a data directory

mod filesystem;
mod memory;

pub use filesystem::FilePersistence;
pub use memory::MockPersistence;
