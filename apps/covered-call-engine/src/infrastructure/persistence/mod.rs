//! Persistence adapters.

mod in_memory;
mod turso_store;

pub use in_memory::InMemoryStore;
pub use turso_store::TursoStore;
