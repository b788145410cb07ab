//! Persistence layer
//!
//! The core never executes queries itself; it talks to an
//! [`AuthRepository`] implementation supplied by the host. A
//! [`MemoryRepository`] ships in-tree for tests and embedded use.

pub mod memory;
pub mod models;
pub mod repository;

pub use memory::MemoryRepository;
pub use repository::{AuthRepository, RepoError, RepoResult};
