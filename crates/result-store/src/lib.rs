//! Durable storage for flash-sale results.
//!
//! One row per (plan, user) attempt, keyed by the caller-supplied result id.
//! The store also enforces a backstop for the core invariant (at most one
//! non-Failed result per (plan, user)) via a partial unique index, so a bug
//! above it cannot silently corrupt the data.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use error::{ResultStoreError, Result};
pub use memory::InMemoryResultRepository;
pub use postgres::PostgresResultRepository;
pub use repository::{FlashSaleResultRepository, ResultListFilter};
