//! Distributed mutual-exclusion leases.
//!
//! A lock provider hands out named, non-reentrant leases across process
//! instances. Acquisition uses a bounded wait; a holder that crashes loses
//! its lease on expiry, so no (plan, user) pair can be locked out
//! permanently.

pub mod error;
pub mod key;
pub mod memory;
pub mod postgres;
pub mod provider;

pub use error::LockError;
pub use key::result_creation_key;
pub use memory::InMemoryLockProvider;
pub use postgres::PostgresLockProvider;
pub use provider::{LockGuard, LockProvider};
