//! Domain layer for the civic planning dashboard.
//!
//! Holds the project record, its lifecycle and validation rules, and the
//! read-only traffic/parking snapshot types. Every persistence backend (the
//! Postgres store, the in-memory store, the client-side blob store) goes
//! through the functions in [`project`] so they all enforce the same rules.

pub mod error;
pub mod project;
pub mod snapshot;
pub mod types;
