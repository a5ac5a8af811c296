//! Repository implementations module.
//!
//! Currently one implementation of the repository traits:
//! - `local`: in-memory implementation for unit testing and local
//!   development. A SQL-backed implementation slots in behind the same
//!   traits.

pub mod local;

pub use local::LocalRepository;
