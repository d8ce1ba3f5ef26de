//! # Vellum Infrastructure
//!
//! Concrete implementations of the ports defined in `vellum-core`: an
//! in-memory store, a JSON-file store, and the periodic sweep driver.

pub mod scheduler;
pub mod store;

pub use scheduler::{Scheduler, SweepConfig};
pub use store::{InMemoryStore, JsonFileStore};
