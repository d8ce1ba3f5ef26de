//! # Vellum Core
//!
//! The content lifecycle and versioning engine: drafts, scheduled
//! publication, published posts with capped version history, plus per-post
//! likes and comments. Storage, clock, and authorization are ports; this
//! crate contains no infrastructure dependencies beyond the async runtime
//! primitives it locks with.

pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;

pub use engine::Engine;
pub use error::EngineError;
