//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod gate;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use gate::{AccessGate, AllowAll};
pub use store::{Collection, StateStore, StoreError};
