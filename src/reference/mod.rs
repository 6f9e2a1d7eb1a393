//! Static reference data: gates, centers and channels.
//!
//! Everything here is immutable process-wide data. Nothing is loaded at
//! runtime and nothing is ever mutated.

pub mod centers;
pub mod channels;
pub mod gates;

pub use centers::{center_of, Center};
pub use channels::{Channel, CHANNELS};
pub use gates::{gate, Gate, GATES};
