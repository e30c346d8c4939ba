//! Scenario sharing via opaque URL tokens.
//!
//! Decoding fails closed: a token of a version this build does not
//! implement is rejected outright rather than parsed best-effort.

mod codec;
mod error;
mod snapshot;

/// The only token version this build reads and writes.
pub const SHARE_VERSION: u32 = 1;

pub use codec::{decode, encode, try_decode};
pub use error::ShareError;
pub use snapshot::{ShareSnapshot, SharedTraveler};
