//! # Request/Response Protocol
//!
//! Message shapes accepted by the `StateOwner` and the single-use reply
//! channel each of them carries.
//!
//! ## Rules
//!
//! - Every request gets a fresh `ResponseSlot`; slots are never reused.
//! - A slot carries exactly one value. `ResponseSlot::deliver` consumes it.
//! - The caller's wait on its `PendingResponse` is the only synchronization
//!   between that caller and the owner.

pub mod messages;
pub mod slot;

pub use messages::*;
pub use slot::*;
