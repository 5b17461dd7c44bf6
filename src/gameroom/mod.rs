//! Session layer for live tables.
//!
//! - [`SessionManager`]: registry of tables, client lifecycle, command
//!   dispatch, and broadcast fan-out
//! - [`ClientMessage`] / [`ServerMessage`]: wire frames
//! - [`StateFrame`]: the per-seat projection of a table

mod manager;
mod protocol;

pub use manager::*;
pub use protocol::*;
