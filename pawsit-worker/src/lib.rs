//! # Pawsit Worker Library
//!
//! Background jobs for Pawsit. The API server spawns the sweeper in-process;
//! the `pawsit-worker` binary runs it standalone.
//!
//! ## Modules
//!
//! - `sweeper`: Periodic cancellation of stale pending bookings

pub mod sweeper;
