//! Background Tasks Module
//!
//! Fire-and-forget tasks spawned during cache operation.
//!
//! # Tasks
//! - Refresh: runs one stale entry's refresh callback and posts the outcome
//!   back to the store

mod refresh;

pub use refresh::spawn_refresh;
