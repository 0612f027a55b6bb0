//! Pacer Core - Foundational types shared by the Pacer crates
//!
//! - `SystemId` - identity of a unit registration
//! - Error types and Result alias

mod error;
mod id;

pub use error::{PacerError, Result, SystemList};
pub use id::SystemId;
