//! CLI command implementations.

pub mod chains;
pub mod recover;
pub mod standards;
pub mod verify;
