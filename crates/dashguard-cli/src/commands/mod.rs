//! One module per binary.

pub mod probe;
pub mod validate;
pub mod verify;
