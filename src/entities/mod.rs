//! Entity declaration helpers

pub mod macros;
