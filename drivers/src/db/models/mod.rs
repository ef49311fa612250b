//! Database record structures.

pub mod drivers;
