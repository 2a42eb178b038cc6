//! Shared fixtures for the unit tests
//!
//! Temporary mempools, easy-difficulty miners and chain builders.

pub mod test_utils;

pub use test_utils::*;
