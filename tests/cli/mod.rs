//! Tests that drive the `insight` binary.

pub mod common;
pub mod insight_test;
