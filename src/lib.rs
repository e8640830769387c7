//! superstore-insight - natural-language questions over the Superstore dataset.
//!
//! This library exposes the core modules for use in the binary and in
//! integration tests.

pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod output;
pub mod render;
pub mod resolver;
pub mod safety;
