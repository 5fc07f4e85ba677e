//! Test helpers module
//!
//! This module provides utilities for driving the ThinkPrint HTTP API in
//! tests: a test context wrapping the full router and multipart builders.

#![allow(dead_code)]

pub mod test_context;
pub mod test_data;

pub use test_context::*;
pub use test_data::*;
