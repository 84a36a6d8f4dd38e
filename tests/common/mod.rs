//! Common test utilities and helpers.
//!
//! This module provides shared functionality for all tests, including:
//! - Workbook fixtures and builders
//! - Assertions on saved workbooks

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
