//! Test Module
//!
//! Cross-module test suite for the MoodChat backend.
//!
//! ## Test Categories
//! - `brain_tests`: Rule precedence, normalization, reply selection, pipeline scenarios
//! - `integration_tests`: Artifacts on disk through startup loading to the HTTP surface

pub mod brain_tests;
