//! Shared fixtures for the journey tests

pub mod fixtures;
