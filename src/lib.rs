//! Visionary - find Dolby Vision and Atmos streams in a media library
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod report;
pub mod scanner;
