// ABOUTME: Library root for berth - exposes the facade and runtime client for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod error;
pub mod facade;
pub mod output;
pub mod runtime;
pub mod types;
