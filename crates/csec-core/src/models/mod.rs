//! Data models for the csec pipeline.

pub mod config;
pub mod record;
