//! Tasks API Library
//!
//! This module exports the core components for testing and integration.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod query;
pub mod server;
pub mod service;
pub mod store;
pub mod types;
