//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite adapters for the repository ports
//! - HTTP: REST API routes
//! - Session: per-character floors and encounters held in memory
//! - Random: the production random source
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod persistence;
pub mod random;
pub mod session;
pub mod state;
