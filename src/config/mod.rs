/// Database configuration and connection management
pub mod database;

/// Supplier seed configuration from config.toml
pub mod seed;
