/// Database connection and table creation
pub mod database;

/// Session identity loaded from environment variables
pub mod session;

/// Application settings and default categories loaded from config.toml
pub mod settings;
