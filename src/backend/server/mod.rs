//! Server Module
//!
//! Initialization and state for the Axum HTTP server.
//!
//! ```text
//! server/
//! ├── mod.rs    - exports
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - environment configuration (database, port)
//! └── init.rs   - app creation
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{load_database, server_port, StartupError};
pub use init::create_app;
pub use state::AppState;
