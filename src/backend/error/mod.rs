//! Backend Error Module
//!
//! Error types for the HTTP surface and their conversion to responses.
//!
//! ```text
//! error/
//! ├── mod.rs        - exports
//! ├── types.rs      - BackendError and status mapping
//! └── conversion.rs - IntoResponse implementation
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
