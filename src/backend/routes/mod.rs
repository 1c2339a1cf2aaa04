//! Route Configuration Module
//!
//! ```text
//! routes/
//! ├── mod.rs        - exports
//! ├── router.rs     - router assembly (ws + api + fallback)
//! └── api_routes.rs - JSON API route table
//! ```

/// Router assembly
pub mod router;

/// API route table
pub mod api_routes;

pub use router::create_router;
