//! Authentication Module
//!
//! User accounts, credential flows, and JWT sessions.
//!
//! ```text
//! auth/
//! ├── mod.rs      - exports
//! ├── users.rs    - user rows and queries
//! ├── sessions.rs - JWT creation/validation
//! └── handlers/   - HTTP handlers (signup, login, social, me, account)
//! ```
//!
//! Flows:
//! - **Signup**: name/email/mobile/password -> bcrypt hash -> user + JWT
//! - **Login**: email-or-mobile + password -> verify -> JWT
//! - **Social**: provider-verified identity -> user with provider linkage + JWT
//!
//! Invalid credentials are always a bare 401; password hashes never leave
//! this module.

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, SignupRequest, SocialAuthRequest};
pub use handlers::{delete_account, extract_user_id, get_me, login, signup, social_auth, update_account};
