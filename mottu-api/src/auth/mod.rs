//! Authentication: password hashing and token issuance
//!
//! Token validation lives in [`crate::middleware::JwtAuth`].

pub mod password;
pub mod tokens;

pub use password::PasswordHasher;
pub use tokens::{Claims, IssuedToken, JwtIssuer};
