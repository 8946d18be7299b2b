//! Principals, credentials and session tokens.

/// bcrypt hashing on the blocking pool
pub mod password;
/// Main admin / shop admin principals
pub mod principal;
/// JWT session tokens
pub mod token;
