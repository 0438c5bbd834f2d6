//! Bearer token authentication

pub mod jwt;

pub use jwt::{bearer_token, issue_token, Claims, JwtValidator};
