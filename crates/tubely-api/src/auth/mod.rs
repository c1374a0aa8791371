//! Bearer-token authentication.

pub mod jwt;
pub mod models;

pub use jwt::{make_jwt, validate_jwt, Claims, TOKEN_ISSUER};
pub use models::AuthUser;
