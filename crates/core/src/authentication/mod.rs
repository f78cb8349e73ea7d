mod jwt;
pub use jwt::{peek_claims, JwtError};

pub mod types;
