//! Authentication module
//!
//! JWT bearer tokens and argon2 password hashing.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenType};
pub use middleware::AuthUser;
pub use password::PasswordService;
