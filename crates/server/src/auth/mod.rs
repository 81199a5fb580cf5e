mod jwt;
mod principal;

pub use jwt::{create_token, validate_token, TokenError};
pub use principal::{Principal, Role};
