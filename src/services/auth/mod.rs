pub mod authenticate;
pub mod factory;
pub mod jwt;
pub mod token;

pub use authenticate::{authenticate, bearer_token, resolve_identity};
pub use factory::build_token_service;
pub use jwt::JwtTokenService;
pub use token::{Claims, TokenError, TokenService};
