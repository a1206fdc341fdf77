pub mod jwt_config;
pub mod jwt_token_provider;

pub use jwt_config::JwtConfig;
pub use jwt_token_provider::JwtTokenProvider;
