use uuid::Uuid;

/// Claims the auth collaborator vouches for. The core trusts this identity
/// without re-validating it.
#[derive(Debug, Clone)]
pub struct CallerClaims {
    pub sub: Uuid,
    pub role: String,
    pub token_type: String,
}

impl CallerClaims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

pub trait TokenProvider: Send + Sync {
    fn verify_token(&self, token: &str) -> Result<CallerClaims, TokenError>;
}
