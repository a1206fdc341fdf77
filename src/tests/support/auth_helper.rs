#[cfg(test)]
pub mod test_helpers {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::users::adapter::outgoing::jwt::{JwtConfig, JwtTokenProvider};
    use crate::users::application::ports::outgoing::token_provider::TokenProvider;

    const TEST_SECRET: &str = "FAKE_JWT_SECRET_DO_NOT_USE_0123456789AB";

    #[derive(Serialize)]
    struct TestClaims {
        sub: Uuid,
        exp: i64,
        iat: i64,
        nbf: i64,
        token_type: String,
        role: String,
    }

    /// Verifier wired to the same secret `issue_access_token` signs with.
    pub fn create_test_token_provider() -> Arc<dyn TokenProvider> {
        Arc::new(JwtTokenProvider::new(JwtConfig {
            secret_key: TEST_SECRET.to_string(),
            leeway_seconds: 30,
        }))
    }

    pub fn issue_access_token(user_id: Uuid, role: &str) -> String {
        let now = Utc::now();
        let claims = TestClaims {
            sub: user_id,
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            token_type: "access".to_string(),
            role: role.to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    pub fn admin_token() -> String {
        issue_access_token(Uuid::new_v4(), "admin")
    }

    pub fn employee_token(user_id: Uuid) -> String {
        issue_access_token(user_id, "employee")
    }
}
