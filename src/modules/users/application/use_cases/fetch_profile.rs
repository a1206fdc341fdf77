use async_trait::async_trait;
use uuid::Uuid;

use crate::users::application::ports::outgoing::user_query::{
    UserProfileView, UserQuery, UserQueryError,
};

#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchProfileError {
    #[error("User not found")]
    UserNotFound,

    #[error("Query error: {0}")]
    QueryError(#[from] UserQueryError),
}

/// Returns the composed profile for active, suspended or soft-deleted users
/// alike; visibility policy belongs to the caller.
#[async_trait]
pub trait IFetchProfileUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid) -> Result<UserProfileView, FetchProfileError>;
}

#[derive(Debug, Clone)]
pub struct FetchProfileUseCase<Q: UserQuery> {
    query: Q,
}

impl<Q: UserQuery> FetchProfileUseCase<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }
}

#[async_trait]
impl<Q> IFetchProfileUseCase for FetchProfileUseCase<Q>
where
    Q: UserQuery + Send + Sync,
{
    async fn execute(&self, user_id: Uuid) -> Result<UserProfileView, FetchProfileError> {
        self.query
            .find_profile(user_id)
            .await?
            .ok_or(FetchProfileError::UserNotFound)
    }
}
