use async_trait::async_trait;
use uuid::Uuid;

use crate::users::application::ports::outgoing::user_repository::{
    UserRepository, UserRepositoryError,
};

#[derive(Debug, Clone)]
pub enum SoftDeleteUserError {
    /// Unknown id, or the user is already trashed. Calling soft delete twice
    /// is an error, not a no-op, so state confusion reaches the caller.
    UserNotFound,
    RepositoryError(String),
}

impl std::fmt::Display for SoftDeleteUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoftDeleteUserError::UserNotFound => write!(f, "User not found"),
            SoftDeleteUserError::RepositoryError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SoftDeleteUserError {}

#[async_trait]
pub trait ISoftDeleteUserUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid) -> Result<(), SoftDeleteUserError>;
}

#[derive(Debug, Clone)]
pub struct SoftDeleteUserUseCase<R: UserRepository> {
    repository: R,
}

impl<R: UserRepository> SoftDeleteUserUseCase<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> ISoftDeleteUserUseCase for SoftDeleteUserUseCase<R>
where
    R: UserRepository + Send + Sync,
{
    async fn execute(&self, user_id: Uuid) -> Result<(), SoftDeleteUserError> {
        self.repository
            .soft_delete_user(user_id)
            .await
            .map_err(|e| match e {
                UserRepositoryError::UserNotFound => SoftDeleteUserError::UserNotFound,
                UserRepositoryError::DatabaseError(msg) => {
                    SoftDeleteUserError::RepositoryError(msg)
                }
                _ => SoftDeleteUserError::RepositoryError("Unknown repository error".to_string()),
            })
    }
}
