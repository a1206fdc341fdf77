use async_trait::async_trait;
use uuid::Uuid;

use crate::users::application::ports::outgoing::user_repository::{
    UserRepository, UserRepositoryError,
};

#[derive(Debug, Clone)]
pub enum HardDeleteUserError {
    UserNotFound,
    RepositoryError(String),
}

impl std::fmt::Display for HardDeleteUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HardDeleteUserError::UserNotFound => write!(f, "User not found"),
            HardDeleteUserError::RepositoryError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for HardDeleteUserError {}

/// Irreversible removal of the whole user graph. Soft-deleted users are
/// eligible; only ids that never existed (or are already gone) are rejected.
#[async_trait]
pub trait IHardDeleteUserUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid) -> Result<(), HardDeleteUserError>;
}

#[derive(Debug, Clone)]
pub struct HardDeleteUserUseCase<R: UserRepository> {
    repository: R,
}

impl<R: UserRepository> HardDeleteUserUseCase<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> IHardDeleteUserUseCase for HardDeleteUserUseCase<R>
where
    R: UserRepository + Send + Sync,
{
    async fn execute(&self, user_id: Uuid) -> Result<(), HardDeleteUserError> {
        self.repository
            .hard_delete_user(user_id)
            .await
            .map_err(|e| match e {
                UserRepositoryError::UserNotFound => HardDeleteUserError::UserNotFound,
                UserRepositoryError::DatabaseError(msg) => {
                    HardDeleteUserError::RepositoryError(msg)
                }
                _ => HardDeleteUserError::RepositoryError("Unknown repository error".to_string()),
            })
    }
}
