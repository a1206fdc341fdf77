use async_trait::async_trait;
use uuid::Uuid;

use crate::users::application::ports::outgoing::user_query::UserQuery;
use crate::users::application::ports::outgoing::user_repository::{
    RestoredUser, UserRepository, UserRepositoryError,
};

#[derive(Debug, Clone)]
pub enum RestoreUserError {
    /// Unknown id, or the user is not currently soft-deleted.
    UserNotFound,
    /// Another user took the email/username while this one sat in the trash.
    IdentityTaken,
    RepositoryError(String),
}

impl std::fmt::Display for RestoreUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestoreUserError::UserNotFound => write!(f, "User not found"),
            RestoreUserError::IdentityTaken => {
                write!(f, "Email or username now belongs to another user")
            }
            RestoreUserError::RepositoryError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RestoreUserError {}

#[async_trait]
pub trait IRestoreUserUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid) -> Result<RestoredUser, RestoreUserError>;
}

#[derive(Debug, Clone)]
pub struct RestoreUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    query: Q,
    repository: R,
}

impl<Q, R> RestoreUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    pub fn new(query: Q, repository: R) -> Self {
        Self { query, repository }
    }
}

#[async_trait]
impl<Q, R> IRestoreUserUseCase for RestoreUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(&self, user_id: Uuid) -> Result<RestoredUser, RestoreUserError> {
        // The candidate must exist and be trashed before re-checking
        // uniqueness, so unknown ids keep reading as NotFound.
        let profile = self
            .query
            .find_profile(user_id)
            .await
            .map_err(|e| RestoreUserError::RepositoryError(e.to_string()))?
            .ok_or(RestoreUserError::UserNotFound)?;

        if profile.deleted_at.is_none() {
            return Err(RestoreUserError::UserNotFound);
        }

        // With global unique constraints nobody can have taken the identity
        // in the interim, but the re-check keeps the policy explicit and
        // survives a future relaxation of the constraint.
        if let Some(owner) = self
            .query
            .find_by_email(&profile.email)
            .await
            .map_err(|e| RestoreUserError::RepositoryError(e.to_string()))?
        {
            if owner.user_id != user_id {
                return Err(RestoreUserError::IdentityTaken);
            }
        }
        if let Some(owner) = self
            .query
            .find_by_username(&profile.username)
            .await
            .map_err(|e| RestoreUserError::RepositoryError(e.to_string()))?
        {
            if owner.user_id != user_id {
                return Err(RestoreUserError::IdentityTaken);
            }
        }

        self.repository
            .restore_user(user_id)
            .await
            .map_err(|e| match e {
                UserRepositoryError::UserNotFound => RestoreUserError::UserNotFound,
                UserRepositoryError::IdentityTaken => RestoreUserError::IdentityTaken,
                UserRepositoryError::DatabaseError(msg) => RestoreUserError::RepositoryError(msg),
            })
    }
}
