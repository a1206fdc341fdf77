use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::users::application::ports::outgoing::document_storage::{
    DocumentSlot, DocumentStorage, DocumentUpload,
};
use crate::users::application::ports::outgoing::user_query::{UserQuery, UserQueryError};
use crate::users::application::ports::outgoing::user_repository::{
    EmergencyContactPatch, PersonalInfoPatch, ProfilePatch, UserRepository,
    UserRepositoryError, UserUpdateGraph,
};

/// Section-scoped update. Patches arrive already in tri-state form; new
/// document uploads are handed to storage first and their references merged
/// into the personal-info section.
#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub user_id: Uuid,
    pub profile: ProfilePatch,
    pub personal_info: PersonalInfoPatch,
    pub emergency_contact: EmergencyContactPatch,
    pub documents: Vec<DocumentUpload>,
}

#[derive(Debug, Clone)]
pub enum UpdateUserError {
    Validation(String),
    UserNotFound,
    StorageFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for UpdateUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateUserError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            UpdateUserError::UserNotFound => write!(f, "User not found"),
            UpdateUserError::StorageFailed(msg) => write!(f, "Document storage failed: {}", msg),
            UpdateUserError::RepositoryError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for UpdateUserError {}

#[async_trait]
pub trait IUpdateUserUseCase: Send + Sync {
    async fn execute(&self, input: UpdateUserInput) -> Result<(), UpdateUserError>;
}

#[derive(Clone)]
pub struct UpdateUserUseCase<Q: UserQuery, R: UserRepository> {
    query: Q,
    repository: R,
    storage: Arc<dyn DocumentStorage>,
}

impl<Q: UserQuery, R: UserRepository> UpdateUserUseCase<Q, R> {
    pub fn new(query: Q, repository: R, storage: Arc<dyn DocumentStorage>) -> Self {
        Self {
            query,
            repository,
            storage,
        }
    }

    fn validate(input: &UpdateUserInput) -> Result<(), UpdateUserError> {
        if let Some(first_name) = &input.profile.first_name {
            if first_name.trim().is_empty() {
                return Err(UpdateUserError::Validation(
                    "First name cannot be empty".to_string(),
                ));
            }
        }
        if let Some(last_name) = &input.profile.last_name {
            if last_name.trim().is_empty() {
                return Err(UpdateUserError::Validation(
                    "Last name cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<Q, R> IUpdateUserUseCase for UpdateUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(&self, input: UpdateUserInput) -> Result<(), UpdateUserError> {
        Self::validate(&input)?;

        // Soft-deleted users stay updatable; only a missing row is NotFound.
        let existing = self
            .query
            .find_profile(input.user_id)
            .await
            .map_err(|e| UpdateUserError::RepositoryError(e.to_string()))?;
        if existing.is_none() {
            return Err(UpdateUserError::UserNotFound);
        }

        // Documents are handed to storage before the transaction opens so a
        // rejected upload never leaves half-written metadata behind.
        let mut personal_info = input.personal_info;
        for upload in input.documents {
            let slot = upload.slot;
            let reference = self
                .storage
                .store_document(input.user_id, upload)
                .await
                .map_err(|e| UpdateUserError::StorageFailed(e.to_string()))?;
            let target = match slot {
                DocumentSlot::Photo => &mut personal_info.photo_ref,
                DocumentSlot::NationalityCard => &mut personal_info.nationality_card_ref,
                DocumentSlot::FamilyBook => &mut personal_info.family_book_ref,
                DocumentSlot::BirthCertificate => &mut personal_info.birth_certificate_ref,
                DocumentSlot::DegreeCertificate => &mut personal_info.degree_certificate_ref,
            };
            *target = Some(Some(reference));
        }

        let graph = UserUpdateGraph {
            profile: input.profile,
            personal_info,
            emergency_contact: input.emergency_contact,
        };

        // A request that names no field at all is a no-op, not an error.
        if graph.is_empty() {
            return Ok(());
        }

        self.repository
            .update_user(input.user_id, graph)
            .await
            .map_err(|e| match e {
                UserRepositoryError::UserNotFound => UpdateUserError::UserNotFound,
                other => UpdateUserError::RepositoryError(other.to_string()),
            })
    }
}
