use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use email_address::EmailAddress;
use tracing::warn;

use crate::users::application::domain::entities::{Role, SocialMedia};
use crate::users::application::ports::outgoing::{
    document_storage::{DocumentSlot, DocumentStorage, DocumentUpload},
    password_hasher::PasswordHasher,
    user_notifier::UserOnboardingNotifier,
    user_query::UserQuery,
    user_repository::{
        CreateUserGraph, CreatedUser, NewCredential, NewEmergencyContact, NewPersonalInfo,
        NewProfile, UserRepository, UserRepositoryError,
    },
};

/// ========================= Input =========================
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Privilege level of the caller, supplied by the auth collaborator.
    pub actor_is_admin: bool,

    // Core profile
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub role: String,

    // Credential
    pub email: String,
    pub username: String,
    pub phone_number: Option<String>,
    pub password: String,

    // Personal-info section (optional)
    pub documents: Vec<DocumentUpload>,
    pub social_media: Option<SocialMedia>,

    // Emergency-contact section (optional)
    pub emergency_contact: NewEmergencyContact,
}

/// ========================= Use Case Error =========================
#[derive(Debug, Clone)]
pub enum CreateUserError {
    Validation(String),
    EmailAlreadyExists,
    UsernameAlreadyExists,
    /// Lost a race against a concurrent create; the unique constraint is the
    /// authority, the pre-checks above only improve error specificity.
    IdentityTaken,
    PrivilegedRoleNotAllowed,
    HashingFailed(String),
    StorageFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for CreateUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateUserError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            CreateUserError::EmailAlreadyExists => write!(f, "Email already exists"),
            CreateUserError::UsernameAlreadyExists => write!(f, "Username already exists"),
            CreateUserError::IdentityTaken => write!(f, "Email or username already taken"),
            CreateUserError::PrivilegedRoleNotAllowed => {
                write!(f, "Only an admin may assign the admin role")
            }
            CreateUserError::HashingFailed(msg) => write!(f, "Password hashing failed: {}", msg),
            CreateUserError::StorageFailed(msg) => write!(f, "Document storage failed: {}", msg),
            CreateUserError::RepositoryError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CreateUserError {}

// Use case
#[async_trait]
pub trait ICreateUserUseCase: Send + Sync {
    async fn execute(&self, input: CreateUserInput) -> Result<CreatedUser, CreateUserError>;
}

/// ========================= Use Case =========================
pub struct CreateUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    query: Q,
    repository: R,
    password_hasher: Arc<dyn PasswordHasher>,
    document_storage: Arc<dyn DocumentStorage>,
    notifier: Arc<dyn UserOnboardingNotifier>,
}

impl<Q, R> CreateUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    pub fn new(
        query: Q,
        repository: R,
        password_hasher: Arc<dyn PasswordHasher>,
        document_storage: Arc<dyn DocumentStorage>,
        notifier: Arc<dyn UserOnboardingNotifier>,
    ) -> Self {
        Self {
            query,
            repository,
            password_hasher,
            document_storage,
            notifier,
        }
    }

    fn validate(input: &CreateUserInput) -> Result<Role, CreateUserError> {
        if input.first_name.trim().is_empty() {
            return Err(CreateUserError::Validation(
                "first_name is required".to_string(),
            ));
        }
        if input.last_name.trim().is_empty() {
            return Err(CreateUserError::Validation(
                "last_name is required".to_string(),
            ));
        }
        if input.username.trim().is_empty() {
            return Err(CreateUserError::Validation(
                "username is required".to_string(),
            ));
        }
        if !EmailAddress::is_valid(input.email.trim()) {
            return Err(CreateUserError::Validation(
                "email is not a valid address".to_string(),
            ));
        }
        if input.password.len() < 8 {
            return Err(CreateUserError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }

        let role: Role = input
            .role
            .parse()
            .map_err(|e: crate::users::application::domain::entities::UnknownRole| {
                CreateUserError::Validation(e.to_string())
            })?;

        if role.is_privileged() && !input.actor_is_admin {
            return Err(CreateUserError::PrivilegedRoleNotAllowed);
        }

        Ok(role)
    }

    /// Hands every document to the storage collaborator, then folds the
    /// returned reference strings into the personal-info section. Any upload
    /// failure aborts the whole create before a single row is written.
    async fn store_documents(
        &self,
        user_id: uuid::Uuid,
        documents: Vec<DocumentUpload>,
        social_media: Option<SocialMedia>,
    ) -> Result<NewPersonalInfo, CreateUserError> {
        let mut info = NewPersonalInfo {
            social_media,
            ..Default::default()
        };

        for upload in documents {
            let slot = upload.slot;
            let reference = self
                .document_storage
                .store_document(user_id, upload)
                .await
                .map_err(|e| CreateUserError::StorageFailed(e.to_string()))?;

            match slot {
                DocumentSlot::Photo => info.photo_ref = Some(reference),
                DocumentSlot::NationalityCard => info.nationality_card_ref = Some(reference),
                DocumentSlot::FamilyBook => info.family_book_ref = Some(reference),
                DocumentSlot::BirthCertificate => info.birth_certificate_ref = Some(reference),
                DocumentSlot::DegreeCertificate => info.degree_certificate_ref = Some(reference),
            }
        }

        Ok(info)
    }
}

#[async_trait]
impl<Q, R> ICreateUserUseCase for CreateUserUseCase<Q, R>
where
    Q: UserQuery + Send + Sync,
    R: UserRepository + Send + Sync,
{
    async fn execute(&self, input: CreateUserInput) -> Result<CreatedUser, CreateUserError> {
        let role = Self::validate(&input)?;

        let email = input.email.trim().to_lowercase();
        let username = input.username.trim().to_string();

        // Pre-checks over the FULL namespace: a soft-deleted owner still
        // blocks the email/username until hard delete.
        if let Ok(Some(_)) = self.query.find_by_username(&username).await {
            return Err(CreateUserError::UsernameAlreadyExists);
        }
        if let Ok(Some(_)) = self.query.find_by_email(&email).await {
            return Err(CreateUserError::EmailAlreadyExists);
        }

        let password_hash = self
            .password_hasher
            .hash_password(&input.password)
            .await
            .map_err(|e| CreateUserError::HashingFailed(e.to_string()))?;

        // Document handoff happens before any metadata write; the id minted
        // here is both the storage object prefix and the inserted row id.
        let user_id = uuid::Uuid::new_v4();
        let personal_info = self
            .store_documents(user_id, input.documents, input.social_media)
            .await?;

        let graph = CreateUserGraph {
            user_id,
            profile: NewProfile {
                first_name: input.first_name.trim().to_string(),
                last_name: input.last_name.trim().to_string(),
                dob: input.dob,
                address: input.address,
                gender: input.gender,
                nationality: input.nationality,
                role,
            },
            credential: NewCredential {
                email,
                username,
                phone_number: input.phone_number,
                password_hash,
            },
            personal_info: (!personal_info.is_empty()).then_some(personal_info),
            emergency_contact: (!input.emergency_contact.is_empty())
                .then_some(input.emergency_contact),
        };

        let created = self.repository.create_user(graph).await.map_err(|e| match e {
            UserRepositoryError::IdentityTaken => CreateUserError::IdentityTaken,
            UserRepositoryError::DatabaseError(msg) => CreateUserError::RepositoryError(msg),
            UserRepositoryError::UserNotFound => {
                CreateUserError::RepositoryError("Unknown repository error".to_string())
            }
        })?;

        // Fire-and-forget: onboarding delivery never fails the create.
        if let Err(e) = self.notifier.notify_user_created(&created).await {
            warn!("Onboarding notification failed for {}: {}", created.id, e);
        }

        Ok(created)
    }
}
