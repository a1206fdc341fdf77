use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;
use uuid::Uuid;

use crate::users::application::domain::entities::{Role, SocialMedia};

/// Core profile attributes written at creation.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub role: Role,
}

/// Identity record, 1:1 with the profile.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub email: String,
    pub username: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewPersonalInfo {
    pub photo_ref: Option<String>,
    pub nationality_card_ref: Option<String>,
    pub family_book_ref: Option<String>,
    pub birth_certificate_ref: Option<String>,
    pub degree_certificate_ref: Option<String>,
    pub social_media: Option<SocialMedia>,
}

impl NewPersonalInfo {
    /// Empty sections are never persisted; the row is created lazily.
    pub fn is_empty(&self) -> bool {
        self.photo_ref.is_none()
            && self.nationality_card_ref.is_none()
            && self.family_book_ref.is_none()
            && self.birth_certificate_ref.is_none()
            && self.degree_certificate_ref.is_none()
            && self.social_media.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewEmergencyContact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub relationship: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub social_media: Option<SocialMedia>,
}

impl NewEmergencyContact {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.relationship.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.social_media.is_none()
    }
}

/// Everything `create_user` persists in one transaction.
///
/// The id is generated by the caller so that document objects uploaded
/// before the write land under the same id the rows are inserted with.
#[derive(Debug, Clone)]
pub struct CreateUserGraph {
    pub user_id: Uuid,
    pub profile: NewProfile,
    pub credential: NewCredential,
    pub personal_info: Option<NewPersonalInfo>,
    pub emergency_contact: Option<NewEmergencyContact>,
}

#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct RestoredUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

// ============================================================================
// Section-scoped patches
//
// Tri-state per field: `None` leaves the column untouched, `Some(None)`
// clears it, `Some(Some(v))` writes `v`. first_name/last_name are not
// nullable, so they carry a plain Option.
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<Option<NaiveDate>>,
    pub address: Option<Option<String>>,
    pub gender: Option<Option<String>>,
    pub nationality: Option<Option<String>>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.dob.is_none()
            && self.address.is_none()
            && self.gender.is_none()
            && self.nationality.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonalInfoPatch {
    pub photo_ref: Option<Option<String>>,
    pub nationality_card_ref: Option<Option<String>>,
    pub family_book_ref: Option<Option<String>>,
    pub birth_certificate_ref: Option<Option<String>>,
    pub degree_certificate_ref: Option<Option<String>>,
    pub social_media: Option<Option<SocialMedia>>,
}

impl PersonalInfoPatch {
    pub fn is_empty(&self) -> bool {
        self.photo_ref.is_none()
            && self.nationality_card_ref.is_none()
            && self.family_book_ref.is_none()
            && self.birth_certificate_ref.is_none()
            && self.degree_certificate_ref.is_none()
            && self.social_media.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmergencyContactPatch {
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub relationship: Option<Option<String>>,
    pub phone_number: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub social_media: Option<Option<SocialMedia>>,
}

impl EmergencyContactPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.relationship.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.social_media.is_none()
    }
}

/// All sections of one `update_user` call. Empty sections are skipped,
/// non-empty ones commit together or not at all.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateGraph {
    pub profile: ProfilePatch,
    pub personal_info: PersonalInfoPatch,
    pub emergency_contact: EmergencyContactPatch,
}

impl UserUpdateGraph {
    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
            && self.personal_info.is_empty()
            && self.emergency_contact.is_empty()
    }
}

#[async_trait]
pub trait UserRepository {
    async fn create_user(&self, graph: CreateUserGraph)
        -> Result<CreatedUser, UserRepositoryError>;

    /// Applies every non-empty section in a single transaction. Soft-deleted
    /// users are still updatable; only hard-deleted ids are gone.
    async fn update_user(
        &self,
        user_id: Uuid,
        graph: UserUpdateGraph,
    ) -> Result<(), UserRepositoryError>;

    /// Sets the tombstone. Rejects rows that are already trashed so that
    /// repeated calls surface state confusion instead of silently passing.
    async fn soft_delete_user(&self, user_id: Uuid) -> Result<(), UserRepositoryError>;

    /// Clears the tombstone. Rejects rows that are not currently trashed.
    async fn restore_user(&self, user_id: Uuid) -> Result<RestoredUser, UserRepositoryError>;

    /// Removes profile, credential, personal-info and emergency-contact rows
    /// in one transaction. Terminal.
    async fn hard_delete_user(&self, user_id: Uuid) -> Result<(), UserRepositoryError>;
}

#[derive(Debug)]
pub enum UserRepositoryError {
    /// Email or username already occupied (soft-deleted rows included).
    IdentityTaken,
    UserNotFound,
    DatabaseError(String),
}

#[cfg(not(tarpaulin_include))]
impl fmt::Display for UserRepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRepositoryError::IdentityTaken => write!(f, "Email or username already taken"),
            UserRepositoryError::UserNotFound => write!(f, "User not found"),
            UserRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for UserRepositoryError {}
