use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::users::application::domain::entities::{Role, SocialMedia};

/// Flat composed User+Identity view. The join happens in the adapter; no
/// lazy relation traversal ever crosses this boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfileView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub role: Role,
    pub is_suspended: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub email: String,
    pub username: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub personal_info: Option<PersonalInfoView>,
    pub emergency_contact: Option<EmergencyContactView>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonalInfoView {
    pub photo_ref: Option<String>,
    pub nationality_card_ref: Option<String>,
    pub family_book_ref: Option<String>,
    pub birth_certificate_ref: Option<String>,
    pub degree_certificate_ref: Option<String>,
    pub social_media: Option<SocialMedia>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmergencyContactView {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub relationship: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub social_media: Option<SocialMedia>,
}

/// One row of the administrative listing.
#[derive(Debug, Clone, PartialEq)]
pub struct UserListView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub is_suspended: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Credential owner lookup used for uniqueness pre-checks.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialOwner {
    pub user_id: Uuid,
    pub is_trashed: bool,
}

// ============================================================================
// Listing parameters
// ============================================================================

/// Visibility of soft-deleted rows. Default listings exclude them; the
/// trash is reachable only through an explicit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrashedVisibility {
    #[default]
    ExcludeTrashed,
    WithTrashed,
    OnlyTrashed,
}

#[derive(Debug, Clone, Default)]
pub struct UserListFilter {
    pub role: Option<Role>,
    pub gender: Option<String>,
    pub is_suspended: Option<bool>,
    pub nationality: Option<String>,
    /// Case-insensitive substring over first_name, last_name, email, username.
    pub search: Option<String>,
    pub trashed: TrashedVisibility,
}

/// Allow-listed sort columns. Anything else falls back to `CreatedAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortKey {
    #[default]
    CreatedAt,
    FirstName,
    LastName,
    Dob,
    Email,
    Username,
    Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserSort {
    pub key: UserSortKey,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[async_trait]
pub trait UserQuery {
    /// Composed view for any non-hard-deleted user; the caller decides what
    /// soft-deleted visibility means.
    async fn find_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserProfileView>, UserQueryError>;

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialOwner>, UserQueryError>;

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialOwner>, UserQueryError>;

    async fn list(
        &self,
        filter: UserListFilter,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<PageResult<UserListView>, UserQueryError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}
