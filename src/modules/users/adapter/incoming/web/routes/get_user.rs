use actix_web::{get, web, Responder};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::shared::api::ApiResponse;
use crate::users::adapter::incoming::web::extractors::auth::{AdminUser, AuthenticatedUser};
use crate::users::application::domain::entities::{Role, SocialMedia};
use crate::users::application::ports::outgoing::user_query::{
    EmergencyContactView, PersonalInfoView, UserProfileView,
};
use crate::users::application::use_cases::fetch_profile::FetchProfileError;
use crate::AppState;

#[derive(Serialize)]
pub struct UserProfileResponse {
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
    pub personal_info: Option<PersonalInfoResponse>,
    pub emergency_contact: Option<EmergencyContactResponse>,
}

#[derive(Serialize)]
pub struct PersonalInfoResponse {
    pub photo_ref: Option<String>,
    pub nationality_card_ref: Option<String>,
    pub family_book_ref: Option<String>,
    pub birth_certificate_ref: Option<String>,
    pub degree_certificate_ref: Option<String>,
    pub social_media: Option<SocialMedia>,
}

#[derive(Serialize)]
pub struct EmergencyContactResponse {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub relationship: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub social_media: Option<SocialMedia>,
}

impl From<PersonalInfoView> for PersonalInfoResponse {
    fn from(view: PersonalInfoView) -> Self {
        Self {
            photo_ref: view.photo_ref,
            nationality_card_ref: view.nationality_card_ref,
            family_book_ref: view.family_book_ref,
            birth_certificate_ref: view.birth_certificate_ref,
            degree_certificate_ref: view.degree_certificate_ref,
            social_media: view.social_media,
        }
    }
}

impl From<EmergencyContactView> for EmergencyContactResponse {
    fn from(view: EmergencyContactView) -> Self {
        Self {
            first_name: view.first_name,
            last_name: view.last_name,
            relationship: view.relationship,
            phone_number: view.phone_number,
            address: view.address,
            social_media: view.social_media,
        }
    }
}

impl From<UserProfileView> for UserProfileResponse {
    fn from(view: UserProfileView) -> Self {
        Self {
            id: view.id,
            first_name: view.first_name,
            last_name: view.last_name,
            dob: view.dob,
            address: view.address,
            gender: view.gender,
            nationality: view.nationality,
            role: view.role,
            is_suspended: view.is_suspended,
            deleted_at: view.deleted_at,
            email: view.email,
            username: view.username,
            phone_number: view.phone_number,
            created_at: view.created_at,
            updated_at: view.updated_at,
            personal_info: view.personal_info.map(Into::into),
            emergency_contact: view.emergency_contact.map(Into::into),
        }
    }
}

async fn fetch_profile_response(data: &web::Data<AppState>, user_id: Uuid) -> actix_web::HttpResponse {
    match data.fetch_profile_use_case.execute(user_id).await {
        Ok(view) => ApiResponse::success(UserProfileResponse::from(view)),

        Err(FetchProfileError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }

        Err(FetchProfileError::QueryError(e)) => {
            error!("Query error fetching profile for {}: {}", user_id, e);
            ApiResponse::internal_error()
        }
    }
}

/// The caller's own composed profile.
#[get("/api/users/me")]
pub async fn get_my_profile_handler(
    user: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    fetch_profile_response(&data, user.user_id).await
}

/// Any user's profile, trashed ones included. Admin only.
#[get("/api/users/{user_id}")]
pub async fn get_user_handler(
    _admin: AdminUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    fetch_profile_response(&data, path.into_inner()).await
}
