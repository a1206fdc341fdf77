use actix_web::{patch, web, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use tracing::error;
use uuid::Uuid;

use crate::shared::api::ApiResponse;
use crate::users::adapter::incoming::web::extractors::auth::AdminUser;
use crate::users::adapter::incoming::web::routes::document_payload::{
    decode_documents, DocumentPayload,
};
use crate::users::application::domain::entities::SocialMedia;
use crate::users::application::ports::outgoing::user_repository::{
    EmergencyContactPatch, PersonalInfoPatch, ProfilePatch,
};
use crate::users::application::use_cases::update_user::{UpdateUserError, UpdateUserInput};
use crate::AppState;

/// Distinguishes an absent field from an explicit `null`: absent leaves the
/// column untouched, `null` clears it.
fn tri_state<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub profile: Option<ProfileSection>,
    #[serde(default)]
    pub personal_info: Option<PersonalInfoSection>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContactSection>,
    #[serde(default)]
    pub documents: Vec<DocumentPayload>,
}

#[derive(Deserialize, Default)]
pub struct ProfileSection {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "tri_state")]
    pub dob: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub nationality: Option<Option<String>>,
}

#[derive(Deserialize, Default)]
pub struct PersonalInfoSection {
    #[serde(default, deserialize_with = "tri_state")]
    pub photo_ref: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub nationality_card_ref: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub family_book_ref: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub birth_certificate_ref: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub degree_certificate_ref: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub social_media: Option<Option<SocialMedia>>,
}

#[derive(Deserialize, Default)]
pub struct EmergencyContactSection {
    #[serde(default, deserialize_with = "tri_state")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub relationship: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    pub social_media: Option<Option<SocialMedia>>,
}

impl From<ProfileSection> for ProfilePatch {
    fn from(section: ProfileSection) -> Self {
        ProfilePatch {
            first_name: section.first_name,
            last_name: section.last_name,
            dob: section.dob,
            address: section.address,
            gender: section.gender,
            nationality: section.nationality,
        }
    }
}

impl From<PersonalInfoSection> for PersonalInfoPatch {
    fn from(section: PersonalInfoSection) -> Self {
        PersonalInfoPatch {
            photo_ref: section.photo_ref,
            nationality_card_ref: section.nationality_card_ref,
            family_book_ref: section.family_book_ref,
            birth_certificate_ref: section.birth_certificate_ref,
            degree_certificate_ref: section.degree_certificate_ref,
            social_media: section.social_media,
        }
    }
}

impl From<EmergencyContactSection> for EmergencyContactPatch {
    fn from(section: EmergencyContactSection) -> Self {
        EmergencyContactPatch {
            first_name: section.first_name,
            last_name: section.last_name,
            relationship: section.relationship,
            phone_number: section.phone_number,
            address: section.address,
            social_media: section.social_media,
        }
    }
}

#[patch("/api/users/{user_id}")]
pub async fn update_user_handler(
    _admin: AdminUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateUserRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let user_id = path.into_inner();
    let req = req.into_inner();

    let documents = match decode_documents(req.documents) {
        Ok(docs) => docs,
        Err(msg) => return ApiResponse::bad_request("INVALID_DOCUMENT", &msg),
    };

    let input = UpdateUserInput {
        user_id,
        profile: req.profile.unwrap_or_default().into(),
        personal_info: req.personal_info.unwrap_or_default().into(),
        emergency_contact: req.emergency_contact.unwrap_or_default().into(),
        documents,
    };

    match data.update_user_use_case.execute(input).await {
        Ok(()) => ApiResponse::no_content(),

        Err(UpdateUserError::Validation(msg)) => {
            ApiResponse::bad_request("VALIDATION_ERROR", &msg)
        }

        Err(UpdateUserError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }

        Err(UpdateUserError::StorageFailed(e)) => {
            error!("Document storage failed updating user {}: {}", user_id, e);
            ApiResponse::internal_error()
        }

        Err(UpdateUserError::RepositoryError(e)) => {
            error!("Repository error updating user {}: {}", user_id, e);
            ApiResponse::internal_error()
        }
    }
}
