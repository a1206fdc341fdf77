use actix_web::{post, web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use crate::shared::api::ApiResponse;
use crate::users::adapter::incoming::web::extractors::auth::AdminUser;
use crate::users::adapter::incoming::web::routes::document_payload::{
    decode_documents, DocumentPayload,
};
use crate::users::application::domain::entities::{Role, SocialMedia};
use crate::users::application::ports::outgoing::user_repository::NewEmergencyContact;
use crate::users::application::use_cases::create_user::{CreateUserError, CreateUserInput};
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub role: String,

    pub email: String,
    pub username: String,
    pub phone_number: Option<String>,
    pub password: String,

    #[serde(default)]
    pub social_media: Option<SocialMedia>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContactRequest>,
    #[serde(default)]
    pub documents: Vec<DocumentPayload>,
}

#[derive(Deserialize, Default)]
pub struct EmergencyContactRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub relationship: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub social_media: Option<SocialMedia>,
}

impl From<EmergencyContactRequest> for NewEmergencyContact {
    fn from(req: EmergencyContactRequest) -> Self {
        NewEmergencyContact {
            first_name: req.first_name,
            last_name: req.last_name,
            relationship: req.relationship,
            phone_number: req.phone_number,
            address: req.address,
            social_media: req.social_media,
        }
    }
}

#[derive(Serialize)]
pub struct CreatedUserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

#[post("/api/users")]
pub async fn create_user_handler(
    _admin: AdminUser,
    req: web::Json<CreateUserRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();

    let documents = match decode_documents(req.documents) {
        Ok(docs) => docs,
        Err(msg) => return ApiResponse::bad_request("INVALID_DOCUMENT", &msg),
    };

    let input = CreateUserInput {
        // The route only admits admins, so the privileged-role check in the
        // use case always sees an admin actor here.
        actor_is_admin: true,
        first_name: req.first_name,
        last_name: req.last_name,
        dob: req.dob,
        address: req.address,
        gender: req.gender,
        nationality: req.nationality,
        role: req.role,
        email: req.email,
        username: req.username,
        phone_number: req.phone_number,
        password: req.password,
        documents,
        social_media: req.social_media,
        emergency_contact: req.emergency_contact.unwrap_or_default().into(),
    };

    match data.create_user_use_case.execute(input).await {
        Ok(user) => ApiResponse::created(CreatedUserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }),

        Err(CreateUserError::Validation(msg)) => {
            warn!("Rejected user creation: {}", msg);
            ApiResponse::bad_request("VALIDATION_ERROR", &msg)
        }

        Err(CreateUserError::EmailAlreadyExists) => {
            ApiResponse::conflict("EMAIL_TAKEN", "Email already exists")
        }

        Err(CreateUserError::UsernameAlreadyExists) => {
            ApiResponse::conflict("USERNAME_TAKEN", "Username already exists")
        }

        Err(CreateUserError::IdentityTaken) => {
            ApiResponse::conflict("IDENTITY_TAKEN", "Email or username already taken")
        }

        Err(CreateUserError::PrivilegedRoleNotAllowed) => ApiResponse::forbidden(
            "PRIVILEGED_ROLE_NOT_ALLOWED",
            "Only an admin may assign the admin role",
        ),

        Err(CreateUserError::HashingFailed(e)) => {
            error!("Password hashing failed creating user: {}", e);
            ApiResponse::internal_error()
        }

        Err(CreateUserError::StorageFailed(e)) => {
            error!("Document storage failed creating user: {}", e);
            ApiResponse::internal_error()
        }

        Err(CreateUserError::RepositoryError(e)) => {
            error!("Repository error creating user: {}", e);
            ApiResponse::internal_error()
        }
    }
}
