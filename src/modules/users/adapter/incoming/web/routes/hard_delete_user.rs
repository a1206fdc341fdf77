use actix_web::{delete, web, Responder};
use tracing::{error, warn};
use uuid::Uuid;

use crate::shared::api::ApiResponse;
use crate::users::adapter::incoming::web::extractors::auth::AdminUser;
use crate::users::application::use_cases::hard_delete_user::HardDeleteUserError;
use crate::AppState;

/// Irreversibly removes a user and every attached row. Works on active and
/// trashed users alike.
#[delete("/api/users/{user_id}/permanent")]
pub async fn hard_delete_user_handler(
    admin: AdminUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    let user_id = path.into_inner();

    match data.hard_delete_user_use_case.execute(user_id).await {
        Ok(()) => {
            warn!("User {} permanently deleted by {}", user_id, admin.user_id);
            ApiResponse::no_content()
        }

        Err(HardDeleteUserError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }

        Err(HardDeleteUserError::RepositoryError(e)) => {
            error!("Repository error hard deleting user {}: {}", user_id, e);
            ApiResponse::internal_error()
        }
    }
}
