use actix_web::{patch, web, Responder};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::shared::api::ApiResponse;
use crate::users::adapter::incoming::web::extractors::auth::AdminUser;
use crate::users::application::use_cases::restore_user::RestoreUserError;
use crate::AppState;

#[derive(Serialize)]
pub struct RestoredUserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

/// Pulls a user back out of the trash. Only trashed users can be restored.
#[patch("/api/users/{user_id}/restore")]
pub async fn restore_user_handler(
    _admin: AdminUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    let user_id = path.into_inner();

    match data.restore_user_use_case.execute(user_id).await {
        Ok(restored) => ApiResponse::success(RestoredUserResponse {
            id: restored.id,
            email: restored.email,
            username: restored.username,
        }),

        Err(RestoreUserError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "No trashed user with that id")
        }

        Err(RestoreUserError::IdentityTaken) => ApiResponse::conflict(
            "IDENTITY_TAKEN",
            "Another user now holds this email or username",
        ),

        Err(RestoreUserError::RepositoryError(e)) => {
            error!("Repository error restoring user {}: {}", user_id, e);
            ApiResponse::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use async_trait::async_trait;

    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::auth_helper::test_helpers::{
        admin_token, create_test_token_provider,
    };
    use crate::users::application::ports::outgoing::user_repository::RestoredUser;
    use crate::users::application::use_cases::restore_user::IRestoreUserUseCase;

    struct MockRestore {
        result: Result<RestoredUser, RestoreUserError>,
    }

    #[async_trait]
    impl IRestoreUserUseCase for MockRestore {
        async fn execute(&self, _user_id: Uuid) -> Result<RestoredUser, RestoreUserError> {
            self.result.clone()
        }
    }

    async fn call(mock: MockRestore) -> actix_web::dev::ServiceResponse {
        let app_state = TestAppStateBuilder::default().with_restore_user(mock).build();

        let app = test::init_service(
            App::new()
                .app_data(app_state)
                .app_data(actix_web::web::Data::new(create_test_token_provider()))
                .service(restore_user_handler),
        )
        .await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/users/{}/restore", Uuid::new_v4()))
            .insert_header(("Authorization", format!("Bearer {}", admin_token())))
            .to_request();

        test::call_service(&app, req).await
    }

    #[actix_web::test]
    async fn test_restore_success_returns_identity() {
        let id = Uuid::new_v4();
        let resp = call(MockRestore {
            result: Ok(RestoredUser {
                id,
                email: "ana@example.com".to_string(),
                username: "ana.s".to_string(),
            }),
        })
        .await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["id"], id.to_string());
        assert_eq!(body["data"]["username"], "ana.s");
    }

    #[actix_web::test]
    async fn test_restore_active_user_is_not_found() {
        let resp = call(MockRestore {
            result: Err(RestoreUserError::UserNotFound),
        })
        .await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_restore_identity_collision_is_conflict() {
        let resp = call(MockRestore {
            result: Err(RestoreUserError::IdentityTaken),
        })
        .await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "IDENTITY_TAKEN");
    }
}
