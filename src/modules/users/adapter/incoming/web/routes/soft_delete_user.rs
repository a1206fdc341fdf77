use actix_web::{delete, web, Responder};
use tracing::error;
use uuid::Uuid;

use crate::shared::api::ApiResponse;
use crate::users::adapter::incoming::web::extractors::auth::AdminUser;
use crate::users::application::use_cases::soft_delete_user::SoftDeleteUserError;
use crate::AppState;

/// Moves a user to the trash. Deleting an already-trashed or unknown user
/// is a 404, not a no-op.
#[delete("/api/users/{user_id}")]
pub async fn soft_delete_user_handler(
    _admin: AdminUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    let user_id = path.into_inner();

    match data.soft_delete_user_use_case.execute(user_id).await {
        Ok(()) => ApiResponse::no_content(),

        Err(SoftDeleteUserError::UserNotFound) => {
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }

        Err(SoftDeleteUserError::RepositoryError(e)) => {
            error!("Repository error soft deleting user {}: {}", user_id, e);
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
        admin_token, create_test_token_provider, employee_token,
    };
    use crate::users::application::use_cases::soft_delete_user::ISoftDeleteUserUseCase;

    struct MockSoftDelete {
        result: Result<(), SoftDeleteUserError>,
    }

    #[async_trait]
    impl ISoftDeleteUserUseCase for MockSoftDelete {
        async fn execute(&self, _user_id: Uuid) -> Result<(), SoftDeleteUserError> {
            self.result.clone()
        }
    }

    async fn call(mock: MockSoftDelete, token: &str) -> actix_web::dev::ServiceResponse {
        let app_state = TestAppStateBuilder::default()
            .with_soft_delete_user(mock)
            .build();

        let app = test::init_service(
            App::new()
                .app_data(app_state)
                .app_data(actix_web::web::Data::new(create_test_token_provider()))
                .service(soft_delete_user_handler),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", Uuid::new_v4()))
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        test::call_service(&app, req).await
    }

    #[actix_web::test]
    async fn test_soft_delete_success() {
        let resp = call(MockSoftDelete { result: Ok(()) }, &admin_token()).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn test_soft_delete_already_trashed_is_not_found() {
        let resp = call(
            MockSoftDelete {
                result: Err(SoftDeleteUserError::UserNotFound),
            },
            &admin_token(),
        )
        .await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "USER_NOT_FOUND");
    }

    #[actix_web::test]
    async fn test_soft_delete_requires_admin() {
        let resp = call(
            MockSoftDelete { result: Ok(()) },
            &employee_token(Uuid::new_v4()),
        )
        .await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);
    }
}
