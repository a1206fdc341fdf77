use actix_web::{get, web, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::shared::api::ApiResponse;
use crate::users::adapter::incoming::web::extractors::auth::AdminUser;
use crate::users::application::domain::entities::Role;
use crate::users::application::ports::outgoing::user_query::UserListView;
use crate::users::application::use_cases::list_users::{ListUsersError, ListUsersParams};
use crate::AppState;

/// Query string as received. Everything is optional and arrives as text;
/// normalization happens in the use case.
#[derive(Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<String>,
    pub gender: Option<String>,
    pub is_suspended: Option<String>,
    pub nationality: Option<String>,
    pub search: Option<String>,
    pub with_trashed: Option<String>,
    pub only_trashed: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
}

impl From<ListUsersQuery> for ListUsersParams {
    fn from(q: ListUsersQuery) -> Self {
        ListUsersParams {
            role: q.role,
            gender: q.gender,
            is_suspended: q.is_suspended,
            nationality: q.nationality,
            search: q.search,
            with_trashed: q.with_trashed,
            only_trashed: q.only_trashed,
            sort_by: q.sort_by,
            sort_order: q.sort_order,
            per_page: q.per_page,
            page: q.page,
        }
    }
}

#[derive(Serialize)]
pub struct UserListItemResponse {
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

impl From<UserListView> for UserListItemResponse {
    fn from(view: UserListView) -> Self {
        Self {
            id: view.id,
            first_name: view.first_name,
            last_name: view.last_name,
            email: view.email,
            username: view.username,
            role: view.role,
            gender: view.gender,
            nationality: view.nationality,
            is_suspended: view.is_suspended,
            deleted_at: view.deleted_at,
            created_at: view.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct PaginationResponse {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Serialize)]
pub struct ListUsersResponse {
    pub data: Vec<UserListItemResponse>,
    pub pagination: PaginationResponse,
}

#[get("/api/users")]
pub async fn list_users_handler(
    _admin: AdminUser,
    query: web::Query<ListUsersQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let params: ListUsersParams = query.into_inner().into();

    match data.list_users_use_case.execute(params).await {
        Ok(page) => ApiResponse::success(ListUsersResponse {
            pagination: PaginationResponse {
                page: page.page,
                per_page: page.per_page,
                total: page.total,
                total_pages: page.total_pages,
            },
            data: page.items.into_iter().map(Into::into).collect(),
        }),

        Err(ListUsersError::Validation(msg)) => {
            ApiResponse::bad_request("VALIDATION_ERROR", &msg)
        }

        Err(ListUsersError::QueryError(e)) => {
            error!("Query error listing users: {}", e);
            ApiResponse::internal_error()
        }
    }
}
