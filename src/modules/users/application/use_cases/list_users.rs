use async_trait::async_trait;

use crate::users::application::domain::entities::Role;
use crate::users::application::ports::outgoing::user_query::{
    PageRequest, PageResult, SortOrder, TrashedVisibility, UserListFilter, UserListView,
    UserQuery, UserQueryError, UserSort, UserSortKey,
};

pub const DEFAULT_PER_PAGE: u64 = 15;
pub const MAX_PER_PAGE: u64 = 100;

/// Raw listing parameters as they arrive from the query string. All parsing
/// and defaulting lives here so the adapter only sees normalized values.
#[derive(Debug, Clone, Default)]
pub struct ListUsersParams {
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

#[derive(Debug, Clone)]
pub enum ListUsersError {
    Validation(String),
    QueryError(String),
}

impl std::fmt::Display for ListUsersError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListUsersError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            ListUsersError::QueryError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ListUsersError {}

#[async_trait]
pub trait IListUsersUseCase: Send + Sync {
    async fn execute(
        &self,
        params: ListUsersParams,
    ) -> Result<PageResult<UserListView>, ListUsersError>;
}

#[derive(Debug, Clone)]
pub struct ListUsersUseCase<Q: UserQuery> {
    query: Q,
}

impl<Q: UserQuery> ListUsersUseCase<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }
}

fn parse_flag(value: &Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim),
        Some("true") | Some("1") | Some("yes")
    )
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Allow-listed sort columns; anything unrecognized falls back to the
/// default key rather than erroring.
fn parse_sort_key(value: &Option<String>) -> UserSortKey {
    match value.as_deref().map(str::trim) {
        Some("first_name") => UserSortKey::FirstName,
        Some("last_name") => UserSortKey::LastName,
        Some("dob") => UserSortKey::Dob,
        Some("email") => UserSortKey::Email,
        Some("username") => UserSortKey::Username,
        Some("role") => UserSortKey::Role,
        _ => UserSortKey::CreatedAt,
    }
}

fn parse_sort_order(value: &Option<String>) -> SortOrder {
    match value.as_deref().map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("desc") => SortOrder::Desc,
        _ => SortOrder::Asc,
    }
}

fn parse_per_page(value: &Option<String>) -> u64 {
    match value.as_deref().and_then(|v| v.trim().parse::<u64>().ok()) {
        Some(n) if n >= 1 => n.min(MAX_PER_PAGE),
        _ => DEFAULT_PER_PAGE,
    }
}

fn parse_page(value: &Option<String>) -> u64 {
    match value.as_deref().and_then(|v| v.trim().parse::<u64>().ok()) {
        Some(n) if n >= 1 => n,
        _ => 1,
    }
}

#[async_trait]
impl<Q> IListUsersUseCase for ListUsersUseCase<Q>
where
    Q: UserQuery + Send + Sync,
{
    async fn execute(
        &self,
        params: ListUsersParams,
    ) -> Result<PageResult<UserListView>, ListUsersError> {
        let role = match params.role.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<Role>()
                    .map_err(|e| ListUsersError::Validation(e.to_string()))?,
            ),
        };

        // only_trashed wins when both flags are present.
        let trashed = if parse_flag(&params.only_trashed) {
            TrashedVisibility::OnlyTrashed
        } else if parse_flag(&params.with_trashed) {
            TrashedVisibility::WithTrashed
        } else {
            TrashedVisibility::ExcludeTrashed
        };

        let filter = UserListFilter {
            role,
            gender: params
                .gender
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            is_suspended: params.is_suspended.as_deref().and_then(parse_bool),
            nationality: params
                .nationality
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            search: params
                .search
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            trashed,
        };

        let sort = UserSort {
            key: parse_sort_key(&params.sort_by),
            order: parse_sort_order(&params.sort_order),
        };

        let page = PageRequest {
            page: parse_page(&params.page),
            per_page: parse_per_page(&params.per_page),
        };

        self.query
            .list(filter, sort, page)
            .await
            .map_err(|e| ListUsersError::QueryError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::application::ports::outgoing::user_query::{
        CredentialOwner, UserProfileView,
    };
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct MockUserQuery {
        captured: Mutex<Option<(UserListFilter, UserSort, PageRequest)>>,
    }

    #[async_trait]
    impl UserQuery for MockUserQuery {
        async fn find_profile(
            &self,
            _user_id: Uuid,
        ) -> Result<Option<UserProfileView>, UserQueryError> {
            unimplemented!()
        }

        async fn find_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<CredentialOwner>, UserQueryError> {
            unimplemented!()
        }

        async fn find_by_username(
            &self,
            _username: &str,
        ) -> Result<Option<CredentialOwner>, UserQueryError> {
            unimplemented!()
        }

        async fn list(
            &self,
            filter: UserListFilter,
            sort: UserSort,
            page: PageRequest,
        ) -> Result<PageResult<UserListView>, UserQueryError> {
            *self.captured.lock().unwrap() = Some((filter, sort, page.clone()));
            Ok(PageResult {
                items: vec![],
                page: page.page,
                per_page: page.per_page,
                total: 0,
                total_pages: 1,
            })
        }
    }

    async fn run(params: ListUsersParams) -> (UserListFilter, UserSort, PageRequest) {
        let use_case = ListUsersUseCase::new(MockUserQuery::default());
        use_case.execute(params).await.unwrap();
        let captured = use_case.query.captured.lock().unwrap().clone().unwrap();
        captured
    }

    #[tokio::test]
    async fn test_defaults_when_no_params_given() {
        let (filter, sort, page) = run(ListUsersParams::default()).await;

        assert_eq!(filter.trashed, TrashedVisibility::ExcludeTrashed);
        assert!(filter.role.is_none());
        assert!(filter.search.is_none());
        assert_eq!(sort.key, UserSortKey::CreatedAt);
        assert_eq!(sort.order, SortOrder::Asc);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
    }

    #[tokio::test]
    async fn test_only_trashed_wins_over_with_trashed() {
        let (filter, _, _) = run(ListUsersParams {
            with_trashed: Some("true".to_string()),
            only_trashed: Some("true".to_string()),
            ..Default::default()
        })
        .await;

        assert_eq!(filter.trashed, TrashedVisibility::OnlyTrashed);
    }

    #[tokio::test]
    async fn test_with_trashed_alone() {
        let (filter, _, _) = run(ListUsersParams {
            with_trashed: Some("1".to_string()),
            ..Default::default()
        })
        .await;

        assert_eq!(filter.trashed, TrashedVisibility::WithTrashed);
    }

    #[tokio::test]
    async fn test_per_page_is_capped() {
        let (_, _, page) = run(ListUsersParams {
            per_page: Some("5000".to_string()),
            ..Default::default()
        })
        .await;

        assert_eq!(page.per_page, MAX_PER_PAGE);
    }

    #[tokio::test]
    async fn test_invalid_per_page_and_page_fall_back() {
        let (_, _, page) = run(ListUsersParams {
            per_page: Some("zero".to_string()),
            page: Some("-3".to_string()),
            ..Default::default()
        })
        .await;

        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_unrecognized_sort_key_falls_back_to_created_at() {
        let (_, sort, _) = run(ListUsersParams {
            sort_by: Some("password_hash".to_string()),
            sort_order: Some("DESC".to_string()),
            ..Default::default()
        })
        .await;

        assert_eq!(sort.key, UserSortKey::CreatedAt);
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[tokio::test]
    async fn test_exact_match_filters_pass_through() {
        let (filter, _, _) = run(ListUsersParams {
            role: Some("manager".to_string()),
            gender: Some("female".to_string()),
            is_suspended: Some("true".to_string()),
            nationality: Some("Khmer".to_string()),
            search: Some("  dara ".to_string()),
            ..Default::default()
        })
        .await;

        assert_eq!(filter.role, Some(Role::Manager));
        assert_eq!(filter.gender.as_deref(), Some("female"));
        assert_eq!(filter.is_suspended, Some(true));
        assert_eq!(filter.nationality.as_deref(), Some("Khmer"));
        assert_eq!(filter.search.as_deref(), Some("dara"));
    }

    #[tokio::test]
    async fn test_unknown_role_is_a_validation_error() {
        let use_case = ListUsersUseCase::new(MockUserQuery::default());
        let result = use_case
            .execute(ListUsersParams {
                role: Some("superuser".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(ListUsersError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invalid_is_suspended_is_ignored() {
        let (filter, _, _) = run(ListUsersParams {
            is_suspended: Some("maybe".to_string()),
            ..Default::default()
        })
        .await;

        assert!(filter.is_suspended.is_none());
    }
}
