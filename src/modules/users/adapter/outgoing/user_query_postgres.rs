use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::users::application::domain::entities::Role;
use crate::users::application::ports::outgoing::user_query::{
    CredentialOwner, EmergencyContactView, PageRequest, PageResult, PersonalInfoView, SortOrder,
    TrashedVisibility, UserListFilter, UserListView, UserProfileView, UserQuery, UserQueryError,
    UserSort, UserSortKey,
};

use super::sea_orm_entity::{
    credentials, emergency_contacts, json_to_social_media, personal_infos, users,
};

#[derive(Clone)]
pub struct UserQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn map_db_err(e: DbErr) -> UserQueryError {
    UserQueryError::DatabaseError(e.to_string())
}

fn parse_role(raw: &str) -> Result<Role, UserQueryError> {
    raw.parse::<Role>()
        .map_err(|e| UserQueryError::DatabaseError(e.to_string()))
}

/// The default-visibility predicate. Every query site applies it explicitly;
/// nothing filters trashed rows implicitly.
fn trashed_condition(visibility: TrashedVisibility) -> Condition {
    match visibility {
        TrashedVisibility::ExcludeTrashed => {
            Condition::all().add(users::Column::DeletedAt.is_null())
        }
        TrashedVisibility::OnlyTrashed => {
            Condition::all().add(users::Column::DeletedAt.is_not_null())
        }
        TrashedVisibility::WithTrashed => Condition::all(),
    }
}

fn personal_info_view(model: personal_infos::Model) -> PersonalInfoView {
    PersonalInfoView {
        photo_ref: model.photo_ref,
        nationality_card_ref: model.nationality_card_ref,
        family_book_ref: model.family_book_ref,
        birth_certificate_ref: model.birth_certificate_ref,
        degree_certificate_ref: model.degree_certificate_ref,
        social_media: model.social_media.as_ref().and_then(json_to_social_media),
    }
}

fn emergency_contact_view(model: emergency_contacts::Model) -> EmergencyContactView {
    EmergencyContactView {
        first_name: model.first_name,
        last_name: model.last_name,
        relationship: model.relationship,
        phone_number: model.phone_number,
        address: model.address,
        social_media: model.social_media.as_ref().and_then(json_to_social_media),
    }
}

fn list_view(
    user: users::Model,
    credential: Option<credentials::Model>,
) -> Result<UserListView, UserQueryError> {
    let credential = credential.ok_or_else(|| {
        UserQueryError::DatabaseError(format!("credential row missing for user {}", user.id))
    })?;

    Ok(UserListView {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: credential.email,
        username: credential.username,
        role: parse_role(&user.role)?,
        gender: user.gender,
        nationality: user.nationality,
        is_suspended: user.is_suspended,
        deleted_at: user.deleted_at.map(|dt| dt.with_timezone(&chrono::Utc)),
        created_at: user.created_at.with_timezone(&chrono::Utc),
    })
}

#[async_trait]
impl UserQuery for UserQueryPostgres {
    async fn find_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserProfileView>, UserQueryError> {
        let Some(user) = users::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let credential = credentials::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| {
                UserQueryError::DatabaseError(format!(
                    "credential row missing for user {}",
                    user_id
                ))
            })?;

        let personal_info = personal_infos::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        let emergency_contact = emergency_contacts::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Some(UserProfileView {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            dob: user.dob,
            address: user.address,
            gender: user.gender,
            nationality: user.nationality,
            role: parse_role(&user.role)?,
            is_suspended: user.is_suspended,
            deleted_at: user.deleted_at.map(|dt| dt.with_timezone(&chrono::Utc)),
            email: credential.email,
            username: credential.username,
            phone_number: credential.phone_number,
            created_at: user.created_at.with_timezone(&chrono::Utc),
            updated_at: user.updated_at.with_timezone(&chrono::Utc),
            personal_info: personal_info.map(personal_info_view),
            emergency_contact: emergency_contact.map(emergency_contact_view),
        }))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialOwner>, UserQueryError> {
        let found = credentials::Entity::find()
            .filter(credentials::Column::Email.eq(email))
            .find_also_related(users::Entity)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.map(|(credential, user)| CredentialOwner {
            user_id: credential.user_id,
            is_trashed: user.map(|u| u.deleted_at.is_some()).unwrap_or(false),
        }))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialOwner>, UserQueryError> {
        let found = credentials::Entity::find()
            .filter(credentials::Column::Username.eq(username))
            .find_also_related(users::Entity)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.map(|(credential, user)| CredentialOwner {
            user_id: credential.user_id,
            is_trashed: user.map(|u| u.deleted_at.is_some()).unwrap_or(false),
        }))
    }

    async fn list(
        &self,
        filter: UserListFilter,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<PageResult<UserListView>, UserQueryError> {
        let mut query = users::Entity::find()
            .find_also_related(credentials::Entity)
            .filter(trashed_condition(filter.trashed));

        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }
        if let Some(gender) = filter.gender {
            query = query.filter(users::Column::Gender.eq(gender));
        }
        if let Some(is_suspended) = filter.is_suspended {
            query = query.filter(users::Column::IsSuspended.eq(is_suspended));
        }
        if let Some(nationality) = filter.nationality {
            query = query.filter(users::Column::Nationality.eq(nationality));
        }

        if let Some(ref search) = filter.search {
            let search_pattern = format!("%{}%", search.trim());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::col((users::Entity, users::Column::FirstName))
                            .ilike(&search_pattern),
                    )
                    .add(
                        Expr::col((users::Entity, users::Column::LastName)).ilike(&search_pattern),
                    )
                    .add(
                        Expr::col((credentials::Entity, credentials::Column::Email))
                            .ilike(&search_pattern),
                    )
                    .add(
                        Expr::col((credentials::Entity, credentials::Column::Username))
                            .ilike(&search_pattern),
                    ),
            );
        }

        query = match (sort.key, sort.order) {
            (UserSortKey::CreatedAt, SortOrder::Asc) => query.order_by_asc(users::Column::CreatedAt),
            (UserSortKey::CreatedAt, SortOrder::Desc) => {
                query.order_by_desc(users::Column::CreatedAt)
            }
            (UserSortKey::FirstName, SortOrder::Asc) => query.order_by_asc(users::Column::FirstName),
            (UserSortKey::FirstName, SortOrder::Desc) => {
                query.order_by_desc(users::Column::FirstName)
            }
            (UserSortKey::LastName, SortOrder::Asc) => query.order_by_asc(users::Column::LastName),
            (UserSortKey::LastName, SortOrder::Desc) => query.order_by_desc(users::Column::LastName),
            (UserSortKey::Dob, SortOrder::Asc) => query.order_by_asc(users::Column::Dob),
            (UserSortKey::Dob, SortOrder::Desc) => query.order_by_desc(users::Column::Dob),
            (UserSortKey::Role, SortOrder::Asc) => query.order_by_asc(users::Column::Role),
            (UserSortKey::Role, SortOrder::Desc) => query.order_by_desc(users::Column::Role),
            (UserSortKey::Email, SortOrder::Asc) => query.order_by_asc(credentials::Column::Email),
            (UserSortKey::Email, SortOrder::Desc) => query.order_by_desc(credentials::Column::Email),
            (UserSortKey::Username, SortOrder::Asc) => {
                query.order_by_asc(credentials::Column::Username)
            }
            (UserSortKey::Username, SortOrder::Desc) => {
                query.order_by_desc(credentials::Column::Username)
            }
        };
        // Stable ordering: ties always break by id.
        query = query.order_by_asc(users::Column::Id);

        let total = query.clone().count(&*self.db).await.map_err(map_db_err)?;

        // `page` is user-supplied and unbounded; the multiply must not wrap.
        let offset = page.page.saturating_sub(1).saturating_mul(page.per_page);
        let rows = query
            .offset(offset)
            .limit(page.per_page)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        let items: Result<Vec<UserListView>, UserQueryError> = rows
            .into_iter()
            .map(|(user, credential)| list_view(user, credential))
            .collect();

        let total_pages = total.div_ceil(page.per_page.max(1)).max(1);

        Ok(PageResult {
            items: items?,
            page: page.page,
            per_page: page.per_page,
            total,
            total_pages,
        })
    }
}
