use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::users::application::ports::outgoing::user_repository::{
    CreateUserGraph, CreatedUser, EmergencyContactPatch, PersonalInfoPatch, ProfilePatch,
    RestoredUser, UserRepository, UserRepositoryError, UserUpdateGraph,
};

use super::sea_orm_entity::{
    credentials, emergency_contacts, personal_infos, social_media_to_json, users,
};

#[derive(Clone)]
pub struct UserRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn map_db_err(e: DbErr) -> UserRepositoryError {
        let err_str = e.to_string().to_lowercase();
        if err_str.contains("23505")
            || err_str.contains("duplicate key")
            || err_str.contains("unique constraint")
        {
            return UserRepositoryError::IdentityTaken;
        }
        UserRepositoryError::DatabaseError(e.to_string())
    }

    async fn insert_graph(
        txn: &DatabaseTransaction,
        graph: CreateUserGraph,
    ) -> Result<CreatedUser, UserRepositoryError> {
        // The caller mints the id: storage object keys already carry it.
        let user_id = graph.user_id;
        let now = Utc::now();

        let profile = graph.profile;
        let created = CreatedUser {
            id: user_id,
            email: graph.credential.email.clone(),
            username: graph.credential.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            role: profile.role,
        };

        users::ActiveModel {
            id: Set(user_id),
            first_name: Set(profile.first_name),
            last_name: Set(profile.last_name),
            dob: Set(profile.dob),
            address: Set(profile.address),
            gender: Set(profile.gender),
            nationality: Set(profile.nationality),
            role: Set(profile.role.as_str().to_string()),
            is_suspended: Set(false),
            deleted_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(txn)
        .await
        .map_err(Self::map_db_err)?;

        credentials::ActiveModel {
            user_id: Set(user_id),
            email: Set(graph.credential.email),
            username: Set(graph.credential.username),
            phone_number: Set(graph.credential.phone_number),
            password_hash: Set(graph.credential.password_hash),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(txn)
        .await
        .map_err(Self::map_db_err)?;

        if let Some(info) = graph.personal_info {
            personal_infos::ActiveModel {
                user_id: Set(user_id),
                photo_ref: Set(info.photo_ref),
                nationality_card_ref: Set(info.nationality_card_ref),
                family_book_ref: Set(info.family_book_ref),
                birth_certificate_ref: Set(info.birth_certificate_ref),
                degree_certificate_ref: Set(info.degree_certificate_ref),
                social_media: Set(info.social_media.as_ref().map(social_media_to_json)),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(txn)
            .await
            .map_err(Self::map_db_err)?;
        }

        if let Some(contact) = graph.emergency_contact {
            emergency_contacts::ActiveModel {
                user_id: Set(user_id),
                first_name: Set(contact.first_name),
                last_name: Set(contact.last_name),
                relationship: Set(contact.relationship),
                phone_number: Set(contact.phone_number),
                address: Set(contact.address),
                social_media: Set(contact.social_media.as_ref().map(social_media_to_json)),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(txn)
            .await
            .map_err(Self::map_db_err)?;
        }

        Ok(created)
    }

    fn apply_profile_patch(model: users::Model, patch: ProfilePatch) -> users::ActiveModel {
        let mut active: users::ActiveModel = model.into();
        if let Some(v) = patch.first_name {
            active.first_name = Set(v);
        }
        if let Some(v) = patch.last_name {
            active.last_name = Set(v);
        }
        if let Some(v) = patch.dob {
            active.dob = Set(v);
        }
        if let Some(v) = patch.address {
            active.address = Set(v);
        }
        if let Some(v) = patch.gender {
            active.gender = Set(v);
        }
        if let Some(v) = patch.nationality {
            active.nationality = Set(v);
        }
        active
    }

    async fn write_personal_info(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        patch: PersonalInfoPatch,
    ) -> Result<(), UserRepositoryError> {
        let existing = personal_infos::Entity::find_by_id(user_id)
            .one(txn)
            .await
            .map_err(Self::map_db_err)?;

        match existing {
            Some(model) => {
                let mut active: personal_infos::ActiveModel = model.into();
                if let Some(v) = patch.photo_ref {
                    active.photo_ref = Set(v);
                }
                if let Some(v) = patch.nationality_card_ref {
                    active.nationality_card_ref = Set(v);
                }
                if let Some(v) = patch.family_book_ref {
                    active.family_book_ref = Set(v);
                }
                if let Some(v) = patch.birth_certificate_ref {
                    active.birth_certificate_ref = Set(v);
                }
                if let Some(v) = patch.degree_certificate_ref {
                    active.degree_certificate_ref = Set(v);
                }
                if let Some(v) = patch.social_media {
                    active.social_media = Set(v.as_ref().map(social_media_to_json));
                }
                active.update(txn).await.map_err(Self::map_db_err)?;
            }
            // First write to the section creates the row.
            None => {
                let now = Utc::now();
                personal_infos::ActiveModel {
                    user_id: Set(user_id),
                    photo_ref: Set(patch.photo_ref.flatten()),
                    nationality_card_ref: Set(patch.nationality_card_ref.flatten()),
                    family_book_ref: Set(patch.family_book_ref.flatten()),
                    birth_certificate_ref: Set(patch.birth_certificate_ref.flatten()),
                    degree_certificate_ref: Set(patch.degree_certificate_ref.flatten()),
                    social_media: Set(patch
                        .social_media
                        .flatten()
                        .as_ref()
                        .map(social_media_to_json)),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                }
                .insert(txn)
                .await
                .map_err(Self::map_db_err)?;
            }
        }

        Ok(())
    }

    async fn write_emergency_contact(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        patch: EmergencyContactPatch,
    ) -> Result<(), UserRepositoryError> {
        let existing = emergency_contacts::Entity::find_by_id(user_id)
            .one(txn)
            .await
            .map_err(Self::map_db_err)?;

        match existing {
            Some(model) => {
                let mut active: emergency_contacts::ActiveModel = model.into();
                if let Some(v) = patch.first_name {
                    active.first_name = Set(v);
                }
                if let Some(v) = patch.last_name {
                    active.last_name = Set(v);
                }
                if let Some(v) = patch.relationship {
                    active.relationship = Set(v);
                }
                if let Some(v) = patch.phone_number {
                    active.phone_number = Set(v);
                }
                if let Some(v) = patch.address {
                    active.address = Set(v);
                }
                if let Some(v) = patch.social_media {
                    active.social_media = Set(v.as_ref().map(social_media_to_json));
                }
                active.update(txn).await.map_err(Self::map_db_err)?;
            }
            None => {
                let now = Utc::now();
                emergency_contacts::ActiveModel {
                    user_id: Set(user_id),
                    first_name: Set(patch.first_name.flatten()),
                    last_name: Set(patch.last_name.flatten()),
                    relationship: Set(patch.relationship.flatten()),
                    phone_number: Set(patch.phone_number.flatten()),
                    address: Set(patch.address.flatten()),
                    social_media: Set(patch
                        .social_media
                        .flatten()
                        .as_ref()
                        .map(social_media_to_json)),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                }
                .insert(txn)
                .await
                .map_err(Self::map_db_err)?;
            }
        }

        Ok(())
    }

    async fn apply_update_graph(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        graph: UserUpdateGraph,
    ) -> Result<(), UserRepositoryError> {
        let user = users::Entity::find_by_id(user_id)
            .one(txn)
            .await
            .map_err(Self::map_db_err)?
            .ok_or(UserRepositoryError::UserNotFound)?;

        if !graph.profile.is_empty() {
            Self::apply_profile_patch(user, graph.profile)
                .update(txn)
                .await
                .map_err(Self::map_db_err)?;
        }

        if !graph.personal_info.is_empty() {
            Self::write_personal_info(txn, user_id, graph.personal_info).await?;
        }

        if !graph.emergency_contact.is_empty() {
            Self::write_emergency_contact(txn, user_id, graph.emergency_contact).await?;
        }

        Ok(())
    }

    async fn delete_graph(
        txn: &DatabaseTransaction,
        user_id: Uuid,
    ) -> Result<(), UserRepositoryError> {
        emergency_contacts::Entity::delete_many()
            .filter(emergency_contacts::Column::UserId.eq(user_id))
            .exec(txn)
            .await
            .map_err(Self::map_db_err)?;

        personal_infos::Entity::delete_many()
            .filter(personal_infos::Column::UserId.eq(user_id))
            .exec(txn)
            .await
            .map_err(Self::map_db_err)?;

        credentials::Entity::delete_many()
            .filter(credentials::Column::UserId.eq(user_id))
            .exec(txn)
            .await
            .map_err(Self::map_db_err)?;

        let deleted = users::Entity::delete_by_id(user_id)
            .exec(txn)
            .await
            .map_err(Self::map_db_err)?;

        if deleted.rows_affected == 0 {
            return Err(UserRepositoryError::UserNotFound);
        }

        Ok(())
    }

    async fn apply_restore(
        txn: &DatabaseTransaction,
        user_id: Uuid,
    ) -> Result<RestoredUser, UserRepositoryError> {
        // Conditional write: only a currently-trashed row qualifies.
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::DeletedAt,
                Expr::value(None::<DateTime<FixedOffset>>),
            )
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::DeletedAt.is_not_null())
            .exec(txn)
            .await
            .map_err(Self::map_db_err)?;

        if result.rows_affected == 0 {
            return Err(UserRepositoryError::UserNotFound);
        }

        let credential = credentials::Entity::find_by_id(user_id)
            .one(txn)
            .await
            .map_err(Self::map_db_err)?
            .ok_or_else(|| {
                UserRepositoryError::DatabaseError(
                    "credential row missing for restored user".to_string(),
                )
            })?;

        Ok(RestoredUser {
            id: user_id,
            email: credential.email,
            username: credential.username,
        })
    }
}

#[async_trait]
impl UserRepository for UserRepositoryPostgres {
    async fn create_user(
        &self,
        graph: CreateUserGraph,
    ) -> Result<CreatedUser, UserRepositoryError> {
        let txn = self.db.begin().await.map_err(Self::map_db_err)?;

        match Self::insert_graph(&txn, graph).await {
            Ok(created) => {
                txn.commit().await.map_err(Self::map_db_err)?;
                Ok(created)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        graph: UserUpdateGraph,
    ) -> Result<(), UserRepositoryError> {
        let txn = self.db.begin().await.map_err(Self::map_db_err)?;

        match Self::apply_update_graph(&txn, user_id, graph).await {
            Ok(()) => {
                txn.commit().await.map_err(Self::map_db_err)?;
                Ok(())
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    async fn soft_delete_user(&self, user_id: Uuid) -> Result<(), UserRepositoryError> {
        // One conditional write. Racing deletes cannot both see a live row:
        // the loser matches zero rows and gets UserNotFound. Already-trashed
        // rows are indistinguishable from missing ones here.
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::DeletedAt,
                Expr::value(Some(Utc::now().fixed_offset())),
            )
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&*self.db)
            .await
            .map_err(Self::map_db_err)?;

        if result.rows_affected == 0 {
            return Err(UserRepositoryError::UserNotFound);
        }

        Ok(())
    }

    async fn restore_user(&self, user_id: Uuid) -> Result<RestoredUser, UserRepositoryError> {
        let txn = self.db.begin().await.map_err(Self::map_db_err)?;

        match Self::apply_restore(&txn, user_id).await {
            Ok(restored) => {
                txn.commit().await.map_err(Self::map_db_err)?;
                Ok(restored)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    async fn hard_delete_user(&self, user_id: Uuid) -> Result<(), UserRepositoryError> {
        let txn = self.db.begin().await.map_err(Self::map_db_err)?;

        match Self::delete_graph(&txn, user_id).await {
            Ok(()) => {
                txn.commit().await.map_err(Self::map_db_err)?;
                Ok(())
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::application::domain::entities::Role;
    use crate::users::application::ports::outgoing::user_repository::{
        NewCredential, NewProfile,
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn fixed_now() -> DateTime<FixedOffset> {
        Utc::now().fixed_offset()
    }

    fn test_graph() -> CreateUserGraph {
        CreateUserGraph {
            user_id: Uuid::new_v4(),
            profile: NewProfile {
                first_name: "Sok".to_string(),
                last_name: "Dara".to_string(),
                dob: None,
                address: None,
                gender: Some("male".to_string()),
                nationality: Some("Khmer".to_string()),
                role: Role::Employee,
            },
            credential: NewCredential {
                email: "sok.dara@example.com".to_string(),
                username: "sokdara".to_string(),
                phone_number: None,
                password_hash: "argon2_hash".to_string(),
            },
            personal_info: None,
            emergency_contact: None,
        }
    }

    fn user_model(id: Uuid, deleted: bool) -> users::Model {
        users::Model {
            id,
            first_name: "Sok".to_string(),
            last_name: "Dara".to_string(),
            dob: None,
            address: None,
            gender: Some("male".to_string()),
            nationality: Some("Khmer".to_string()),
            role: "employee".to_string(),
            is_suspended: false,
            deleted_at: deleted.then(fixed_now),
            created_at: fixed_now(),
            updated_at: fixed_now(),
        }
    }

    fn credential_model(id: Uuid) -> credentials::Model {
        credentials::Model {
            user_id: id,
            email: "sok.dara@example.com".to_string(),
            username: "sokdara".to_string(),
            phone_number: None,
            password_hash: "argon2_hash".to_string(),
            created_at: fixed_now(),
            updated_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(user_id, false)]])
            .append_query_results([vec![credential_model(user_id)]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let graph = test_graph();
        let graph_id = graph.user_id;
        let result = repository.create_user(graph).await;

        assert!(result.is_ok());
        let created = result.unwrap();
        // Rows must be inserted under the caller-minted id, not a fresh one.
        assert_eq!(created.id, graph_id);
        assert_eq!(created.email, "sok.dara@example.com");
        assert_eq!(created.username, "sokdara");
        assert_eq!(created.role, Role::Employee);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_key_maps_to_identity_taken() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom(
                "duplicate key value violates unique constraint \"credentials_email_key\""
                    .to_string(),
            )])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository.create_user(test_graph()).await;

        assert!(matches!(result, Err(UserRepositoryError::IdentityTaken)));
    }

    #[tokio::test]
    async fn test_create_user_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection timeout".to_string())])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository.create_user(test_graph()).await;

        match result.unwrap_err() {
            UserRepositoryError::DatabaseError(msg) => {
                assert!(msg.contains("connection timeout"));
            }
            _ => panic!("Expected DatabaseError variant"),
        }
    }

    #[tokio::test]
    async fn test_update_user_profile_section_only() {
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(user_id, false)]])
            .append_query_results([vec![users::Model {
                first_name: "Chan".to_string(),
                ..user_model(user_id, false)
            }]])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository
            .update_user(
                user_id,
                UserUpdateGraph {
                    profile: ProfilePatch {
                        first_name: Some("Chan".to_string()),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository
            .update_user(
                Uuid::new_v4(),
                UserUpdateGraph {
                    profile: ProfilePatch {
                        first_name: Some("Chan".to_string()),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UserRepositoryError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_update_user_creates_missing_personal_info_row() {
        let user_id = Uuid::new_v4();

        let inserted_info = personal_infos::Model {
            user_id,
            photo_ref: Some("users/x/photo".to_string()),
            nationality_card_ref: None,
            family_book_ref: None,
            birth_certificate_ref: None,
            degree_certificate_ref: None,
            social_media: None,
            created_at: fixed_now(),
            updated_at: fixed_now(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(user_id, false)]])
            .append_query_results([Vec::<personal_infos::Model>::new()])
            .append_query_results([vec![inserted_info]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository
            .update_user(
                user_id,
                UserUpdateGraph {
                    personal_info: PersonalInfoPatch {
                        photo_ref: Some(Some("users/x/photo".to_string())),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_soft_delete_user_success() {
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository.soft_delete_user(user_id).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_soft_delete_trashed_or_unknown_is_not_found() {
        // The conditional write matches zero rows for an unknown id and for
        // a row that another delete already trashed; both must error rather
        // than silently succeed.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository.soft_delete_user(Uuid::new_v4()).await;

        assert!(matches!(result, Err(UserRepositoryError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_restore_user_success() {
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![credential_model(user_id)]])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository.restore_user(user_id).await;

        assert!(result.is_ok());
        let restored = result.unwrap();
        assert_eq!(restored.id, user_id);
        assert_eq!(restored.email, "sok.dara@example.com");
        assert_eq!(restored.username, "sokdara");
    }

    #[tokio::test]
    async fn test_restore_user_not_trashed_is_not_found() {
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository.restore_user(user_id).await;

        assert!(matches!(result, Err(UserRepositoryError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_hard_delete_user_success() {
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository.hard_delete_user(user_id).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_hard_delete_user_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        let result = repository.hard_delete_user(Uuid::new_v4()).await;

        assert!(matches!(result, Err(UserRepositoryError::UserNotFound)));
    }
}
