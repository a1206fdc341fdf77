use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::FirstName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Users::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Users::Dob).date().null())
                    .col(ColumnDef::new(Users::Address).text().null())
                    .col(ColumnDef::new(Users::Gender).string_len(20).null())
                    .col(ColumnDef::new(Users::Nationality).string_len(100).null())
                    .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Users::IsSuspended)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // Soft-delete tombstone. NULL means the row is visible to
                    // default listings.
                    .col(
                        ColumnDef::new(Users::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================
        // PERFORMANCE INDEXES
        // ============================================

        // 1. Default listings exclude trashed rows; index only the live ones.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_users_live
                ON users (created_at DESC)
                WHERE deleted_at IS NULL;
                "#,
            )
            .await?;

        // 2. Trash views (only_trashed / with_trashed).
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_users_deleted_at
                ON users (deleted_at)
                WHERE deleted_at IS NOT NULL;
                "#,
            )
            .await?;

        // 3. Common admin filters.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_users_role ON users (role);
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_users_nationality ON users (nationality);
                "#,
            )
            .await?;

        // 4. Default sort key.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_users_created_at
                ON users (created_at DESC);
                "#,
            )
            .await?;

        // ============================================
        // TRIGGER FOR updated_at
        // ============================================

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = CURRENT_TIMESTAMP;
                    RETURN NEW;
                END;
                $$ language 'plpgsql';
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER update_users_updated_at
                BEFORE UPDATE ON users
                FOR EACH ROW
                EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TRIGGER IF EXISTS update_users_updated_at ON users")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP FUNCTION IF EXISTS update_updated_at_column")
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP INDEX IF EXISTS idx_users_live;
                DROP INDEX IF EXISTS idx_users_deleted_at;
                DROP INDEX IF EXISTS idx_users_role;
                DROP INDEX IF EXISTS idx_users_nationality;
                DROP INDEX IF EXISTS idx_users_created_at;
                "#,
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Dob,
    Address,
    Gender,
    Nationality,
    Role,
    IsSuspended,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}
