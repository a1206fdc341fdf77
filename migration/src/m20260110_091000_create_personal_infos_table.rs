use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PersonalInfos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PersonalInfos::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // Stable reference strings handed back by the document
                    // storage collaborator, never raw file paths.
                    .col(ColumnDef::new(PersonalInfos::PhotoRef).string_len(512).null())
                    .col(
                        ColumnDef::new(PersonalInfos::NationalityCardRef)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PersonalInfos::FamilyBookRef)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PersonalInfos::BirthCertificateRef)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PersonalInfos::DegreeCertificateRef)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PersonalInfos::SocialMedia)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PersonalInfos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PersonalInfos::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_personal_infos_user")
                            .from(PersonalInfos::Table, PersonalInfos::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER update_personal_infos_updated_at
                BEFORE UPDATE ON personal_infos
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
            .execute_unprepared(
                "DROP TRIGGER IF EXISTS update_personal_infos_updated_at ON personal_infos",
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PersonalInfos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PersonalInfos {
    Table,
    UserId,
    PhotoRef,
    NationalityCardRef,
    FamilyBookRef,
    BirthCertificateRef,
    DegreeCertificateRef,
    SocialMedia,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
