use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmergencyContacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmergencyContacts::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmergencyContacts::FirstName)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EmergencyContacts::LastName)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EmergencyContacts::Relationship)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EmergencyContacts::PhoneNumber)
                            .string_len(30)
                            .null(),
                    )
                    .col(ColumnDef::new(EmergencyContacts::Address).text().null())
                    .col(
                        ColumnDef::new(EmergencyContacts::SocialMedia)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EmergencyContacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(EmergencyContacts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_emergency_contacts_user")
                            .from(EmergencyContacts::Table, EmergencyContacts::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER update_emergency_contacts_updated_at
                BEFORE UPDATE ON emergency_contacts
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
                "DROP TRIGGER IF EXISTS update_emergency_contacts_updated_at ON emergency_contacts",
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EmergencyContacts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EmergencyContacts {
    Table,
    UserId,
    FirstName,
    LastName,
    Relationship,
    PhoneNumber,
    Address,
    SocialMedia,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
