use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<Date>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub role: String,
    pub is_suspended: bool,
    /// Soft-delete tombstone; NULL while the user is live.
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::credentials::Entity")]
    Credentials,
    #[sea_orm(has_one = "super::personal_infos::Entity")]
    PersonalInfos,
    #[sea_orm(has_one = "super::emergency_contacts::Entity")]
    EmergencyContacts,
}

impl Related<super::credentials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credentials.def()
    }
}

impl Related<super::personal_infos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PersonalInfos.def()
    }
}

impl Related<super::emergency_contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmergencyContacts.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        use chrono::Utc;
        use sea_orm::ActiveValue::Set;

        if !insert {
            // Only update updated_at on UPDATE, not INSERT
            self.updated_at = Set(Utc::now().into());
        }

        Ok(self)
    }
}
