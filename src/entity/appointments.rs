use sea_orm::entity::prelude::*;

/// `(barber_id, appointment_date, start_time)` is unique among rows whose status
/// is not `cancelled` (partial index `appointments_active_slot_key`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub appointment_date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub status: String,
    pub paid: bool,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::CustomerId",
        to = "super::profiles::Column::Id"
    )]
    Profiles,
    #[sea_orm(
        belongs_to = "super::barbers::Entity",
        from = "Column::BarberId",
        to = "super::barbers::Column::Id"
    )]
    Barbers,
    #[sea_orm(
        belongs_to = "super::services::Entity",
        from = "Column::ServiceId",
        to = "super::services::Column::Id"
    )]
    Services,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl Related<super::barbers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Barbers.def()
    }
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
