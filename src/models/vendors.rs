use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// JSONB list of service ids owned by a vendor.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct ServiceIdList(pub Vec<Uuid>);

impl ServiceIdList {
    /// Append with set semantics — a second push of the same id is a no-op.
    pub fn push_unique(&mut self, id: Uuid) {
        if !self.0.contains(&id) {
            self.0.push(id);
        }
    }
}

/// JSONB list of job ids a vendor has been selected for.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct JobIdList(pub Vec<Uuid>);

impl JobIdList {
    pub fn push_unique(&mut self, id: Uuid) {
        if !self.0.contains(&id) {
            self.0.push(id);
        }
    }

    pub fn remove(&mut self, id: Uuid) {
        self.0.retain(|j| *j != id);
    }
}

/// SeaORM entity for the `vendors` table.
///
/// `latitude`/`longitude` are the one canonical location representation;
/// (0, 0) means the vendor never set a location (legacy default) and is
/// rejected before any geo query.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub contact_number: String,
    #[sea_orm(column_type = "Double")]
    pub latitude: f64,
    #[sea_orm(column_type = "Double")]
    pub longitude: f64,
    #[sea_orm(column_type = "JsonBinary")]
    pub services: ServiceIdList,
    #[sea_orm(column_type = "JsonBinary")]
    pub job_history: JobIdList,
    #[sea_orm(column_type = "Double")]
    pub average_rating: f64,
    pub total_ratings: i32,
    pub is_approved: bool,
    pub is_blacklisted: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::applications::Entity")]
    Applications,
    #[sea_orm(has_many = "super::subscriptions::Entity")]
    Subscriptions,
}

impl Related<super::applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscriptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body for `PUT /api/vendors/location`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLocation {
    pub latitude: f64,
    pub longitude: f64,
}
