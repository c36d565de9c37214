use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `societies` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "societies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub contact: String,
    pub address: String,
    pub city: String,
    pub residents_count: i32,
    pub is_approved: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::jobs::Entity")]
    Jobs,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Society summary attached to nearby-job results.
#[derive(Debug, Clone, Serialize)]
pub struct SocietySummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub address: String,
    pub city: String,
    pub residents_count: i32,
}

impl From<Model> for SocietySummary {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            contact: m.contact,
            address: m.address,
            city: m.city,
            residents_count: m.residents_count,
        }
    }
}
