use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Job lifecycle status stored as a lowercase string in the database.
///
/// `is_active` on the row is a separate soft-disable switch; a job can be
/// `New` yet hidden from matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum JobStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "expired")]
    Expired,
}

/// SeaORM entity for the `jobs` table.
///
/// Location is stored dually for backward compatibility: `latitude`/
/// `longitude` exist on every row (legacy display pair), `geo_lat`/`geo_lon`
/// feed the earthdistance index and are NULL on rows imported before the
/// index existed. The nearby query covers both.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    pub title: String,
    pub job_type: String,
    pub required_experience: String,
    #[sea_orm(column_type = "Text")]
    pub details: String,
    pub contact_number: String,
    #[sea_orm(column_type = "Double")]
    pub latitude: f64,
    #[sea_orm(column_type = "Double")]
    pub longitude: f64,
    #[sea_orm(column_type = "Double", nullable)]
    pub geo_lat: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub geo_lon: Option<f64>,
    pub offered_price: i64,
    pub scheduled_for: DateTimeUtc,
    pub quotation_required: bool,
    pub is_active: bool,
    pub status: JobStatus,
    pub selected_vendor_id: Option<Uuid>,
    pub completed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::applications::Entity")]
    Applications,
    #[sea_orm(
        belongs_to = "super::societies::Entity",
        from = "Column::SocietyId",
        to = "super::societies::Column::Id"
    )]
    Society,
}

impl Related<super::applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::societies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Society.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body for `POST /api/jobs`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    pub title: String,
    pub job_type: String,
    pub required_experience: String,
    pub details: String,
    pub contact_number: String,
    pub latitude: f64,
    pub longitude: f64,
    pub offered_price: i64,
    pub scheduled_for: DateTimeUtc,
    pub quotation_required: Option<bool>,
}

/// Query parameters for `GET /api/jobs/nearby`.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyQuery {
    pub max_distance: Option<f64>,
    pub quotation_required: Option<bool>,
}

impl NearbyQuery {
    /// Search radius in meters, 20 km unless the caller narrows it.
    pub fn max_distance_m(&self) -> f64 {
        self.max_distance.unwrap_or(20_000.0)
    }
}
