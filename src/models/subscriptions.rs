use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subscription status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum SubscriptionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "expired")]
    Expired,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// One billed line item of a subscription.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub service_id: Uuid,
    pub name: String,
    pub added_on: DateTimeUtc,
    /// Full price when present at activation, prorated for mid-cycle add-ons.
    pub prorated_price: i64,
}

/// JSONB list of the plan's line items.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct ServiceEntryList(pub Vec<ServiceEntry>);

/// SeaORM entity for the `subscriptions` table. At most one row per vendor
/// has `is_active = true`; renewals expire the old row and insert a new one.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub plan_price: i64,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub status: SubscriptionStatus,
    pub is_active: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub services: ServiceEntryList,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id"
    )]
    Vendor,
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Payment-gateway receipt attached to every mutating subscription call.
/// Nothing is committed unless the signature checks out.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentProof {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Body for `POST /api/subscriptions/services/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddServicesRequest {
    #[serde(flatten)]
    pub payment: PaymentProof,
    pub services: Vec<super::services::ServiceSelector>,
}
