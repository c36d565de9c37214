use sea_orm::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::geo;
use crate::models::vendors::{self, UpdateLocation};

/// Fetch a single vendor by ID.
pub async fn get_vendor_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<vendors::Model>, DbErr> {
    vendors::Entity::find_by_id(id).one(db).await
}

/// Update a vendor's canonical location. The same validation the matcher
/// applies on read runs here, so a bad pair never gets stored.
pub async fn update_location(
    db: &DatabaseConnection,
    vendor: vendors::Model,
    input: UpdateLocation,
) -> Result<vendors::Model, AppError> {
    geo::validate_vendor_location(input.latitude, input.longitude)?;

    let mut active: vendors::ActiveModel = vendor.into();
    active.latitude = Set(input.latitude);
    active.longitude = Set(input.longitude);

    active.update(db).await.map_err(AppError::from)
}
