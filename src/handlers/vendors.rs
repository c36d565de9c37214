use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedVendor;
use crate::db::vendors as vendor_db;
use crate::errors::AppError;
use crate::models::vendors::UpdateLocation;

/// PUT /api/vendors/location — set the vendor's canonical location used
/// by the nearby-job search.
pub async fn update_location(
    vendor: AuthenticatedVendor,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateLocation>,
) -> Result<HttpResponse, AppError> {
    let updated = vendor_db::update_location(db.get_ref(), vendor.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}
