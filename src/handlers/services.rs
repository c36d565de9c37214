use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::{AdminClaims, AnyClaims};
use crate::cache::ServiceCatalog;
use crate::db::services as service_db;
use crate::errors::AppError;
use crate::models::services::CreateService;

/// GET /api/services — the active service catalog, served from cache.
/// Any authenticated caller may read it.
pub async fn get_services(
    _caller: AnyClaims,
    db: web::Data<DatabaseConnection>,
    catalog: web::Data<ServiceCatalog>,
) -> Result<HttpResponse, AppError> {
    let services = catalog.active(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(services.as_ref()))
}

/// POST /api/services — add a service to the catalog (admin only). The
/// cached catalog is dropped so the next read sees the new row.
pub async fn create_service(
    _admin: AdminClaims,
    db: web::Data<DatabaseConnection>,
    catalog: web::Data<ServiceCatalog>,
    body: web::Json<CreateService>,
) -> Result<HttpResponse, AppError> {
    let service = service_db::insert_service(db.get_ref(), body.into_inner()).await?;
    catalog.invalidate().await;
    Ok(HttpResponse::Created().json(service))
}
