use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::{AuthenticatedSociety, AuthenticatedVendor};
use crate::db::applications as application_db;
use crate::db::applications::ApprovalPolicy;
use crate::errors::AppError;
use crate::models::applications::ApplyRequest;

/// POST /api/applications/job/{job_id} — apply to a job (vendor only).
pub async fn apply(
    vendor: AuthenticatedVendor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ApplyRequest>,
) -> Result<HttpResponse, AppError> {
    let application =
        application_db::apply(db.get_ref(), &vendor.0, path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(application))
}

/// PUT /api/applications/{id}/approve — pick this applicant; pending
/// siblings are rejected and the job leaves the open pool (society only).
pub async fn approve(
    society: AuthenticatedSociety,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    policy: web::Data<ApprovalPolicy>,
) -> Result<HttpResponse, AppError> {
    let application = application_db::approve(
        db.get_ref(),
        society.0.id,
        path.into_inner(),
        *policy.get_ref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(application))
}

/// PUT /api/applications/{id}/reject — turn down a pending application
/// (society only).
pub async fn reject(
    society: AuthenticatedSociety,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let application =
        application_db::reject(db.get_ref(), society.0.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(application))
}

/// PUT /api/applications/{id}/withdraw — withdraw the vendor's own
/// application; withdrawing an approved one re-opens the job.
pub async fn withdraw(
    vendor: AuthenticatedVendor,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let application =
        application_db::withdraw(db.get_ref(), &vendor.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(application))
}
