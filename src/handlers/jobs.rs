use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::{AdminClaims, AuthenticatedSociety, AuthenticatedVendor};
use crate::db::applications as application_db;
use crate::db::jobs as job_db;
use crate::errors::AppError;
use crate::models::jobs::{CreateJob, NearbyQuery};

/// POST /api/jobs — post a new job (society only).
pub async fn create_job(
    society: AuthenticatedSociety,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateJob>,
) -> Result<HttpResponse, AppError> {
    let job = job_db::insert_job(db.get_ref(), society.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(job))
}

/// GET /api/jobs/mine — the calling society's jobs, newest first.
pub async fn get_my_jobs(
    society: AuthenticatedSociety,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let jobs = job_db::get_jobs_by_society(db.get_ref(), society.0.id).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /api/jobs/nearby — jobs within range of the vendor's stored
/// location, nearest first (vendor only).
pub async fn get_nearby_jobs(
    vendor: AuthenticatedVendor,
    db: web::Data<DatabaseConnection>,
    query: web::Query<NearbyQuery>,
) -> Result<HttpResponse, AppError> {
    let jobs = job_db::find_nearby_jobs(db.get_ref(), &vendor.0, &query).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /api/jobs/{id} — a single job (society owner only).
pub async fn get_job(
    society: AuthenticatedSociety,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let job = job_db::get_job_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    if job.society_id != society.0.id {
        return Err(AppError::Unauthorized(
            "This job does not belong to you".to_string(),
        ));
    }
    Ok(HttpResponse::Ok().json(job))
}

/// DELETE /api/jobs/{id} — remove a job and its applications (owner only).
pub async fn delete_job(
    society: AuthenticatedSociety,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let job = job_db::get_job_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    if job.society_id != society.0.id {
        return Err(AppError::Unauthorized(
            "This job does not belong to you".to_string(),
        ));
    }
    job_db::delete_job(db.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": id })))
}

/// GET /api/jobs/{id}/applicants — every application on the job with
/// vendor details (owner only).
pub async fn get_applicants(
    society: AuthenticatedSociety,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let applicants =
        application_db::get_applicants_for_job(db.get_ref(), society.0.id, path.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(applicants))
}

/// GET /api/jobs/{id}/applicant-count — application totals by type
/// (owner only).
pub async fn get_applicant_count(
    society: AuthenticatedSociety,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let job_id = path.into_inner();
    let job = job_db::get_job_by_id(db.get_ref(), job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    if job.society_id != society.0.id {
        return Err(AppError::Unauthorized(
            "This job does not belong to you".to_string(),
        ));
    }
    let count = application_db::applicant_count(db.get_ref(), job_id).await?;
    Ok(HttpResponse::Ok().json(count))
}

/// POST /api/jobs/expire-stale — sweep jobs past the retention window to
/// Expired (admin only). Safe to call repeatedly.
pub async fn expire_stale(
    _admin: AdminClaims,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let expired =
        job_db::expire_stale_jobs(db.get_ref(), job_db::DEFAULT_RETENTION_DAYS).await?;
    tracing::info!("expired {expired} stale jobs");
    Ok(HttpResponse::Ok().json(serde_json::json!({ "expired": expired })))
}
