use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedVendor;
use crate::db::subscriptions as subscription_db;
use crate::errors::AppError;
use crate::models::subscriptions::{AddServicesRequest, PaymentProof};
use crate::payment::{self, PaymentSecret};

/// Every mutating subscription call starts here. A bad signature means
/// the handler returns before any query runs.
fn require_verified(secret: &PaymentSecret, proof: &PaymentProof) -> Result<(), AppError> {
    if payment::verify_signature(
        &secret.0,
        &proof.order_id,
        &proof.payment_id,
        &proof.signature,
    ) {
        Ok(())
    } else {
        tracing::warn!(order_id = %proof.order_id, "payment signature mismatch");
        Err(AppError::PaymentVerificationFailed)
    }
}

/// POST /api/subscriptions/verify — activate a one-year subscription over
/// the vendor's services after verifying the payment receipt.
pub async fn activate(
    vendor: AuthenticatedVendor,
    db: web::Data<DatabaseConnection>,
    secret: web::Data<PaymentSecret>,
    body: web::Json<PaymentProof>,
) -> Result<HttpResponse, AppError> {
    require_verified(secret.get_ref(), &body)?;
    let subscription = subscription_db::activate(db.get_ref(), &vendor.0).await?;
    Ok(HttpResponse::Created().json(subscription))
}

/// GET /api/subscriptions/status — the vendor's current subscription
/// state, with lapsed rows expired on read.
pub async fn status(
    vendor: AuthenticatedVendor,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let view = subscription_db::status(db.get_ref(), vendor.0.id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/subscriptions/services/verify — add services to the running
/// subscription at a prorated price, after verifying the payment receipt.
pub async fn add_services(
    vendor: AuthenticatedVendor,
    db: web::Data<DatabaseConnection>,
    secret: web::Data<PaymentSecret>,
    body: web::Json<AddServicesRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require_verified(secret.get_ref(), &body.payment)?;
    let subscription =
        subscription_db::add_services(db.get_ref(), &vendor.0, &body.services).await?;
    Ok(HttpResponse::Ok().json(subscription))
}
