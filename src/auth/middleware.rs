use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt::{self, Claims};
use crate::db::societies as society_db;
use crate::db::vendors as vendor_db;
use crate::models::{societies, vendors};

/// Wrapper type to store the JWT secret in Actix app data.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// Shared bearer-token plumbing for all three extractors.
fn claims_from_request(req: &HttpRequest) -> Result<Claims, Error> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("Missing Authorization header"))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        actix_web::error::ErrorUnauthorized("Authorization header must be: Bearer <token>")
    })?;

    let secret = req
        .app_data::<web::Data<JwtSecret>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("JWT secret not configured"))?;

    jwt::validate_token(token, &secret.0)
        .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))
}

/// Extractor for routes only a vendor may call. Validates the JWT, checks
/// the role, and loads the vendor row so handlers get the full profile.
pub struct AuthenticatedVendor(pub vendors::Model);

impl FromRequest for AuthenticatedVendor {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = claims_from_request(&req)?;
            if claims.role != "vendor" {
                return Err(actix_web::error::ErrorForbidden(
                    "Only vendors can access this resource",
                ));
            }

            let vendor_id = claims
                .actor_id()
                .map_err(actix_web::error::ErrorUnauthorized)?;

            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("Database not configured")
                })?;

            let vendor = vendor_db::get_vendor_by_id(db.get_ref(), vendor_id)
                .await
                .map_err(|e| {
                    actix_web::error::ErrorInternalServerError(format!("Database error: {e}"))
                })?
                .ok_or_else(|| {
                    actix_web::error::ErrorUnauthorized("Vendor not found. Check your auth token.")
                })?;

            if vendor.is_blacklisted {
                return Err(actix_web::error::ErrorForbidden(
                    "This vendor account is blacklisted",
                ));
            }

            Ok(AuthenticatedVendor(vendor))
        })
    }
}

/// Extractor for routes only a society may call.
pub struct AuthenticatedSociety(pub societies::Model);

impl FromRequest for AuthenticatedSociety {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = claims_from_request(&req)?;
            if claims.role != "society" {
                return Err(actix_web::error::ErrorForbidden(
                    "Only societies can access this resource",
                ));
            }

            let society_id = claims
                .actor_id()
                .map_err(actix_web::error::ErrorUnauthorized)?;

            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("Database not configured")
                })?;

            let society = society_db::get_society_by_id(db.get_ref(), society_id)
                .await
                .map_err(|e| {
                    actix_web::error::ErrorInternalServerError(format!("Database error: {e}"))
                })?
                .ok_or_else(|| {
                    actix_web::error::ErrorUnauthorized("Society not found. Check your auth token.")
                })?;

            Ok(AuthenticatedSociety(society))
        })
    }
}

/// Extractor for routes any authenticated caller may hit, whatever the
/// role. No row is loaded.
pub struct AnyClaims(pub Claims);

impl FromRequest for AnyClaims {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { claims_from_request(&req).map(AnyClaims) })
    }
}

/// Extractor for admin-only routes. Admins have no backing table; the role
/// claim alone authorizes them.
pub struct AdminClaims(pub Claims);

impl FromRequest for AdminClaims {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = claims_from_request(&req)?;
            if claims.role != "admin" {
                return Err(actix_web::error::ErrorForbidden(
                    "Only admins can access this resource",
                ));
            }
            Ok(AdminClaims(claims))
        })
    }
}
