use sea_orm::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::services::{self, CreateService, ServiceSelector};

/// Insert a new service into the catalog. The unique name index turns a
/// duplicate into `Conflict` via the `DbErr` conversion.
pub async fn insert_service(
    db: &DatabaseConnection,
    input: CreateService,
) -> Result<services::Model, AppError> {
    if input.price < 0 {
        return Err(AppError::InvalidInput(
            "Service price must not be negative".to_string(),
        ));
    }

    let new_service = services::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        price: Set(input.price),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
    };

    new_service.insert(db).await.map_err(AppError::from)
}

/// Fetch all active services.
pub async fn get_active_services(
    db: &DatabaseConnection,
) -> Result<Vec<services::Model>, AppError> {
    services::Entity::find()
        .filter(services::Column::IsActive.eq(true))
        .all(db)
        .await
        .map_err(AppError::from)
}

/// Fetch the active services among a set of ids, preserving no particular
/// order. Inactive or unknown ids are silently dropped.
pub async fn get_active_by_ids(
    db: &DatabaseConnection,
    ids: &[Uuid],
) -> Result<Vec<services::Model>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    services::Entity::find()
        .filter(services::Column::Id.is_in(ids.iter().copied()))
        .filter(services::Column::IsActive.eq(true))
        .all(db)
        .await
        .map_err(AppError::from)
}

/// Resolve caller-supplied selectors to active service rows, once, at the
/// store boundary. Name matching is case-insensitive on the trimmed name.
/// Resolving nothing at all is an error; individual duds are dropped.
pub async fn resolve_selectors(
    db: &DatabaseConnection,
    selectors: &[ServiceSelector],
) -> Result<Vec<services::Model>, AppError> {
    if selectors.is_empty() {
        return Err(AppError::InvalidInput(
            "No services were specified".to_string(),
        ));
    }

    // The catalog is small; one fetch and in-memory matching keeps the
    // case-insensitive name lookup out of SQL dialect territory.
    let catalog = get_active_services(db).await?;

    let mut matched: Vec<services::Model> = Vec::new();
    for selector in selectors {
        let hit = match selector {
            ServiceSelector::ById(id) => catalog.iter().find(|s| s.id == *id),
            ServiceSelector::ByName(name) => {
                let wanted = name.trim();
                catalog.iter().find(|s| s.name.eq_ignore_ascii_case(wanted))
            }
        };
        if let Some(service) = hit {
            if !matched.iter().any(|m| m.id == service.id) {
                matched.push(service.clone());
            }
        }
    }

    if matched.is_empty() {
        return Err(AppError::NotFound(
            "No valid active services found for the provided names or ids".to_string(),
        ));
    }

    Ok(matched)
}
