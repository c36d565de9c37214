use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::societies;

/// Fetch a single society by ID.
pub async fn get_society_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<societies::Model>, DbErr> {
    societies::Entity::find_by_id(id).one(db).await
}

/// Fetch societies for a set of ids, keyed for joining onto job lists.
pub async fn get_societies_by_ids(
    db: &DatabaseConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, societies::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = societies::Entity::find()
        .filter(societies::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|s| (s.id, s)).collect())
}
