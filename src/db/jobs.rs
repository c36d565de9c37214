use chrono::{Duration, FixedOffset, Utc};
use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::societies as society_db;
use crate::errors::AppError;
use crate::geo;
use crate::models::applications::{self, ApplicationType, Status};
use crate::models::jobs::{self, CreateJob, JobStatus, NearbyQuery};
use crate::models::societies::SocietySummary;
use crate::models::vendors;

/// Jobs untouched for this many days get swept to Expired.
pub const DEFAULT_RETENTION_DAYS: i64 = 90;

/// Insert a new job. Coordinates are validated up front and written to both
/// the legacy display pair and the indexed geo pair.
pub async fn insert_job(
    db: &DatabaseConnection,
    society_id: Uuid,
    input: CreateJob,
) -> Result<jobs::Model, AppError> {
    if !input.latitude.is_finite() || !input.longitude.is_finite() {
        return Err(AppError::InvalidInput(
            "Location latitude and longitude are required".to_string(),
        ));
    }

    let new_job = jobs::ActiveModel {
        id: Set(Uuid::new_v4()),
        society_id: Set(society_id),
        title: Set(input.title),
        job_type: Set(input.job_type),
        required_experience: Set(input.required_experience),
        details: Set(input.details),
        contact_number: Set(input.contact_number),
        latitude: Set(input.latitude),
        longitude: Set(input.longitude),
        geo_lat: Set(Some(input.latitude)),
        geo_lon: Set(Some(input.longitude)),
        offered_price: Set(input.offered_price),
        scheduled_for: Set(input.scheduled_for),
        quotation_required: Set(input.quotation_required.unwrap_or(false)),
        is_active: Set(true),
        status: Set(JobStatus::New),
        selected_vendor_id: Set(None),
        completed_at: Set(None),
        created_at: Set(Utc::now()),
    };

    new_job.insert(db).await.map_err(AppError::from)
}

/// Fetch a single job by ID.
pub async fn get_job_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<jobs::Model>, DbErr> {
    jobs::Entity::find_by_id(id).one(db).await
}

/// Fetch all jobs posted by a society, newest first.
pub async fn get_jobs_by_society(
    db: &DatabaseConnection,
    society_id: Uuid,
) -> Result<Vec<jobs::Model>, DbErr> {
    jobs::Entity::find()
        .filter(jobs::Column::SocietyId.eq(society_id))
        .order_by_desc(jobs::Column::CreatedAt)
        .all(db)
        .await
}

/// Delete a job. Applications cascade with it.
pub async fn delete_job(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    jobs::Entity::delete_by_id(id).exec(db).await
}

/// Sweep jobs older than the retention window into Expired. Completed and
/// already-Expired jobs are left alone, so a repeat run changes nothing.
/// `completed_at` is never stamped here: Expired is not Completed.
pub async fn expire_stale_jobs(
    db: &DatabaseConnection,
    retention_days: i64,
) -> Result<u64, AppError> {
    let cutoff = Utc::now() - Duration::days(retention_days);

    let stale = jobs::Entity::find()
        .filter(jobs::Column::CreatedAt.lt(cutoff))
        .filter(jobs::Column::Status.is_not_in([JobStatus::Completed, JobStatus::Expired]))
        .all(db)
        .await?;

    let count = stale.len() as u64;
    for job in stale {
        let mut active: jobs::ActiveModel = job.into();
        active.status = Set(JobStatus::Expired);
        active.update(db).await?;
    }

    Ok(count)
}

// ── Nearby matching ──

/// The vendor's own application on a nearby job, if any.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApplicationBrief {
    pub status: Status,
    pub application_type: ApplicationType,
}

/// One nearby job as returned to the vendor, with distance, the owning
/// society's summary, and display timestamps in the service timezone.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NearbyJob {
    pub id: Uuid,
    pub title: String,
    pub job_type: String,
    pub required_experience: String,
    pub details: String,
    pub contact_number: String,
    pub latitude: f64,
    pub longitude: f64,
    pub offered_price: i64,
    pub quotation_required: bool,
    pub scheduled_for: chrono::DateTime<Utc>,
    pub status: JobStatus,
    pub distance_m: f64,
    pub distance_km: f64,
    pub posted_at: String,
    pub completed_at: Option<String>,
    pub application_status: Option<ApplicationBrief>,
    pub society: Option<SocietySummary>,
}

/// Row shape of the indexed geo query: job id plus spherical distance.
#[derive(Debug, FromQueryResult)]
struct GeoHit {
    id: Uuid,
    distance_m: f64,
}

/// Find active, non-expired jobs within `max_distance` meters of the
/// vendor, nearest first.
///
/// Two paths feed the result: the earthdistance index over (geo_lat,
/// geo_lon), and a bounding-box scan over the legacy latitude/longitude
/// pair with the distance computed here (haversine). The union keeps the
/// smaller distance per job. If the indexed query fails the request
/// degrades to the scan alone rather than failing outright.
pub async fn find_nearby_jobs(
    db: &DatabaseConnection,
    vendor: &vendors::Model,
    filter: &NearbyQuery,
) -> Result<Vec<NearbyJob>, AppError> {
    geo::validate_vendor_location(vendor.latitude, vendor.longitude)?;

    let lat = vendor.latitude;
    let lon = vendor.longitude;
    let max_distance = filter.max_distance_m();
    if !max_distance.is_finite() || max_distance <= 0.0 {
        return Err(AppError::InvalidInput(
            "max_distance must be a positive number of meters".to_string(),
        ));
    }

    // 1. Indexed spherical query; degraded to empty on failure.
    let primary = match geo_index_query(db, lat, lon, max_distance, filter).await {
        Ok(hits) => hits,
        Err(err) => {
            tracing::warn!("indexed geo query failed, using bounding-box scan only: {err}");
            Vec::new()
        }
    };

    // Resolve primary hits to full rows.
    let primary_ids: Vec<Uuid> = primary.iter().map(|h| h.id).collect();
    let primary_models: HashMap<Uuid, jobs::Model> = if primary_ids.is_empty() {
        HashMap::new()
    } else {
        jobs::Entity::find()
            .filter(jobs::Column::Id.is_in(primary_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|j| (j.id, j))
            .collect()
    };
    let primary: Vec<(jobs::Model, f64)> = primary
        .into_iter()
        .filter_map(|hit| primary_models.get(&hit.id).cloned().map(|j| (j, hit.distance_m)))
        .collect();

    // 2. Bounding-box scan over the legacy pair; covers rows with no
    // indexed geo data and double-checks the rest.
    let bbox = geo::bounding_box(lat, lon, max_distance);
    let mut scan = jobs::Entity::find()
        .filter(jobs::Column::IsActive.eq(true))
        .filter(jobs::Column::Status.ne(JobStatus::Expired))
        .filter(jobs::Column::Latitude.between(bbox.min_lat, bbox.max_lat))
        .filter(jobs::Column::Longitude.between(bbox.min_lon, bbox.max_lon));
    if let Some(wanted) = filter.quotation_required {
        scan = scan.filter(jobs::Column::QuotationRequired.eq(wanted));
    }

    let fallback: Vec<(jobs::Model, f64)> = scan
        .all(db)
        .await?
        .into_iter()
        .map(|job| {
            let d = geo::haversine_distance_m(lat, lon, job.latitude, job.longitude);
            (job, d)
        })
        .filter(|(_, d)| *d <= max_distance)
        .collect();

    // 3. Union by job id, nearest distance wins, sorted ascending.
    let merged = merge_candidates(primary, fallback, max_distance);
    if merged.is_empty() {
        return Ok(Vec::new());
    }

    // 4. Attach society summaries and the vendor's own applications.
    let society_ids: Vec<Uuid> = merged.iter().map(|(j, _)| j.society_id).collect();
    let societies = society_db::get_societies_by_ids(db, &society_ids).await?;

    let job_ids: Vec<Uuid> = merged.iter().map(|(j, _)| j.id).collect();
    let own_applications: HashMap<Uuid, ApplicationBrief> = applications::Entity::find()
        .filter(applications::Column::VendorId.eq(vendor.id))
        .filter(applications::Column::JobId.is_in(job_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| {
            (
                a.job_id,
                ApplicationBrief {
                    status: a.status,
                    application_type: a.application_type,
                },
            )
        })
        .collect();

    Ok(merged
        .into_iter()
        .map(|(job, distance_m)| NearbyJob {
            society: societies.get(&job.society_id).cloned().map(SocietySummary::from),
            application_status: own_applications.get(&job.id).cloned(),
            distance_m,
            distance_km: (distance_m / 10.0).round() / 100.0,
            posted_at: display_timestamp(job.created_at),
            completed_at: job.completed_at.map(display_timestamp),
            id: job.id,
            title: job.title,
            job_type: job.job_type,
            required_experience: job.required_experience,
            details: job.details,
            contact_number: job.contact_number,
            latitude: job.latitude,
            longitude: job.longitude,
            offered_price: job.offered_price,
            quotation_required: job.quotation_required,
            scheduled_for: job.scheduled_for,
            status: job.status,
        })
        .collect())
}

/// Spherical nearest-neighbor query against the earthdistance GiST index.
async fn geo_index_query(
    db: &DatabaseConnection,
    lat: f64,
    lon: f64,
    max_distance: f64,
    filter: &NearbyQuery,
) -> Result<Vec<GeoHit>, DbErr> {
    let sql = r#"
        SELECT id,
               earth_distance(ll_to_earth($1, $2), ll_to_earth(geo_lat, geo_lon)) AS distance_m
        FROM jobs
        WHERE geo_lat IS NOT NULL
          AND geo_lon IS NOT NULL
          AND is_active = TRUE
          AND status <> 'expired'
          AND ($4::boolean IS NULL OR quotation_required = $4)
          AND earth_box(ll_to_earth($1, $2), $3) @> ll_to_earth(geo_lat, geo_lon)
          AND earth_distance(ll_to_earth($1, $2), ll_to_earth(geo_lat, geo_lon)) <= $3
        ORDER BY distance_m ASC
    "#;

    GeoHit::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        sql,
        [
            lat.into(),
            lon.into(),
            max_distance.into(),
            filter.quotation_required.into(),
        ],
    ))
    .all(db)
    .await
}

/// Union two candidate sets by job id, keeping the smaller distance on
/// conflict, dropping anything beyond `max_distance`, nearest first.
fn merge_candidates(
    primary: Vec<(jobs::Model, f64)>,
    fallback: Vec<(jobs::Model, f64)>,
    max_distance: f64,
) -> Vec<(jobs::Model, f64)> {
    let mut by_id: HashMap<Uuid, (jobs::Model, f64)> = HashMap::new();

    for (job, distance) in primary.into_iter().chain(fallback) {
        match by_id.get(&job.id) {
            Some((_, best)) if *best <= distance => {}
            _ => {
                by_id.insert(job.id, (job, distance));
            }
        }
    }

    let mut merged: Vec<(jobs::Model, f64)> = by_id
        .into_values()
        .filter(|(_, d)| *d <= max_distance)
        .collect();
    merged.sort_by(|a, b| a.1.total_cmp(&b.1));
    merged
}

/// Render a UTC timestamp in the fixed display timezone (IST, +05:30).
fn display_timestamp(ts: chrono::DateTime<Utc>) -> String {
    let ist = FixedOffset::east_opt(5 * 3600 + 1800).expect("IST offset is valid");
    ts.with_timezone(&ist).format("%d/%m/%Y, %I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: Uuid) -> jobs::Model {
        jobs::Model {
            id,
            society_id: Uuid::new_v4(),
            title: "Plumbing repair".to_string(),
            job_type: "plumbing".to_string(),
            required_experience: ">1 years".to_string(),
            details: "Fix the overhead tank line".to_string(),
            contact_number: "9876543210".to_string(),
            latitude: 19.076,
            longitude: 72.8777,
            geo_lat: Some(19.076),
            geo_lon: Some(72.8777),
            offered_price: 1500,
            scheduled_for: Utc::now(),
            quotation_required: false,
            is_active: true,
            status: JobStatus::New,
            selected_vendor_id: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn merge_keeps_smaller_distance_per_job() {
        let id = Uuid::new_v4();
        let merged = merge_candidates(
            vec![(job(id), 1500.0)],
            vec![(job(id), 900.0)],
            20_000.0,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].1, 900.0);
    }

    #[test]
    fn merge_unions_distinct_jobs_and_sorts_ascending() {
        let near = Uuid::new_v4();
        let far = Uuid::new_v4();
        let mid = Uuid::new_v4();

        let merged = merge_candidates(
            vec![(job(far), 18_000.0), (job(near), 200.0)],
            vec![(job(mid), 7_000.0)],
            20_000.0,
        );

        let order: Vec<Uuid> = merged.iter().map(|(j, _)| j.id).collect();
        assert_eq!(order, vec![near, mid, far]);
    }

    #[test]
    fn merge_drops_jobs_beyond_max_distance() {
        let inside = Uuid::new_v4();
        let outside = Uuid::new_v4();

        let merged = merge_candidates(
            vec![(job(inside), 19_999.0)],
            vec![(job(outside), 20_001.0)],
            20_000.0,
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].0.id, inside);
    }

    #[test]
    fn merge_of_empty_sets_is_empty() {
        assert!(merge_candidates(Vec::new(), Vec::new(), 20_000.0).is_empty());
    }

    #[test]
    fn distance_km_rounds_to_two_decimals() {
        // mirrors the rounding applied in find_nearby_jobs
        let distance_m = 12_345.6_f64;
        assert_eq!((distance_m / 10.0).round() / 100.0, 12.35);
    }

    #[tokio::test]
    async fn sweep_is_idempotent() {
        let mut stale = job(Uuid::new_v4());
        stale.created_at = Utc::now() - Duration::days(120);
        let mut expired = stale.clone();
        expired.status = JobStatus::Expired;

        // First pass finds and expires the stale job; the second pass
        // matches nothing because Expired rows are excluded.
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![stale]])
            .append_query_results([vec![expired]])
            .append_query_results([Vec::<jobs::Model>::new()])
            .into_connection();

        let first = expire_stale_jobs(&db, DEFAULT_RETENTION_DAYS).await.unwrap();
        assert_eq!(first, 1);

        let second = expire_stale_jobs(&db, DEFAULT_RETENTION_DAYS).await.unwrap();
        assert_eq!(second, 0);
    }
}
