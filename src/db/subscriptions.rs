use chrono::{Months, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::db::services as service_db;
use crate::errors::AppError;
use crate::models::services::ServiceSelector;
use crate::models::subscriptions::{
    self, ServiceEntry, ServiceEntryList, SubscriptionStatus,
};
use crate::models::vendors;
use crate::proration;

/// Subscription state as reported to the vendor.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StatusView {
    pub is_active: bool,
    pub status: Option<SubscriptionStatus>,
    pub plan_price: Option<i64>,
    pub start_date: Option<chrono::DateTime<Utc>>,
    pub end_date: Option<chrono::DateTime<Utc>>,
    pub remaining_days: i64,
    pub services: Vec<ServiceEntry>,
}

/// The vendor's current active subscription row, if any.
pub async fn find_active(
    db: &DatabaseConnection,
    vendor_id: Uuid,
) -> Result<Option<subscriptions::Model>, DbErr> {
    subscriptions::Entity::find()
        .filter(subscriptions::Column::VendorId.eq(vendor_id))
        .filter(subscriptions::Column::IsActive.eq(true))
        .order_by_desc(subscriptions::Column::CreatedAt)
        .one(db)
        .await
}

/// Activate a one-year subscription covering the vendor's listed services
/// at full price. The payment signature must already be verified.
///
/// Any prior subscription rows still flagged active are expired in the
/// same transaction that inserts the new one, so an early renewal simply
/// supersedes the running period rather than being refused.
pub async fn activate(
    db: &DatabaseConnection,
    vendor: &vendors::Model,
) -> Result<subscriptions::Model, AppError> {
    let now = Utc::now();

    let services = service_db::get_active_by_ids(db, &vendor.services.0).await?;
    if services.is_empty() {
        return Err(AppError::InvalidInput(
            "No active services on this vendor profile to subscribe".to_string(),
        ));
    }

    let plan_price: i64 = services.iter().map(|s| s.price).sum();
    let end_date = now
        .checked_add_months(Months::new(12))
        .ok_or_else(|| AppError::InvalidInput("Subscription end date overflow".to_string()))?;

    let entries: Vec<ServiceEntry> = services
        .into_iter()
        .map(|s| ServiceEntry {
            service_id: s.id,
            name: s.name,
            added_on: now,
            prorated_price: s.price,
        })
        .collect();

    let txn = db.begin().await?;

    // Retire any previous rows still flagged active.
    let stale = subscriptions::Entity::find()
        .filter(subscriptions::Column::VendorId.eq(vendor.id))
        .filter(subscriptions::Column::IsActive.eq(true))
        .all(&txn)
        .await?;
    for row in stale {
        let mut active: subscriptions::ActiveModel = row.into();
        active.is_active = Set(false);
        active.status = Set(SubscriptionStatus::Expired);
        active.update(&txn).await?;
    }

    let new_subscription = subscriptions::ActiveModel {
        id: Set(Uuid::new_v4()),
        vendor_id: Set(vendor.id),
        plan_price: Set(plan_price),
        start_date: Set(now),
        end_date: Set(end_date),
        status: Set(SubscriptionStatus::Active),
        is_active: Set(true),
        services: Set(ServiceEntryList(entries)),
        created_at: Set(now),
    };
    let created = new_subscription.insert(&txn).await?;

    txn.commit().await?;
    Ok(created)
}

/// Add services to a running subscription at a price prorated over the
/// days left in the current period. The payment signature must already
/// be verified.
pub async fn add_services(
    db: &DatabaseConnection,
    vendor: &vendors::Model,
    selectors: &[ServiceSelector],
) -> Result<subscriptions::Model, AppError> {
    let subscription = find_active(db, vendor.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active subscription".to_string()))?;

    let now = Utc::now();
    let remaining = proration::remaining_days(subscription.end_date, now);
    if remaining <= 0 {
        return Err(AppError::Conflict(
            "Subscription period has ended; renew instead of adding services".to_string(),
        ));
    }

    let resolved = service_db::resolve_selectors(db, selectors).await?;

    // Skip anything the vendor already owns, whether or not the current
    // plan lists it (a service inactive at activation never became an
    // entry, but the vendor still holds it).
    let additions: Vec<_> = resolved
        .into_iter()
        .filter(|s| {
            !vendor.services.0.contains(&s.id)
                && !subscription.services.0.iter().any(|e| e.service_id == s.id)
        })
        .collect();
    if additions.is_empty() {
        return Err(AppError::Conflict(
            "All requested services are already active for this vendor".to_string(),
        ));
    }

    let mut entries = subscription.services.0.clone();
    let mut plan_price = subscription.plan_price;
    let mut vendor_services = vendor.services.clone();
    for service in &additions {
        let prorated = proration::prorated_price(service.price, remaining);
        entries.push(ServiceEntry {
            service_id: service.id,
            name: service.name.clone(),
            added_on: now,
            prorated_price: prorated,
        });
        plan_price += prorated;
        vendor_services.push_unique(service.id);
    }

    let txn = db.begin().await?;

    let mut sub_active: subscriptions::ActiveModel = subscription.into();
    sub_active.services = Set(ServiceEntryList(entries));
    sub_active.plan_price = Set(plan_price);
    let updated = sub_active.update(&txn).await?;

    let mut vendor_active: vendors::ActiveModel = vendor.clone().into();
    vendor_active.services = Set(vendor_services);
    vendor_active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Report the vendor's subscription state. A row found to be past its
/// end date is marked expired on the way out.
pub async fn status(db: &DatabaseConnection, vendor_id: Uuid) -> Result<StatusView, AppError> {
    let Some(subscription) = find_active(db, vendor_id).await? else {
        return Ok(StatusView {
            is_active: false,
            status: None,
            plan_price: None,
            start_date: None,
            end_date: None,
            remaining_days: 0,
            services: Vec::new(),
        });
    };

    let now = Utc::now();
    if now > subscription.end_date {
        let end_date = subscription.end_date;
        let start_date = subscription.start_date;
        let plan_price = subscription.plan_price;
        let services = subscription.services.0.clone();

        let mut active: subscriptions::ActiveModel = subscription.into();
        active.is_active = Set(false);
        active.status = Set(SubscriptionStatus::Expired);
        active.update(db).await?;

        return Ok(StatusView {
            is_active: false,
            status: Some(SubscriptionStatus::Expired),
            plan_price: Some(plan_price),
            start_date: Some(start_date),
            end_date: Some(end_date),
            remaining_days: 0,
            services,
        });
    }

    Ok(StatusView {
        is_active: true,
        status: Some(subscription.status),
        plan_price: Some(subscription.plan_price),
        start_date: Some(subscription.start_date),
        end_date: Some(subscription.end_date),
        remaining_days: proration::remaining_days(subscription.end_date, now),
        services: subscription.services.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::services;
    use crate::models::vendors::{JobIdList, ServiceIdList};
    use chrono::Duration;

    fn vendor_with_services(ids: Vec<Uuid>) -> vendors::Model {
        vendors::Model {
            id: Uuid::new_v4(),
            name: "Sharma Plumbing".to_string(),
            email: "sharma@example.com".to_string(),
            contact_number: "9876543210".to_string(),
            latitude: 19.076,
            longitude: 72.8777,
            services: ServiceIdList(ids),
            job_history: JobIdList::default(),
            average_rating: 4.5,
            total_ratings: 12,
            is_approved: true,
            is_blacklisted: false,
            created_at: Utc::now(),
        }
    }

    fn service(id: Uuid, name: &str, price: i64) -> services::Model {
        services::Model {
            id,
            name: name.to_string(),
            description: None,
            price,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn subscription_row(
        vendor_id: Uuid,
        entries: Vec<ServiceEntry>,
        days_left: i64,
    ) -> subscriptions::Model {
        let now = Utc::now();
        subscriptions::Model {
            id: Uuid::new_v4(),
            vendor_id,
            plan_price: entries.iter().map(|e| e.prorated_price).sum(),
            start_date: now - Duration::days(30),
            end_date: now + Duration::days(days_left),
            status: SubscriptionStatus::Active,
            is_active: true,
            services: ServiceEntryList(entries),
            created_at: now - Duration::days(30),
        }
    }

    #[tokio::test]
    async fn renewal_supersedes_a_running_subscription() {
        let service_id = Uuid::new_v4();
        let vendor = vendor_with_services(vec![service_id]);

        // An earlier subscription with most of its year still to run.
        let old = subscription_row(vendor.id, Vec::new(), 200);
        let mut retired = old.clone();
        retired.is_active = false;
        retired.status = SubscriptionStatus::Expired;

        let now = Utc::now();
        let fresh = subscriptions::Model {
            id: Uuid::new_v4(),
            vendor_id: vendor.id,
            plan_price: 1200,
            start_date: now,
            end_date: now + Duration::days(365),
            status: SubscriptionStatus::Active,
            is_active: true,
            services: ServiceEntryList(vec![ServiceEntry {
                service_id,
                name: "Plumbing".to_string(),
                added_on: now,
                prorated_price: 1200,
            }]),
            created_at: now,
        };

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![service(service_id, "Plumbing", 1200)]])
            .append_query_results([vec![old]])
            .append_query_results([vec![retired]])
            .append_query_results([vec![fresh]])
            .into_connection();

        let created = activate(&db, &vendor)
            .await
            .expect("an early renewal supersedes the running subscription");
        assert!(created.is_active);
        assert_eq!(created.status, SubscriptionStatus::Active);
        assert_eq!(created.plan_price, 1200);
    }

    #[tokio::test]
    async fn add_services_rejects_a_service_the_vendor_already_owns() {
        let owned = Uuid::new_v4();
        let vendor = vendor_with_services(vec![owned]);

        // The service was inactive at activation, so the subscription has
        // no entry for it; only the vendor's own list knows about it.
        let subscription = subscription_row(vendor.id, Vec::new(), 100);

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![subscription]])
            .append_query_results([vec![service(owned, "Plumbing", 1200)]])
            .into_connection();

        let err = add_services(&db, &vendor, &[ServiceSelector::ById(owned)])
            .await
            .expect_err("an owned service must not be billed a second time");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn add_services_refuses_a_lapsed_window() {
        let vendor = vendor_with_services(vec![Uuid::new_v4()]);
        let lapsed = subscription_row(vendor.id, Vec::new(), -3);

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![lapsed]])
            .into_connection();

        let wanted = Uuid::new_v4();
        let err = add_services(&db, &vendor, &[ServiceSelector::ById(wanted)])
            .await
            .expect_err("no add-ons after the period ends");
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
