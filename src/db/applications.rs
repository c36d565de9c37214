use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::applications::{self, ApplicationType, ApplyRequest, Status};
use crate::models::jobs::{self, JobStatus};
use crate::models::vendors;

/// What a job becomes when one of its applications is approved.
/// Configured once at startup from `APPROVAL_POLICY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPolicy {
    /// Approval closes the job immediately.
    Complete,
    /// Approval moves the job to in-progress; completion is a later step.
    InProgress,
}

impl ApprovalPolicy {
    pub fn from_env() -> Self {
        match std::env::var("APPROVAL_POLICY").as_deref() {
            Ok("in_progress") => ApprovalPolicy::InProgress,
            _ => ApprovalPolicy::Complete,
        }
    }

    pub fn job_status(self) -> JobStatus {
        match self {
            ApprovalPolicy::Complete => JobStatus::Completed,
            ApprovalPolicy::InProgress => JobStatus::InProgress,
        }
    }
}

/// A job applicant as shown to the posting society.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApplicantSummary {
    pub application_id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub contact_number: String,
    pub average_rating: f64,
    pub total_ratings: i32,
    pub status: Status,
    pub application_type: ApplicationType,
    pub message: Option<String>,
    pub quoted_pdf: Option<String>,
    pub applied_at: chrono::DateTime<Utc>,
}

/// Application counts for a job, split by type.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApplicantCount {
    pub total: u64,
    pub quotation: u64,
    pub interest: u64,
}

/// File a vendor's application on a job.
///
/// Completed jobs take no further applications. One application per
/// vendor per job; the unique index backstops the pre-check under
/// concurrent submits. A quotation must carry its PDF reference, an
/// interest application never does.
pub async fn apply(
    db: &DatabaseConnection,
    vendor: &vendors::Model,
    job_id: Uuid,
    input: ApplyRequest,
) -> Result<applications::Model, AppError> {
    let job = jobs::Entity::find_by_id(job_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    if job.status == JobStatus::Completed {
        return Err(AppError::Conflict(
            "This job is already completed".to_string(),
        ));
    }

    let existing = applications::Entity::find()
        .filter(applications::Column::JobId.eq(job.id))
        .filter(applications::Column::VendorId.eq(vendor.id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "You have already applied to this job".to_string(),
        ));
    }

    let quoted_pdf = match input.application_type {
        ApplicationType::Quotation => {
            let pdf = input
                .quoted_pdf
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| {
                    AppError::InvalidInput(
                        "A quotation application requires a quoted_pdf".to_string(),
                    )
                })?;
            Some(pdf)
        }
        ApplicationType::Interest => None,
    };

    let new_application = applications::ActiveModel {
        id: Set(Uuid::new_v4()),
        job_id: Set(job.id),
        vendor_id: Set(vendor.id),
        society_id: Set(job.society_id),
        application_type: Set(input.application_type),
        message: Set(input.message),
        quoted_pdf: Set(quoted_pdf),
        status: Set(Status::ApprovalPending),
        created_at: Set(Utc::now()),
    };

    new_application.insert(db).await.map_err(AppError::from)
}

/// Approve an application on behalf of the posting society.
///
/// In one transaction: the winner goes Approved, every sibling still
/// awaiting a decision goes Rejected, the job takes the policy status
/// and records the selected vendor, and the job lands in the vendor's
/// history.
pub async fn approve(
    db: &DatabaseConnection,
    society_id: Uuid,
    application_id: Uuid,
    policy: ApprovalPolicy,
) -> Result<applications::Model, AppError> {
    let txn = db.begin().await?;

    let application = applications::Entity::find_by_id(application_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    if application.society_id != society_id {
        return Err(AppError::Unauthorized(
            "This application does not belong to one of your jobs".to_string(),
        ));
    }

    if !application.status.can_become(Status::Approved) {
        return Err(AppError::Conflict(format!(
            "Cannot approve an application in state {:?}",
            application.status
        )));
    }

    let job = jobs::Entity::find_by_id(application.job_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    if job.status == JobStatus::Completed || job.status == JobStatus::Expired {
        return Err(AppError::Conflict(
            "This job is no longer open for approval".to_string(),
        ));
    }

    // Losing siblings: only those still pending. Withdrawn and already
    // rejected ones keep their state.
    let siblings = applications::Entity::find()
        .filter(applications::Column::JobId.eq(job.id))
        .filter(applications::Column::Id.ne(application.id))
        .filter(applications::Column::Status.eq(Status::ApprovalPending))
        .all(&txn)
        .await?;
    for sibling in siblings {
        let mut active: applications::ActiveModel = sibling.into();
        active.status = Set(Status::Rejected);
        active.update(&txn).await?;
    }

    let vendor_id = application.vendor_id;
    let job_id = job.id;

    let mut winner: applications::ActiveModel = application.into();
    winner.status = Set(Status::Approved);
    let winner = winner.update(&txn).await?;

    let new_status = policy.job_status();
    let mut job_active: jobs::ActiveModel = job.into();
    job_active.status = Set(new_status);
    job_active.selected_vendor_id = Set(Some(vendor_id));
    if new_status == JobStatus::Completed {
        job_active.completed_at = Set(Some(Utc::now()));
    }
    job_active.update(&txn).await?;

    let vendor = vendors::Entity::find_by_id(vendor_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor not found".to_string()))?;
    let mut history = vendor.job_history.clone();
    history.push_unique(job_id);
    let mut vendor_active: vendors::ActiveModel = vendor.into();
    vendor_active.job_history = Set(history);
    vendor_active.update(&txn).await?;

    txn.commit().await?;
    Ok(winner)
}

/// Reject a single pending application. Only valid while the job is
/// still open; rejecting after a winner was picked is a conflict.
pub async fn reject(
    db: &DatabaseConnection,
    society_id: Uuid,
    application_id: Uuid,
) -> Result<applications::Model, AppError> {
    let application = applications::Entity::find_by_id(application_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    if application.society_id != society_id {
        return Err(AppError::Unauthorized(
            "This application does not belong to one of your jobs".to_string(),
        ));
    }

    let job = jobs::Entity::find_by_id(application.job_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    if job.status != JobStatus::New {
        return Err(AppError::Conflict(
            "This job is no longer accepting decisions".to_string(),
        ));
    }

    if !application.status.can_become(Status::Rejected) {
        return Err(AppError::Conflict(format!(
            "Cannot reject an application in state {:?}",
            application.status
        )));
    }

    let mut active: applications::ActiveModel = application.into();
    active.status = Set(Status::Rejected);
    active.update(db).await.map_err(AppError::from)
}

/// Withdraw the vendor's own application.
///
/// Withdrawing a pending application just marks it Withdrawn.
/// Withdrawing an approved one additionally unwinds the approval in one
/// transaction: the job reopens, applications rejected by that approval
/// return to pending, and the job leaves the vendor's history. An
/// approval on an expired job cannot be unwound.
pub async fn withdraw(
    db: &DatabaseConnection,
    vendor: &vendors::Model,
    application_id: Uuid,
) -> Result<applications::Model, AppError> {
    let txn = db.begin().await?;

    let application = applications::Entity::find_by_id(application_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    if application.vendor_id != vendor.id {
        return Err(AppError::Unauthorized(
            "This application is not yours".to_string(),
        ));
    }

    if !application.status.can_become(Status::Withdrawn) {
        return Err(AppError::Conflict(format!(
            "Cannot withdraw an application in state {:?}",
            application.status
        )));
    }

    if application.status == Status::Approved {
        let job = jobs::Entity::find_by_id(application.job_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

        if job.status == JobStatus::Expired {
            return Err(AppError::Conflict(
                "Cannot withdraw from a job that has expired".to_string(),
            ));
        }

        // Reopen the job and put the losing applicants back in the pool.
        let rejected = applications::Entity::find()
            .filter(applications::Column::JobId.eq(job.id))
            .filter(applications::Column::Id.ne(application.id))
            .filter(applications::Column::Status.eq(Status::Rejected))
            .all(&txn)
            .await?;
        for sibling in rejected {
            let mut active: applications::ActiveModel = sibling.into();
            active.status = Set(Status::ApprovalPending);
            active.update(&txn).await?;
        }

        let job_id = job.id;
        let mut job_active: jobs::ActiveModel = job.into();
        job_active.status = Set(JobStatus::New);
        job_active.selected_vendor_id = Set(None);
        job_active.completed_at = Set(None);
        job_active.update(&txn).await?;

        let fresh = vendors::Entity::find_by_id(vendor.id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Vendor not found".to_string()))?;
        let mut history = fresh.job_history.clone();
        history.remove(job_id);
        let mut vendor_active: vendors::ActiveModel = fresh.into();
        vendor_active.job_history = Set(history);
        vendor_active.update(&txn).await?;
    }

    let mut active: applications::ActiveModel = application.into();
    active.status = Set(Status::Withdrawn);
    let withdrawn = active.update(&txn).await?;

    txn.commit().await?;
    Ok(withdrawn)
}

/// List all applicants for a job the society owns, with vendor details.
pub async fn get_applicants_for_job(
    db: &DatabaseConnection,
    society_id: Uuid,
    job_id: Uuid,
) -> Result<Vec<ApplicantSummary>, AppError> {
    let job = jobs::Entity::find_by_id(job_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    if job.society_id != society_id {
        return Err(AppError::Unauthorized(
            "This job does not belong to you".to_string(),
        ));
    }

    let rows = applications::Entity::find()
        .filter(applications::Column::JobId.eq(job_id))
        .find_also_related(vendors::Entity)
        .order_by_asc(applications::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(application, vendor)| {
            vendor.map(|v| ApplicantSummary {
                application_id: application.id,
                vendor_id: v.id,
                vendor_name: v.name,
                contact_number: v.contact_number,
                average_rating: v.average_rating,
                total_ratings: v.total_ratings,
                status: application.status,
                application_type: application.application_type,
                message: application.message,
                quoted_pdf: application.quoted_pdf,
                applied_at: application.created_at,
            })
        })
        .collect())
}

/// Count applications on a job, split into quotations and interests.
pub async fn applicant_count(
    db: &DatabaseConnection,
    job_id: Uuid,
) -> Result<ApplicantCount, AppError> {
    let total = applications::Entity::find()
        .filter(applications::Column::JobId.eq(job_id))
        .count(db)
        .await?;
    let quotation = applications::Entity::find()
        .filter(applications::Column::JobId.eq(job_id))
        .filter(applications::Column::ApplicationType.eq(ApplicationType::Quotation))
        .count(db)
        .await?;

    Ok(ApplicantCount {
        total,
        quotation,
        interest: total - quotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vendors::{JobIdList, ServiceIdList};

    fn job_row(society_id: Uuid, status: JobStatus) -> jobs::Model {
        jobs::Model {
            id: Uuid::new_v4(),
            society_id,
            title: "Water tank cleaning".to_string(),
            job_type: "cleaning".to_string(),
            required_experience: ">2 years".to_string(),
            details: "Annual overhead tank service".to_string(),
            contact_number: "9876543210".to_string(),
            latitude: 19.076,
            longitude: 72.8777,
            geo_lat: Some(19.076),
            geo_lon: Some(72.8777),
            offered_price: 2500,
            scheduled_for: Utc::now(),
            quotation_required: false,
            is_active: true,
            status,
            selected_vendor_id: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    fn application_row(job: &jobs::Model, vendor_id: Uuid, status: Status) -> applications::Model {
        applications::Model {
            id: Uuid::new_v4(),
            job_id: job.id,
            vendor_id,
            society_id: job.society_id,
            application_type: ApplicationType::Interest,
            message: None,
            quoted_pdf: None,
            status,
            created_at: Utc::now(),
        }
    }

    fn vendor_row(history: Vec<Uuid>) -> vendors::Model {
        vendors::Model {
            id: Uuid::new_v4(),
            name: "Verma Services".to_string(),
            email: "verma@example.com".to_string(),
            contact_number: "9123456780".to_string(),
            latitude: 19.076,
            longitude: 72.8777,
            services: ServiceIdList::default(),
            job_history: JobIdList(history),
            average_rating: 4.2,
            total_ratings: 8,
            is_approved: true,
            is_blacklisted: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn approve_rejects_pending_siblings_and_completes_the_job() {
        let society = Uuid::new_v4();
        let job = job_row(society, JobStatus::New);
        let vendor = vendor_row(Vec::new());
        let winner = application_row(&job, vendor.id, Status::ApprovalPending);
        let sibling = application_row(&job, Uuid::new_v4(), Status::ApprovalPending);

        let mut sibling_rejected = sibling.clone();
        sibling_rejected.status = Status::Rejected;
        let mut winner_approved = winner.clone();
        winner_approved.status = Status::Approved;
        let mut job_closed = job.clone();
        job_closed.status = JobStatus::Completed;
        job_closed.selected_vendor_id = Some(vendor.id);
        job_closed.completed_at = Some(Utc::now());
        let mut vendor_after = vendor.clone();
        vendor_after.job_history.push_unique(job.id);

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![winner.clone()]])
            .append_query_results([vec![job]])
            .append_query_results([vec![sibling]])
            .append_query_results([vec![sibling_rejected]])
            .append_query_results([vec![winner_approved]])
            .append_query_results([vec![job_closed]])
            .append_query_results([vec![vendor]])
            .append_query_results([vec![vendor_after]])
            .into_connection();

        let approved = approve(&db, society, winner.id, ApprovalPolicy::Complete)
            .await
            .unwrap();
        assert_eq!(approved.status, Status::Approved);
    }

    #[tokio::test]
    async fn approve_refuses_another_societys_application() {
        let job = job_row(Uuid::new_v4(), JobStatus::New);
        let application = application_row(&job, Uuid::new_v4(), Status::ApprovalPending);

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![application.clone()]])
            .into_connection();

        let err = approve(&db, Uuid::new_v4(), application.id, ApprovalPolicy::Complete)
            .await
            .expect_err("only the posting society may approve");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn approve_refuses_a_withdrawn_application() {
        let society = Uuid::new_v4();
        let job = job_row(society, JobStatus::New);
        let application = application_row(&job, Uuid::new_v4(), Status::Withdrawn);

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![application.clone()]])
            .into_connection();

        let err = approve(&db, society, application.id, ApprovalPolicy::Complete)
            .await
            .expect_err("a withdrawn application cannot win");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn withdraw_after_approval_reopens_the_job_and_restores_siblings() {
        let society = Uuid::new_v4();
        let vendor = vendor_row(Vec::new());

        let mut job = job_row(society, JobStatus::Completed);
        job.selected_vendor_id = Some(vendor.id);
        job.completed_at = Some(Utc::now());

        let approved = application_row(&job, vendor.id, Status::Approved);
        let loser = application_row(&job, Uuid::new_v4(), Status::Rejected);

        let mut loser_restored = loser.clone();
        loser_restored.status = Status::ApprovalPending;
        let mut job_reopened = job.clone();
        job_reopened.status = JobStatus::New;
        job_reopened.selected_vendor_id = None;
        job_reopened.completed_at = None;
        let mut vendor_with_history = vendor.clone();
        vendor_with_history.job_history.push_unique(job.id);
        let vendor_cleared = vendor.clone();
        let mut withdrawn = approved.clone();
        withdrawn.status = Status::Withdrawn;

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![approved.clone()]])
            .append_query_results([vec![job]])
            .append_query_results([vec![loser]])
            .append_query_results([vec![loser_restored]])
            .append_query_results([vec![job_reopened]])
            .append_query_results([vec![vendor_with_history]])
            .append_query_results([vec![vendor_cleared]])
            .append_query_results([vec![withdrawn]])
            .into_connection();

        let result = withdraw(&db, &vendor, approved.id).await.unwrap();
        assert_eq!(result.status, Status::Withdrawn);
    }

    #[tokio::test]
    async fn withdraw_of_an_approval_on_an_expired_job_is_refused() {
        let vendor = vendor_row(Vec::new());
        let mut job = job_row(Uuid::new_v4(), JobStatus::Expired);
        job.selected_vendor_id = Some(vendor.id);
        let approved = application_row(&job, vendor.id, Status::Approved);

        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![approved.clone()]])
            .append_query_results([vec![job]])
            .into_connection();

        let err = withdraw(&db, &vendor, approved.id)
            .await
            .expect_err("an expired job cannot be reopened");
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
