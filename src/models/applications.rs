use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "approval_pending")]
    ApprovalPending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

impl Status {
    /// Whether the state machine permits moving from `self` to `next`.
    ///
    /// ApprovalPending fans out to all three outcomes. The only transition
    /// out of a terminal state is Approved → Withdrawn: the vendor backing
    /// out of an assignment, which re-opens the job.
    pub fn can_become(self, next: Status) -> bool {
        match (self, next) {
            (Status::ApprovalPending, Status::Approved)
            | (Status::ApprovalPending, Status::Rejected)
            | (Status::ApprovalPending, Status::Withdrawn)
            | (Status::Approved, Status::Withdrawn) => true,
            _ => false,
        }
    }
}

/// How the vendor engaged with the job: a one-click interest or a priced
/// quotation with an attached document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ApplicationType {
    #[sea_orm(string_value = "interest")]
    Interest,
    #[sea_orm(string_value = "quotation")]
    Quotation,
}

/// SeaORM entity for the `applications` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub vendor_id: Uuid,
    /// Denormalized from the job so society-facing queries skip a join.
    pub society_id: Uuid,
    pub application_type: ApplicationType,
    pub message: Option<String>,
    pub quoted_pdf: Option<String>,
    pub status: Status,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jobs::Entity",
        from = "Column::JobId",
        to = "super::jobs::Column::Id"
    )]
    Job,
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id"
    )]
    Vendor,
    #[sea_orm(
        belongs_to = "super::societies::Entity",
        from = "Column::SocietyId",
        to = "super::societies::Column::Id"
    )]
    Society,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::societies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Society.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body for `POST /api/applications/job/{job_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyRequest {
    pub application_type: ApplicationType,
    pub message: Option<String>,
    /// Reference URL of an uploaded quotation document. Required for
    /// `Quotation`, ignored for `Interest`.
    pub quoted_pdf: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_reach_every_outcome() {
        assert!(Status::ApprovalPending.can_become(Status::Approved));
        assert!(Status::ApprovalPending.can_become(Status::Rejected));
        assert!(Status::ApprovalPending.can_become(Status::Withdrawn));
    }

    #[test]
    fn approved_can_only_be_withdrawn() {
        assert!(Status::Approved.can_become(Status::Withdrawn));
        assert!(!Status::Approved.can_become(Status::Rejected));
        assert!(!Status::Approved.can_become(Status::ApprovalPending));
    }

    #[test]
    fn rejected_and_withdrawn_are_frozen() {
        for terminal in [Status::Rejected, Status::Withdrawn] {
            for next in [
                Status::ApprovalPending,
                Status::Approved,
                Status::Rejected,
                Status::Withdrawn,
            ] {
                assert!(!terminal.can_become(next));
            }
        }
    }
}
