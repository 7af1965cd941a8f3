use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

text_enum! {
    pub enum LeadStatus {
        New => "new",
        Contacted => "contacted",
        Qualified => "qualified",
        Converted => "converted",
        Lost => "lost",
    }
    default = New;
}

impl LeadStatus {
    /// Statuses of leads still being worked.
    pub const OPEN: &'static [LeadStatus] =
        &[LeadStatus::New, LeadStatus::Contacted, LeadStatus::Qualified];
}

/// Prospective customer worked by the telecalling team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: i32,
    pub lead_code: String,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub mobile_no: String,
    pub lead_status: LeadStatus,
    pub estimated_value: f64,
    pub assigned_to: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub lead_code: String,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub mobile_no: String,
    pub lead_status: LeadStatus,
    pub estimated_value: f64,
    pub assigned_to: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct LeadListQuery {
    /// Matches code, company, contact person or mobile number.
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
    pub assigned_to: Option<i32>,
    /// Exclude converted and lost leads.
    pub open_only: bool,
    pub pagination: Option<Pagination>,
}

impl LeadListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn assigned_to(mut self, user_id: i32) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    pub fn open_only(mut self) -> Self {
        self.open_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Counters shown on the telecalling dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct TelecallingSummary {
    pub calls_today: i64,
    pub pending_follow_ups: i64,
    pub open_leads: i64,
}
