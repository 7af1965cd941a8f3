use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::EntityType;
use crate::pagination::Pagination;

text_enum! {
    pub enum FollowUpPriority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
    default = Medium;
}

text_enum! {
    pub enum FollowUpType {
        Call => "call",
        Email => "email",
        Visit => "visit",
        Demo => "demo",
    }
    default = Call;
}

text_enum! {
    pub enum FollowUpStatus {
        Pending => "pending",
        Completed => "completed",
        Cancelled => "cancelled",
        Rescheduled => "rescheduled",
    }
    default = Pending;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowUp {
    pub id: i32,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub follow_up_date: NaiveDate,
    pub follow_up_time: NaiveTime,
    pub priority: FollowUpPriority,
    pub follow_up_type: FollowUpType,
    pub subject: String,
    pub notes: Option<String>,
    pub status: FollowUpStatus,
    pub assigned_to: Option<i32>,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable content of a follow-up, shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpDetails {
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub follow_up_date: NaiveDate,
    pub follow_up_time: NaiveTime,
    pub priority: FollowUpPriority,
    pub follow_up_type: FollowUpType,
    pub subject: String,
    pub notes: Option<String>,
    pub status: FollowUpStatus,
    pub assigned_to: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFollowUp {
    pub details: FollowUpDetails,
    pub created_by: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct FollowUpListQuery {
    pub entity: Option<(EntityType, i32)>,
    pub assigned_to: Option<i32>,
    pub status: Option<FollowUpStatus>,
    /// Only follow-ups due on or before this date.
    pub due_by: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl FollowUpListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(mut self, entity_type: EntityType, entity_id: i32) -> Self {
        self.entity = Some((entity_type, entity_id));
        self
    }

    pub fn assigned_to(mut self, user_id: i32) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    pub fn status(mut self, status: FollowUpStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn due_by(mut self, date: NaiveDate) -> Self {
        self.due_by = Some(date);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
