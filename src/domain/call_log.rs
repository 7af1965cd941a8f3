use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::EntityType;
use crate::pagination::Pagination;

text_enum! {
    pub enum CallType {
        Outgoing => "outgoing",
        Incoming => "incoming",
    }
    default = Outgoing;
}

text_enum! {
    pub enum CallPurpose {
        Enquiry => "enquiry",
        FollowUp => "follow_up",
        CollectionFollowup => "collection_followup",
        Support => "support",
        Complaint => "complaint",
        OrderConfirmation => "order_confirmation",
    }
    default = Enquiry;
}

text_enum! {
    pub enum CallStatus {
        Completed => "completed",
        NoAnswer => "no_answer",
        Busy => "busy",
        Unreachable => "unreachable",
        CallbackRequested => "callback_requested",
    }
    default = Completed;
}

text_enum! {
    pub enum CallOutcome {
        Positive => "positive",
        Neutral => "neutral",
        Negative => "negative",
        Interested => "interested",
        NotInterested => "not_interested",
    }
    default = Neutral;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallLog {
    pub id: i32,
    pub call_date: NaiveDateTime,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub call_type: CallType,
    pub call_purpose: CallPurpose,
    pub call_status: CallStatus,
    /// Seconds.
    pub call_duration: i32,
    pub discussion_points: Option<String>,
    pub customer_feedback: Option<String>,
    pub next_action: Option<String>,
    pub call_outcome: CallOutcome,
    pub recorded_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable content of a call log, shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct CallDetails {
    pub call_date: NaiveDateTime,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub call_type: CallType,
    pub call_purpose: CallPurpose,
    pub call_status: CallStatus,
    pub call_duration: i32,
    pub discussion_points: Option<String>,
    pub customer_feedback: Option<String>,
    pub next_action: Option<String>,
    pub call_outcome: CallOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCallLog {
    pub details: CallDetails,
    pub recorded_by: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct CallLogListQuery {
    pub entity: Option<(EntityType, i32)>,
    pub recorded_by: Option<i32>,
    pub status: Option<CallStatus>,
    /// Only calls placed on this date.
    pub on_date: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl CallLogListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(mut self, entity_type: EntityType, entity_id: i32) -> Self {
        self.entity = Some((entity_type, entity_id));
        self
    }

    pub fn recorded_by(mut self, user_id: i32) -> Self {
        self.recorded_by = Some(user_id);
        self
    }

    pub fn status(mut self, status: CallStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.on_date = Some(date);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
