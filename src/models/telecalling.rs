//! Rows behind the telecalling module: call logs, follow-ups and leads.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;

use crate::domain::call_log::{
    CallDetails, CallLog as DomainCallLog, NewCallLog as DomainNewCallLog,
};
use crate::domain::follow_up::{
    FollowUp as DomainFollowUp, FollowUpDetails, NewFollowUp as DomainNewFollowUp,
};
use crate::domain::lead::{Lead as DomainLead, NewLead as DomainNewLead};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::call_logs)]
pub struct CallLog {
    pub id: i32,
    pub call_date: NaiveDateTime,
    pub entity_type: String,
    pub entity_id: i32,
    pub call_type: String,
    pub call_purpose: String,
    pub call_status: String,
    pub call_duration: i32,
    pub discussion_points: Option<String>,
    pub customer_feedback: Option<String>,
    pub next_action: Option<String>,
    pub call_outcome: String,
    pub recorded_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::call_logs)]
pub struct NewCallLog<'a> {
    pub call_date: NaiveDateTime,
    pub entity_type: &'a str,
    pub entity_id: i32,
    pub call_type: &'a str,
    pub call_purpose: &'a str,
    pub call_status: &'a str,
    pub call_duration: i32,
    pub discussion_points: Option<&'a str>,
    pub customer_feedback: Option<&'a str>,
    pub next_action: Option<&'a str>,
    pub call_outcome: &'a str,
    pub recorded_by: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::call_logs)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCallLog<'a> {
    pub call_date: NaiveDateTime,
    pub entity_type: &'a str,
    pub entity_id: i32,
    pub call_type: &'a str,
    pub call_purpose: &'a str,
    pub call_status: &'a str,
    pub call_duration: i32,
    pub discussion_points: Option<&'a str>,
    pub customer_feedback: Option<&'a str>,
    pub next_action: Option<&'a str>,
    pub call_outcome: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<CallLog> for DomainCallLog {
    fn from(value: CallLog) -> Self {
        Self {
            id: value.id,
            call_date: value.call_date,
            entity_type: value.entity_type.as_str().into(),
            entity_id: value.entity_id,
            call_type: value.call_type.as_str().into(),
            call_purpose: value.call_purpose.as_str().into(),
            call_status: value.call_status.as_str().into(),
            call_duration: value.call_duration,
            discussion_points: value.discussion_points,
            customer_feedback: value.customer_feedback,
            next_action: value.next_action,
            call_outcome: value.call_outcome.as_str().into(),
            recorded_by: value.recorded_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCallLog> for NewCallLog<'a> {
    fn from(value: &'a DomainNewCallLog) -> Self {
        let details = &value.details;
        Self {
            call_date: details.call_date,
            entity_type: details.entity_type.into(),
            entity_id: details.entity_id,
            call_type: details.call_type.into(),
            call_purpose: details.call_purpose.into(),
            call_status: details.call_status.into(),
            call_duration: details.call_duration,
            discussion_points: details.discussion_points.as_deref(),
            customer_feedback: details.customer_feedback.as_deref(),
            next_action: details.next_action.as_deref(),
            call_outcome: details.call_outcome.into(),
            recorded_by: value.recorded_by,
        }
    }
}

impl<'a> UpdateCallLog<'a> {
    pub fn from_details(details: &'a CallDetails, updated_at: NaiveDateTime) -> Self {
        Self {
            call_date: details.call_date,
            entity_type: details.entity_type.into(),
            entity_id: details.entity_id,
            call_type: details.call_type.into(),
            call_purpose: details.call_purpose.into(),
            call_status: details.call_status.into(),
            call_duration: details.call_duration,
            discussion_points: details.discussion_points.as_deref(),
            customer_feedback: details.customer_feedback.as_deref(),
            next_action: details.next_action.as_deref(),
            call_outcome: details.call_outcome.into(),
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::follow_ups)]
pub struct FollowUp {
    pub id: i32,
    pub entity_type: String,
    pub entity_id: i32,
    pub follow_up_date: NaiveDate,
    pub follow_up_time: NaiveTime,
    pub priority: String,
    pub follow_up_type: String,
    pub subject: String,
    pub notes: Option<String>,
    pub status: String,
    pub assigned_to: Option<i32>,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::follow_ups)]
pub struct NewFollowUp<'a> {
    pub entity_type: &'a str,
    pub entity_id: i32,
    pub follow_up_date: NaiveDate,
    pub follow_up_time: NaiveTime,
    pub priority: &'a str,
    pub follow_up_type: &'a str,
    pub subject: &'a str,
    pub notes: Option<&'a str>,
    pub status: &'a str,
    pub assigned_to: Option<i32>,
    pub created_by: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::follow_ups)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateFollowUp<'a> {
    pub entity_type: &'a str,
    pub entity_id: i32,
    pub follow_up_date: NaiveDate,
    pub follow_up_time: NaiveTime,
    pub priority: &'a str,
    pub follow_up_type: &'a str,
    pub subject: &'a str,
    pub notes: Option<&'a str>,
    pub status: &'a str,
    pub assigned_to: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl From<FollowUp> for DomainFollowUp {
    fn from(value: FollowUp) -> Self {
        Self {
            id: value.id,
            entity_type: value.entity_type.as_str().into(),
            entity_id: value.entity_id,
            follow_up_date: value.follow_up_date,
            follow_up_time: value.follow_up_time,
            priority: value.priority.as_str().into(),
            follow_up_type: value.follow_up_type.as_str().into(),
            subject: value.subject,
            notes: value.notes,
            status: value.status.as_str().into(),
            assigned_to: value.assigned_to,
            created_by: value.created_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewFollowUp> for NewFollowUp<'a> {
    fn from(value: &'a DomainNewFollowUp) -> Self {
        let details = &value.details;
        Self {
            entity_type: details.entity_type.into(),
            entity_id: details.entity_id,
            follow_up_date: details.follow_up_date,
            follow_up_time: details.follow_up_time,
            priority: details.priority.into(),
            follow_up_type: details.follow_up_type.into(),
            subject: details.subject.as_str(),
            notes: details.notes.as_deref(),
            status: details.status.into(),
            assigned_to: details.assigned_to,
            created_by: value.created_by,
        }
    }
}

impl<'a> UpdateFollowUp<'a> {
    pub fn from_details(details: &'a FollowUpDetails, updated_at: NaiveDateTime) -> Self {
        Self {
            entity_type: details.entity_type.into(),
            entity_id: details.entity_id,
            follow_up_date: details.follow_up_date,
            follow_up_time: details.follow_up_time,
            priority: details.priority.into(),
            follow_up_type: details.follow_up_type.into(),
            subject: details.subject.as_str(),
            notes: details.notes.as_deref(),
            status: details.status.into(),
            assigned_to: details.assigned_to,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::leads)]
pub struct Lead {
    pub id: i32,
    pub lead_code: String,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub mobile_no: String,
    pub lead_status: String,
    pub estimated_value: f64,
    pub assigned_to: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::leads)]
pub struct NewLead<'a> {
    pub lead_code: &'a str,
    pub company_name: &'a str,
    pub contact_person: Option<&'a str>,
    pub mobile_no: &'a str,
    pub lead_status: &'a str,
    pub estimated_value: f64,
    pub assigned_to: Option<i32>,
}

impl From<Lead> for DomainLead {
    fn from(value: Lead) -> Self {
        Self {
            id: value.id,
            lead_code: value.lead_code,
            company_name: value.company_name,
            contact_person: value.contact_person,
            mobile_no: value.mobile_no,
            lead_status: value.lead_status.as_str().into(),
            estimated_value: value.estimated_value,
            assigned_to: value.assigned_to,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewLead> for NewLead<'a> {
    fn from(value: &'a DomainNewLead) -> Self {
        Self {
            lead_code: value.lead_code.as_str(),
            company_name: value.company_name.as_str(),
            contact_person: value.contact_person.as_deref(),
            mobile_no: value.mobile_no.as_str(),
            lead_status: value.lead_status.into(),
            estimated_value: value.estimated_value,
            assigned_to: value.assigned_to,
        }
    }
}
