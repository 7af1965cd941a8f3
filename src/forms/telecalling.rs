use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::EntityType;
use crate::domain::call_log::{CallDetails, CallOutcome, CallPurpose, CallStatus, CallType};
use crate::domain::follow_up::{FollowUpDetails, FollowUpPriority, FollowUpStatus, FollowUpType};
use crate::domain::lead::{LeadStatus, NewLead};
use crate::forms::{optional_multiline, optional_text, sanitize_inline_text};

#[derive(Debug, Error)]
pub enum TelecallingFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("call duration cannot be negative")]
    NegativeDuration,
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Payload of the create and edit call log endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CallLogForm {
    /// Defaults to now.
    pub call_date: Option<NaiveDateTime>,
    pub entity_type: EntityType,
    pub entity_id: i32,
    #[serde(default)]
    pub call_type: CallType,
    #[serde(default)]
    pub call_purpose: CallPurpose,
    #[serde(default)]
    pub call_status: CallStatus,
    /// Seconds.
    #[serde(default)]
    pub call_duration: i32,
    pub discussion_points: Option<String>,
    pub customer_feedback: Option<String>,
    pub next_action: Option<String>,
    #[serde(default)]
    pub call_outcome: CallOutcome,
}

impl CallLogForm {
    pub fn into_details(self, now: NaiveDateTime) -> Result<CallDetails, TelecallingFormError> {
        if self.call_duration < 0 {
            return Err(TelecallingFormError::NegativeDuration);
        }

        Ok(CallDetails {
            call_date: self.call_date.unwrap_or(now),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            call_type: self.call_type,
            call_purpose: self.call_purpose,
            call_status: self.call_status,
            call_duration: self.call_duration,
            discussion_points: optional_multiline(self.discussion_points.as_deref()),
            customer_feedback: optional_multiline(self.customer_feedback.as_deref()),
            next_action: optional_text(self.next_action.as_deref()),
            call_outcome: self.call_outcome,
        })
    }
}

fn default_follow_up_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default()
}

/// Payload of the create and edit follow-up endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FollowUpForm {
    pub entity_type: EntityType,
    pub entity_id: i32,
    /// Defaults to today.
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default = "default_follow_up_time")]
    pub follow_up_time: NaiveTime,
    #[serde(default)]
    pub priority: FollowUpPriority,
    #[serde(default)]
    pub follow_up_type: FollowUpType,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: FollowUpStatus,
    #[serde(default, deserialize_with = "crate::forms::lenient_id")]
    pub assigned_to: Option<i32>,
}

impl FollowUpForm {
    pub fn into_details(self, today: NaiveDate) -> Result<FollowUpDetails, TelecallingFormError> {
        self.validate()?;

        let subject = sanitize_inline_text(&self.subject);
        if subject.is_empty() {
            return Err(TelecallingFormError::Empty { field: "subject" });
        }

        Ok(FollowUpDetails {
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            follow_up_date: self.follow_up_date.unwrap_or(today),
            follow_up_time: self.follow_up_time,
            priority: self.priority,
            follow_up_type: self.follow_up_type,
            subject,
            notes: optional_multiline(self.notes.as_deref()),
            status: self.status,
            assigned_to: self.assigned_to,
        })
    }
}

/// Payload of the create lead endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LeadForm {
    #[validate(length(min = 1, max = 32))]
    pub lead_code: String,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    pub contact_person: Option<String>,
    #[validate(custom(function = "crate::forms::validate_mobile"))]
    pub mobile_no: String,
    #[serde(default)]
    pub lead_status: LeadStatus,
    #[serde(default, deserialize_with = "crate::forms::lenient_number")]
    pub estimated_value: f64,
    #[serde(default, deserialize_with = "crate::forms::lenient_id")]
    pub assigned_to: Option<i32>,
}

impl LeadForm {
    pub fn into_new_lead(self) -> Result<NewLead, TelecallingFormError> {
        self.validate()?;

        let lead_code = sanitize_inline_text(&self.lead_code);
        let company_name = sanitize_inline_text(&self.company_name);
        if lead_code.is_empty() {
            return Err(TelecallingFormError::Empty { field: "lead_code" });
        }
        if company_name.is_empty() {
            return Err(TelecallingFormError::Empty {
                field: "company_name",
            });
        }

        Ok(NewLead {
            lead_code,
            company_name,
            contact_person: optional_text(self.contact_person.as_deref()),
            mobile_no: self.mobile_no.trim().to_string(),
            lead_status: self.lead_status,
            estimated_value: self.estimated_value,
            assigned_to: self.assigned_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 10)
            .and_then(|date| date.and_hms_opt(11, 30, 0))
            .unwrap_or_default()
    }

    #[test]
    fn call_log_defaults_match_the_dialer() {
        let form: CallLogForm =
            serde_json::from_str(r#"{"entity_type": "lead", "entity_id": 3}"#).expect("parses");

        let details = form.into_details(now()).expect("valid");
        assert_eq!(details.call_date, now());
        assert_eq!(details.call_type, CallType::Outgoing);
        assert_eq!(details.call_status, CallStatus::Completed);
        assert_eq!(details.call_outcome, CallOutcome::Neutral);
    }

    #[test]
    fn negative_duration_is_rejected() {
        let form: CallLogForm = serde_json::from_str(
            r#"{"entity_type": "customer", "entity_id": 3, "call_duration": -5}"#,
        )
        .expect("parses");

        assert!(matches!(
            form.into_details(now()),
            Err(TelecallingFormError::NegativeDuration)
        ));
    }

    #[test]
    fn follow_up_defaults_to_ten_am_today() {
        let form: FollowUpForm = serde_json::from_str(
            r#"{"entity_type": "customer", "entity_id": 1, "subject": "Payment reminder", "assigned_to": ""}"#,
        )
        .expect("parses");

        let details = form.into_details(now().date()).expect("valid");
        assert_eq!(details.follow_up_date, now().date());
        assert_eq!(details.follow_up_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(details.priority, FollowUpPriority::Medium);
        assert_eq!(details.assigned_to, None);
    }

    #[test]
    fn lead_needs_a_valid_mobile() {
        let form: LeadForm = serde_json::from_str(
            r#"{"lead_code": "L1", "company_name": "Acme", "mobile_no": "123"}"#,
        )
        .expect("parses");

        assert!(matches!(
            form.into_new_lead(),
            Err(TelecallingFormError::Validation(_))
        ));
    }
}
