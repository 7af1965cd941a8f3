//! Call logs, follow-ups and leads of the telecalling desk.
//!
//! Managers see every record. Field staff see the calls they recorded, the
//! follow-ups and leads assigned to them.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::EntityType;
use crate::domain::call_log::{CallLog, CallLogListQuery, CallStatus, NewCallLog};
use crate::domain::follow_up::{FollowUp, FollowUpListQuery, FollowUpStatus, NewFollowUp};
use crate::domain::lead::{Lead, LeadListQuery, LeadStatus, TelecallingSummary};
use crate::forms::telecalling::{CallLogForm, FollowUpForm, LeadForm};
use crate::pagination::{Paginated, page_params};
use crate::repository::{
    CallLogReader, CallLogWriter, CustomerReader, FollowUpReader, FollowUpWriter, LeadReader,
    LeadWriter,
};
use crate::services::{ServiceError, ServiceResult, now, page_of, today};

#[derive(Debug, Default, Deserialize)]
pub struct CallLogsQuery {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<i32>,
    pub status: Option<CallStatus>,
    pub date: Option<NaiveDate>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FollowUpsQuery {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<i32>,
    pub status: Option<FollowUpStatus>,
    /// Only follow-ups due on or before this date.
    pub due_by: Option<NaiveDate>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeadsQuery {
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub open_only: bool,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Fail unless the customer or lead a record points to exists.
fn ensure_entity<R>(repo: &R, entity_type: EntityType, entity_id: i32) -> ServiceResult<()>
where
    R: CustomerReader + LeadReader + ?Sized,
{
    let exists = match entity_type {
        EntityType::Customer => repo
            .get_customer_by_id(entity_id)
            .map_err(ServiceError::from)?
            .is_some(),
        EntityType::Lead => repo.get_lead(entity_id).map_err(ServiceError::from)?.is_some(),
    };

    if exists {
        Ok(())
    } else {
        Err(ServiceError::Form(format!(
            "{entity_type} {entity_id} does not exist"
        )))
    }
}

fn owns(user: &AuthenticatedUser, owner: Option<i32>) -> bool {
    user.scope().is_none_or(|user_id| owner == Some(user_id))
}

pub fn log_call<R>(repo: &R, user: &AuthenticatedUser, form: CallLogForm) -> ServiceResult<CallLog>
where
    R: CustomerReader + LeadReader + CallLogWriter + ?Sized,
{
    let details = form
        .into_details(now())
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_entity(repo, details.entity_type, details.entity_id)?;

    let created = repo
        .create_call_log(&NewCallLog {
            details,
            recorded_by: Some(user.id()),
        })
        .map_err(ServiceError::from)?;
    log::info!(
        "Call {} with {} {} logged by {}",
        created.id,
        created.entity_type,
        created.entity_id,
        user.id()
    );
    Ok(created)
}

pub fn get_call_log<R>(repo: &R, user: &AuthenticatedUser, call_id: i32) -> ServiceResult<CallLog>
where
    R: CallLogReader + ?Sized,
{
    match repo.get_call_log(call_id).map_err(ServiceError::from)? {
        Some(call) if owns(user, call.recorded_by) => Ok(call),
        _ => Err(ServiceError::NotFound),
    }
}

pub fn update_call_log<R>(
    repo: &R,
    user: &AuthenticatedUser,
    call_id: i32,
    form: CallLogForm,
) -> ServiceResult<CallLog>
where
    R: CustomerReader + LeadReader + CallLogReader + CallLogWriter + ?Sized,
{
    let current = get_call_log(repo, user, call_id)?;

    let details = form
        .into_details(current.call_date)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_entity(repo, details.entity_type, details.entity_id)?;

    repo.update_call_log(call_id, &details)
        .map_err(ServiceError::from)
}

pub fn list_call_logs<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CallLogsQuery,
) -> ServiceResult<Paginated<CallLog>>
where
    R: CallLogReader + ?Sized,
{
    let (page, per_page) = page_params(query.page, query.per_page);
    let mut list_query = CallLogListQuery::new().paginate(page, per_page);

    if let (Some(entity_type), Some(entity_id)) = (query.entity_type, query.entity_id) {
        list_query = list_query.entity(entity_type, entity_id);
    }
    if let Some(status) = query.status {
        list_query = list_query.status(status);
    }
    if let Some(date) = query.date {
        list_query = list_query.on_date(date);
    }
    if let Some(user_id) = user.scope() {
        list_query = list_query.recorded_by(user_id);
    }

    let (total, calls) = repo.list_call_logs(list_query).map_err(ServiceError::from)?;
    Ok(page_of(calls, total, page, per_page))
}

/// Unassigned follow-ups go to their creator.
pub fn schedule_follow_up<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: FollowUpForm,
) -> ServiceResult<FollowUp>
where
    R: CustomerReader + LeadReader + FollowUpWriter + ?Sized,
{
    let mut details = form
        .into_details(today())
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_entity(repo, details.entity_type, details.entity_id)?;

    if user.scope().is_some() || details.assigned_to.is_none() {
        details.assigned_to = Some(user.id());
    }

    let created = repo
        .create_follow_up(&NewFollowUp {
            details,
            created_by: Some(user.id()),
        })
        .map_err(ServiceError::from)?;
    log::info!(
        "Follow-up {} due {} scheduled by {}",
        created.id,
        created.follow_up_date,
        user.id()
    );
    Ok(created)
}

pub fn get_follow_up<R>(
    repo: &R,
    user: &AuthenticatedUser,
    follow_up_id: i32,
) -> ServiceResult<FollowUp>
where
    R: FollowUpReader + ?Sized,
{
    match repo.get_follow_up(follow_up_id).map_err(ServiceError::from)? {
        Some(follow_up)
            if owns(user, follow_up.assigned_to) || owns(user, follow_up.created_by) =>
        {
            Ok(follow_up)
        }
        _ => Err(ServiceError::NotFound),
    }
}

pub fn update_follow_up<R>(
    repo: &R,
    user: &AuthenticatedUser,
    follow_up_id: i32,
    form: FollowUpForm,
) -> ServiceResult<FollowUp>
where
    R: CustomerReader + LeadReader + FollowUpReader + FollowUpWriter + ?Sized,
{
    let current = get_follow_up(repo, user, follow_up_id)?;

    let mut details = form
        .into_details(current.follow_up_date)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_entity(repo, details.entity_type, details.entity_id)?;

    if user.scope().is_some() {
        details.assigned_to = current.assigned_to;
    }

    repo.update_follow_up(follow_up_id, &details)
        .map_err(ServiceError::from)
}

pub fn list_follow_ups<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: FollowUpsQuery,
) -> ServiceResult<Paginated<FollowUp>>
where
    R: FollowUpReader + ?Sized,
{
    let (page, per_page) = page_params(query.page, query.per_page);
    let mut list_query = FollowUpListQuery::new().paginate(page, per_page);

    if let (Some(entity_type), Some(entity_id)) = (query.entity_type, query.entity_id) {
        list_query = list_query.entity(entity_type, entity_id);
    }
    if let Some(status) = query.status {
        list_query = list_query.status(status);
    }
    if let Some(due_by) = query.due_by {
        list_query = list_query.due_by(due_by);
    }
    if let Some(user_id) = user.scope() {
        list_query = list_query.assigned_to(user_id);
    }

    let (total, follow_ups) = repo
        .list_follow_ups(list_query)
        .map_err(ServiceError::from)?;
    Ok(page_of(follow_ups, total, page, per_page))
}

/// Leads created by field staff are assigned to their creator.
pub fn create_lead<R>(repo: &R, user: &AuthenticatedUser, form: LeadForm) -> ServiceResult<Lead>
where
    R: LeadWriter + ?Sized,
{
    let mut lead = form
        .into_new_lead()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if user.scope().is_some() {
        lead.assigned_to = Some(user.id());
    }

    let created = repo.create_lead(&lead).map_err(ServiceError::from)?;
    log::info!("Lead {} created by {}", created.lead_code, user.id());
    Ok(created)
}

pub fn get_lead<R>(repo: &R, user: &AuthenticatedUser, lead_id: i32) -> ServiceResult<Lead>
where
    R: LeadReader + ?Sized,
{
    match repo.get_lead(lead_id).map_err(ServiceError::from)? {
        Some(lead) if owns(user, lead.assigned_to) => Ok(lead),
        _ => Err(ServiceError::NotFound),
    }
}

pub fn list_leads<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: LeadsQuery,
) -> ServiceResult<Paginated<Lead>>
where
    R: LeadReader + ?Sized,
{
    let (page, per_page) = page_params(query.page, query.per_page);
    let mut list_query = LeadListQuery::new().paginate(page, per_page);

    if let Some(term) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term);
    }
    if let Some(status) = query.status {
        list_query = list_query.status(status);
    }
    if query.open_only {
        list_query = list_query.open_only();
    }
    if let Some(user_id) = user.scope() {
        list_query = list_query.assigned_to(user_id);
    }

    let (total, leads) = repo.list_leads(list_query).map_err(ServiceError::from)?;
    Ok(page_of(leads, total, page, per_page))
}

/// Counters for the telecalling dashboard, scoped like the lists.
pub fn summary<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<TelecallingSummary>
where
    R: CallLogReader + FollowUpReader + LeadReader + ?Sized,
{
    let mut calls = CallLogListQuery::new().on_date(today()).paginate(1, 1);
    let mut follow_ups = FollowUpListQuery::new()
        .status(FollowUpStatus::Pending)
        .paginate(1, 1);
    let mut leads = LeadListQuery::new().open_only().paginate(1, 1);

    if let Some(user_id) = user.scope() {
        calls = calls.recorded_by(user_id);
        follow_ups = follow_ups.assigned_to(user_id);
        leads = leads.assigned_to(user_id);
    }

    let (calls_today, _) = repo.list_call_logs(calls).map_err(ServiceError::from)?;
    let (pending_follow_ups, _) = repo.list_follow_ups(follow_ups).map_err(ServiceError::from)?;
    let (open_leads, _) = repo.list_leads(leads).map_err(ServiceError::from)?;

    Ok(TelecallingSummary {
        calls_today: calls_today as i64,
        pending_follow_ups: pending_follow_ups as i64,
        open_leads: open_leads as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call_log::{CallOutcome, CallPurpose, CallType};
    use crate::domain::customer::CustomerType;
    use crate::domain::follow_up::{FollowUpPriority, FollowUpType};
    use crate::domain::user::Role;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::{self, USER_ID};

    fn call(id: i32, recorded_by: Option<i32>) -> CallLog {
        CallLog {
            id,
            call_date: fixtures::datetime(),
            entity_type: EntityType::Customer,
            entity_id: 5,
            call_type: CallType::Outgoing,
            call_purpose: CallPurpose::Enquiry,
            call_status: CallStatus::Completed,
            call_duration: 60,
            discussion_points: None,
            customer_feedback: None,
            next_action: None,
            call_outcome: CallOutcome::Neutral,
            recorded_by,
            created_at: fixtures::datetime(),
            updated_at: fixtures::datetime(),
        }
    }

    fn follow_up(id: i32, assigned_to: Option<i32>) -> FollowUp {
        FollowUp {
            id,
            entity_type: EntityType::Lead,
            entity_id: 2,
            follow_up_date: fixtures::datetime().date(),
            follow_up_time: fixtures::datetime().time(),
            priority: FollowUpPriority::Medium,
            follow_up_type: FollowUpType::Call,
            subject: "Demo".to_string(),
            notes: None,
            status: FollowUpStatus::Pending,
            assigned_to,
            created_by: assigned_to,
            created_at: fixtures::datetime(),
            updated_at: fixtures::datetime(),
        }
    }

    fn call_form(entity_type: EntityType) -> CallLogForm {
        serde_json::from_value(serde_json::json!({
            "entity_type": entity_type.as_str(),
            "entity_id": 5,
            "call_duration": 90,
        }))
        .expect("form parses")
    }

    #[test]
    fn call_is_recorded_by_the_caller() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(fixtures::customer(id, CustomerType::Retail, vec![]))));
        repo.expect_create_call_log()
            .times(1)
            .withf(|new| new.recorded_by == Some(USER_ID) && new.details.call_duration == 90)
            .returning(|_| Ok(call(1, Some(USER_ID))));

        log_call(&repo, &fixtures::user(Role::FieldStaff), call_form(EntityType::Customer))
            .expect("logged");
    }

    #[test]
    fn call_against_missing_lead_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_lead().returning(|_| Ok(None));
        repo.expect_create_call_log().never();

        assert!(matches!(
            log_call(&repo, &fixtures::user(Role::Admin), call_form(EntityType::Lead)),
            Err(ServiceError::Form(message)) if message == "lead 5 does not exist"
        ));
    }

    #[test]
    fn field_staff_cannot_edit_someone_elses_call() {
        let mut repo = MockRepository::new();
        repo.expect_get_call_log()
            .returning(|id| Ok(Some(call(id, Some(42)))));
        repo.expect_update_call_log().never();

        assert!(matches!(
            update_call_log(
                &repo,
                &fixtures::user(Role::FieldStaff),
                1,
                call_form(EntityType::Customer),
            ),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn field_staff_follow_ups_are_assigned_to_themselves() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(fixtures::customer(id, CustomerType::Retail, vec![]))));
        repo.expect_create_follow_up()
            .times(1)
            .withf(|new| {
                new.details.assigned_to == Some(USER_ID) && new.created_by == Some(USER_ID)
            })
            .returning(|_| Ok(follow_up(1, Some(USER_ID))));

        let form: FollowUpForm = serde_json::from_value(serde_json::json!({
            "entity_type": "customer",
            "entity_id": 5,
            "subject": "Collect cheque",
            "assigned_to": 99,
        }))
        .expect("form parses");

        schedule_follow_up(&repo, &fixtures::user(Role::FieldStaff), form).expect("scheduled");
    }

    #[test]
    fn follow_up_list_is_scoped_to_assignee() {
        let mut repo = MockRepository::new();
        repo.expect_list_follow_ups()
            .times(1)
            .withf(|query| query.assigned_to == Some(USER_ID))
            .returning(|_| Ok((1, vec![follow_up(1, Some(USER_ID))])));

        let page = list_follow_ups(
            &repo,
            &fixtures::user(Role::FieldStaff),
            FollowUpsQuery::default(),
        )
        .expect("listed");
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn summary_counts_are_scoped() {
        let mut repo = MockRepository::new();
        repo.expect_list_call_logs()
            .times(1)
            .withf(|query| query.recorded_by == Some(USER_ID) && query.on_date.is_some())
            .returning(|_| Ok((4, Vec::new())));
        repo.expect_list_follow_ups()
            .times(1)
            .withf(|query| {
                query.assigned_to == Some(USER_ID) && query.status == Some(FollowUpStatus::Pending)
            })
            .returning(|_| Ok((2, Vec::new())));
        repo.expect_list_leads()
            .times(1)
            .withf(|query| query.assigned_to == Some(USER_ID) && query.open_only)
            .returning(|_| Ok((7, Vec::new())));

        let counts = summary(&repo, &fixtures::user(Role::FieldStaff)).expect("summary");
        assert_eq!(
            counts,
            TelecallingSummary {
                calls_today: 4,
                pending_follow_ups: 2,
                open_leads: 7,
            }
        );
    }

    #[test]
    fn managers_assign_leads_freely() {
        let mut repo = MockRepository::new();
        repo.expect_create_lead()
            .times(1)
            .withf(|lead| lead.assigned_to == Some(3))
            .returning(|lead| {
                Ok(Lead {
                    id: 1,
                    lead_code: lead.lead_code.clone(),
                    company_name: lead.company_name.clone(),
                    contact_person: None,
                    mobile_no: lead.mobile_no.clone(),
                    lead_status: lead.lead_status,
                    estimated_value: lead.estimated_value,
                    assigned_to: lead.assigned_to,
                    created_at: fixtures::datetime(),
                    updated_at: fixtures::datetime(),
                })
            });

        let form: LeadForm = serde_json::from_value(serde_json::json!({
            "lead_code": "L-1",
            "company_name": "Acme",
            "mobile_no": "9876543210",
            "assigned_to": 3,
        }))
        .expect("form parses");

        create_lead(&repo, &fixtures::user(Role::SalesManager), form).expect("created");
    }
}
