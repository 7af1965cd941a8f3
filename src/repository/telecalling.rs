use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        call_log::{
            CallDetails, CallLog as DomainCallLog, CallLogListQuery, NewCallLog as DomainNewCallLog,
        },
        follow_up::{
            FollowUp as DomainFollowUp, FollowUpDetails, FollowUpListQuery,
            NewFollowUp as DomainNewFollowUp,
        },
        lead::{Lead as DomainLead, LeadListQuery, LeadStatus, NewLead as DomainNewLead},
    },
    models::telecalling::{
        CallLog as DbCallLog, FollowUp as DbFollowUp, Lead as DbLead, NewCallLog as DbNewCallLog,
        NewFollowUp as DbNewFollowUp, NewLead as DbNewLead, UpdateCallLog, UpdateFollowUp,
    },
    repository::{
        CallLogReader, CallLogWriter, DieselRepository, FollowUpReader, FollowUpWriter,
        LeadReader, LeadWriter, RepositoryResult, like_pattern, page_window,
    },
    schema::{call_logs, follow_ups, leads},
};

/// `[start, end)` timestamps covering one calendar day.
fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::default());
    let end = date
        .checked_add_days(Days::new(1))
        .map(|next| next.and_time(NaiveTime::default()))
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

fn filtered_call_logs(query: &CallLogListQuery) -> call_logs::BoxedQuery<'static, Sqlite> {
    let mut items = call_logs::table.into_boxed::<Sqlite>();

    if let Some((entity_type, entity_id)) = query.entity {
        items = items
            .filter(call_logs::entity_type.eq(entity_type.as_str()))
            .filter(call_logs::entity_id.eq(entity_id));
    }

    if let Some(user_id) = query.recorded_by {
        items = items.filter(call_logs::recorded_by.eq(user_id));
    }

    if let Some(status) = query.status {
        items = items.filter(call_logs::call_status.eq(status.as_str()));
    }

    if let Some(date) = query.on_date {
        let (start, end) = day_bounds(date);
        items = items
            .filter(call_logs::call_date.ge(start))
            .filter(call_logs::call_date.lt(end));
    }

    items
}

fn filtered_follow_ups(query: &FollowUpListQuery) -> follow_ups::BoxedQuery<'static, Sqlite> {
    let mut items = follow_ups::table.into_boxed::<Sqlite>();

    if let Some((entity_type, entity_id)) = query.entity {
        items = items
            .filter(follow_ups::entity_type.eq(entity_type.as_str()))
            .filter(follow_ups::entity_id.eq(entity_id));
    }

    if let Some(user_id) = query.assigned_to {
        items = items.filter(follow_ups::assigned_to.eq(user_id));
    }

    if let Some(status) = query.status {
        items = items.filter(follow_ups::status.eq(status.as_str()));
    }

    if let Some(date) = query.due_by {
        items = items.filter(follow_ups::follow_up_date.le(date));
    }

    items
}

fn filtered_leads(query: &LeadListQuery) -> leads::BoxedQuery<'static, Sqlite> {
    let mut items = leads::table.into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_deref() {
        let pattern = like_pattern(term);
        items = items.filter(
            leads::lead_code
                .like(pattern.clone())
                .or(leads::company_name.like(pattern.clone()))
                .or(leads::contact_person.like(pattern.clone()))
                .or(leads::mobile_no.like(pattern)),
        );
    }

    if let Some(status) = query.status {
        items = items.filter(leads::lead_status.eq(status.as_str()));
    }

    if let Some(user_id) = query.assigned_to {
        items = items.filter(leads::assigned_to.eq(user_id));
    }

    if query.open_only {
        let open: Vec<&'static str> = LeadStatus::OPEN
            .iter()
            .map(|status| status.as_str())
            .collect();
        items = items.filter(leads::lead_status.eq_any(open));
    }

    items
}

impl CallLogReader for DieselRepository {
    fn get_call_log(&self, id: i32) -> RepositoryResult<Option<DomainCallLog>> {
        let mut conn = self.conn()?;
        let call = call_logs::table
            .filter(call_logs::id.eq(id))
            .first::<DbCallLog>(&mut conn)
            .optional()?;

        Ok(call.map(Into::into))
    }

    fn list_call_logs(
        &self,
        query: CallLogListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCallLog>)> {
        let mut conn = self.conn()?;

        let total = filtered_call_logs(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items =
            filtered_call_logs(&query).order((call_logs::call_date.desc(), call_logs::id.desc()));

        if let Some((offset, limit)) = page_window(query.pagination.as_ref()) {
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbCallLog>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl CallLogWriter for DieselRepository {
    fn create_call_log(&self, call: &DomainNewCallLog) -> RepositoryResult<DomainCallLog> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(call_logs::table)
            .values(&DbNewCallLog::from(call))
            .get_result::<DbCallLog>(&mut conn)?;

        Ok(created.into())
    }

    fn update_call_log(
        &self,
        call_id: i32,
        details: &CallDetails,
    ) -> RepositoryResult<DomainCallLog> {
        let mut conn = self.conn()?;
        let now = chrono::Local::now().naive_utc();

        let updated = diesel::update(call_logs::table.filter(call_logs::id.eq(call_id)))
            .set(&UpdateCallLog::from_details(details, now))
            .get_result::<DbCallLog>(&mut conn)?;

        Ok(updated.into())
    }
}

impl FollowUpReader for DieselRepository {
    fn get_follow_up(&self, id: i32) -> RepositoryResult<Option<DomainFollowUp>> {
        let mut conn = self.conn()?;
        let follow_up = follow_ups::table
            .filter(follow_ups::id.eq(id))
            .first::<DbFollowUp>(&mut conn)
            .optional()?;

        Ok(follow_up.map(Into::into))
    }

    fn list_follow_ups(
        &self,
        query: FollowUpListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainFollowUp>)> {
        let mut conn = self.conn()?;

        let total = filtered_follow_ups(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_follow_ups(&query).order((
            follow_ups::follow_up_date.asc(),
            follow_ups::follow_up_time.asc(),
            follow_ups::id.asc(),
        ));

        if let Some((offset, limit)) = page_window(query.pagination.as_ref()) {
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbFollowUp>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl FollowUpWriter for DieselRepository {
    fn create_follow_up(&self, follow_up: &DomainNewFollowUp) -> RepositoryResult<DomainFollowUp> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(follow_ups::table)
            .values(&DbNewFollowUp::from(follow_up))
            .get_result::<DbFollowUp>(&mut conn)?;

        Ok(created.into())
    }

    fn update_follow_up(
        &self,
        follow_up_id: i32,
        details: &FollowUpDetails,
    ) -> RepositoryResult<DomainFollowUp> {
        let mut conn = self.conn()?;
        let now = chrono::Local::now().naive_utc();

        let updated = diesel::update(follow_ups::table.filter(follow_ups::id.eq(follow_up_id)))
            .set(&UpdateFollowUp::from_details(details, now))
            .get_result::<DbFollowUp>(&mut conn)?;

        Ok(updated.into())
    }
}

impl LeadReader for DieselRepository {
    fn get_lead(&self, id: i32) -> RepositoryResult<Option<DomainLead>> {
        let mut conn = self.conn()?;
        let lead = leads::table
            .filter(leads::id.eq(id))
            .first::<DbLead>(&mut conn)
            .optional()?;

        Ok(lead.map(Into::into))
    }

    fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<DomainLead>)> {
        let mut conn = self.conn()?;

        let total = filtered_leads(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_leads(&query).order((leads::created_at.desc(), leads::id.desc()));

        if let Some((offset, limit)) = page_window(query.pagination.as_ref()) {
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbLead>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl LeadWriter for DieselRepository {
    fn create_lead(&self, lead: &DomainNewLead) -> RepositoryResult<DomainLead> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(leads::table)
            .values(&DbNewLead::from(lead))
            .get_result::<DbLead>(&mut conn)?;

        Ok(created.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_exactly_one_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let (start, end) = day_bounds(date);

        assert_eq!(start.to_string(), "2024-02-29 00:00:00");
        assert_eq!(end.to_string(), "2024-03-01 00:00:00");
    }
}
