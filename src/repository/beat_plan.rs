use diesel::prelude::*;

use crate::{
    domain::beat_plan::{
        BeatPlan as DomainBeatPlan, BeatPlanDetail, NewBeatPlan as DomainNewBeatPlan,
        UpdateBeatPlan as DomainUpdateBeatPlan,
    },
    models::beat_plan::{
        BeatPlan as DbBeatPlan, NewBeatPlan as DbNewBeatPlan, UpdateBeatPlan as DbUpdateBeatPlan,
    },
    repository::{
        BeatPlanReader, BeatPlanWriter, DieselRepository, RepositoryError, RepositoryResult,
    },
    schema::{beat_plans, routes, users},
};

impl BeatPlanReader for DieselRepository {
    fn get_beat_plan(&self, id: i32) -> RepositoryResult<Option<DomainBeatPlan>> {
        let mut conn = self.conn()?;
        let plan = beat_plans::table
            .filter(beat_plans::id.eq(id))
            .first::<DbBeatPlan>(&mut conn)
            .optional()?;

        Ok(plan.map(Into::into))
    }

    fn list_beat_plans(&self, user_id: Option<i32>) -> RepositoryResult<Vec<BeatPlanDetail>> {
        let mut conn = self.conn()?;

        let mut items = beat_plans::table
            .inner_join(routes::table)
            .inner_join(users::table.on(users::id.eq(beat_plans::user_id)))
            .into_boxed();

        if let Some(user_id) = user_id {
            items = items.filter(beat_plans::user_id.eq(user_id));
        }

        let rows = items
            .order((users::full_name.asc(), routes::route_code.asc()))
            .select((
                DbBeatPlan::as_select(),
                routes::route_code,
                routes::route_name,
                users::full_name,
            ))
            .load::<(DbBeatPlan, String, String, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(plan, route_code, route_name, user_name)| BeatPlanDetail {
                plan: plan.into(),
                route_code,
                route_name,
                user_name,
            })
            .collect())
    }

    fn list_active_beat_plans_for_user(
        &self,
        user_id: i32,
    ) -> RepositoryResult<Vec<DomainBeatPlan>> {
        let mut conn = self.conn()?;

        let rows = beat_plans::table
            .filter(beat_plans::user_id.eq(user_id))
            .filter(beat_plans::is_active.eq(true))
            .order(beat_plans::id.asc())
            .load::<DbBeatPlan>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl BeatPlanWriter for DieselRepository {
    fn create_beat_plan(&self, plan: &DomainNewBeatPlan) -> RepositoryResult<DomainBeatPlan> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(beat_plans::table)
            .values(&DbNewBeatPlan::from(plan))
            .get_result::<DbBeatPlan>(&mut conn)?;

        Ok(created.into())
    }

    fn update_beat_plan(
        &self,
        plan_id: i32,
        updates: &DomainUpdateBeatPlan,
    ) -> RepositoryResult<DomainBeatPlan> {
        let mut conn = self.conn()?;

        let updated = diesel::update(beat_plans::table.filter(beat_plans::id.eq(plan_id)))
            .set(&DbUpdateBeatPlan::from(updates))
            .get_result::<DbBeatPlan>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_beat_plan(&self, plan_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(beat_plans::table.filter(beat_plans::id.eq(plan_id)))
            .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
