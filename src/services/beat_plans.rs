use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::domain::beat_plan::{BeatPlan, BeatPlanDetail, DayMask};
use crate::domain::route::{Route, RouteCustomerDetail};
use crate::domain::user::Role;
use crate::forms::beat_plans::BeatPlanForm;
use crate::repository::{BeatPlanReader, BeatPlanWriter, RouteReader, UserReader};
use crate::services::{MANAGER_ROLES, ServiceError, ServiceResult, require_role, today};

#[derive(Debug, Default, Deserialize)]
pub struct BeatPlansQuery {
    pub user_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    pub user_id: Option<i32>,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
}

/// Route scheduled for a day, with its customers in visit order.
#[derive(Debug, Serialize)]
pub struct ScheduledRoute {
    pub beat_plan_id: i32,
    pub route: Route,
    pub customers: Vec<RouteCustomerDetail>,
}

/// Field staff may only look at their own plan.
fn target_user(user: &AuthenticatedUser, requested: Option<i32>) -> ServiceResult<Option<i32>> {
    match (user.scope(), requested) {
        (None, requested) => Ok(requested),
        (Some(own), None) => Ok(Some(own)),
        (Some(own), Some(requested)) if own == requested => Ok(Some(own)),
        (Some(_), Some(_)) => Err(ServiceError::Forbidden),
    }
}

pub fn list_beat_plans<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: BeatPlansQuery,
) -> ServiceResult<Vec<BeatPlanDetail>>
where
    R: BeatPlanReader + ?Sized,
{
    let user_id = target_user(user, query.user_id)?;
    repo.list_beat_plans(user_id).map_err(ServiceError::from)
}

/// Reject a plan for `user_id` on `route_id` that would duplicate an active one.
///
/// `editing` is skipped so a plan can be saved over itself.
fn check_assignment<R>(
    repo: &R,
    user_id: i32,
    route_id: i32,
    days: DayMask,
    editing: Option<i32>,
) -> ServiceResult<()>
where
    R: BeatPlanReader + RouteReader + UserReader + ?Sized,
{
    if days.is_empty() {
        return Err(ServiceError::Form(
            "select at least one day for the beat plan".to_string(),
        ));
    }

    match repo.get_user_by_id(user_id).map_err(ServiceError::from)? {
        Some(assignee) if assignee.role == Role::FieldStaff => {}
        Some(_) => {
            return Err(ServiceError::Form(
                "beat plans can only be assigned to field staff".to_string(),
            ));
        }
        None => return Err(ServiceError::Form(format!("user {user_id} does not exist"))),
    }

    if repo
        .get_route_by_id(route_id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Err(ServiceError::Form(format!("route {route_id} does not exist")));
    }

    let existing = repo
        .list_active_beat_plans_for_user(user_id)
        .map_err(ServiceError::from)?;
    if existing
        .iter()
        .any(|plan| plan.route_id == route_id && Some(plan.id) != editing)
    {
        return Err(ServiceError::Conflict(
            "this route is already assigned to the user".to_string(),
        ));
    }

    Ok(())
}

pub fn create_beat_plan<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: BeatPlanForm,
) -> ServiceResult<BeatPlan>
where
    R: BeatPlanReader + BeatPlanWriter + RouteReader + UserReader + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let plan = form.into_new_plan();
    check_assignment(repo, plan.user_id, plan.route_id, plan.days, None)?;

    let created = repo.create_beat_plan(&plan).map_err(ServiceError::from)?;
    log::info!(
        "Route {} assigned to user {} by {}",
        created.route_id,
        created.user_id,
        user.id()
    );
    Ok(created)
}

pub fn update_beat_plan<R>(
    repo: &R,
    user: &AuthenticatedUser,
    plan_id: i32,
    form: BeatPlanForm,
) -> ServiceResult<BeatPlan>
where
    R: BeatPlanReader + BeatPlanWriter + RouteReader + UserReader + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    if repo
        .get_beat_plan(plan_id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Err(ServiceError::NotFound);
    }

    let updates = form.into_update();
    if updates.is_active {
        check_assignment(
            repo,
            updates.user_id,
            updates.route_id,
            updates.days,
            Some(plan_id),
        )?;
    } else if updates.days.is_empty() {
        return Err(ServiceError::Form(
            "select at least one day for the beat plan".to_string(),
        ));
    }

    repo.update_beat_plan(plan_id, &updates)
        .map_err(ServiceError::from)
}

pub fn delete_beat_plan<R>(repo: &R, user: &AuthenticatedUser, plan_id: i32) -> ServiceResult<()>
where
    R: BeatPlanWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    repo.delete_beat_plan(plan_id).map_err(ServiceError::from)?;
    log::info!("Beat plan {plan_id} deleted by {}", user.id());
    Ok(())
}

/// Active routes a user visits on `date`.
pub fn routes_for_day<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: DayQuery,
) -> ServiceResult<Vec<ScheduledRoute>>
where
    R: BeatPlanReader + RouteReader + ?Sized,
{
    let user_id = target_user(user, query.user_id)?.unwrap_or(user.id());
    let date = query.date.unwrap_or_else(today);

    let plans = repo
        .list_active_beat_plans_for_user(user_id)
        .map_err(ServiceError::from)?;

    let mut scheduled = Vec::new();
    for plan in plans.into_iter().filter(|plan| plan.days.includes_date(date)) {
        let Some(route) = repo
            .get_route_by_id(plan.route_id)
            .map_err(ServiceError::from)?
        else {
            continue;
        };
        if !route.is_active {
            continue;
        }

        let customers = repo
            .list_route_customers(route.id)
            .map_err(ServiceError::from)?
            .into_iter()
            .filter(|detail| detail.mapping.is_active)
            .collect();
        scheduled.push(ScheduledRoute {
            beat_plan_id: plan.id,
            route,
            customers,
        });
    }

    Ok(scheduled)
}
