//! Routes, the customers on them and the beat plans that schedule them.

use actix_web::{Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::beat_plans::BeatPlanForm;
use crate::forms::routes::{AddRouteCustomerForm, AddRouteForm, EditRouteForm, VisitSequenceForm};
use crate::repository::DieselRepository;
use crate::routes::{created, no_content, ok};
use crate::services::beat_plans::{self, BeatPlansQuery, DayQuery};
use crate::services::routes::{self as route_service, RoutesQuery};

#[get("/routes")]
pub async fn list_routes(
    params: web::Query<RoutesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        route_service::list_routes(repo.get_ref(), &user, params.into_inner()),
        "list routes",
    )
}

#[post("/routes")]
pub async fn create_route(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<AddRouteForm>,
) -> impl Responder {
    created(
        route_service::create_route(repo.get_ref(), &user, payload.into_inner()),
        "create route",
    )
}

#[get("/routes/{route_id}")]
pub async fn get_route(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        route_service::get_route(repo.get_ref(), &user, path.into_inner()),
        "load route",
    )
}

#[put("/routes/{route_id}")]
pub async fn update_route(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<EditRouteForm>,
) -> impl Responder {
    ok(
        route_service::update_route(repo.get_ref(), &user, path.into_inner(), payload.into_inner()),
        "update route",
    )
}

#[get("/routes/{route_id}/customers")]
pub async fn list_route_customers(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        route_service::list_route_customers(repo.get_ref(), &user, path.into_inner()),
        "list route customers",
    )
}

#[post("/routes/{route_id}/customers")]
pub async fn add_route_customer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<AddRouteCustomerForm>,
) -> impl Responder {
    created(
        route_service::add_route_customer(
            repo.get_ref(),
            &user,
            path.into_inner(),
            payload.into_inner(),
        ),
        "add customer to route",
    )
}

#[put("/routes/{route_id}/customers/{mapping_id}")]
pub async fn update_visit_sequence(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<VisitSequenceForm>,
) -> impl Responder {
    let (route_id, mapping_id) = path.into_inner();
    ok(
        route_service::update_visit_sequence(
            repo.get_ref(),
            &user,
            route_id,
            mapping_id,
            payload.into_inner(),
        ),
        "update visit sequence",
    )
}

#[delete("/routes/{route_id}/customers/{mapping_id}")]
pub async fn remove_route_customer(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (route_id, mapping_id) = path.into_inner();
    no_content(
        route_service::remove_route_customer(repo.get_ref(), &user, route_id, mapping_id),
        "remove customer from route",
    )
}

#[get("/beat-plans")]
pub async fn list_beat_plans(
    params: web::Query<BeatPlansQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        beat_plans::list_beat_plans(repo.get_ref(), &user, params.into_inner()),
        "list beat plans",
    )
}

#[post("/beat-plans")]
pub async fn create_beat_plan(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<BeatPlanForm>,
) -> impl Responder {
    created(
        beat_plans::create_beat_plan(repo.get_ref(), &user, payload.into_inner()),
        "create beat plan",
    )
}

#[get("/beat-plans/day")]
/// Routes and customers scheduled for a user on one day.
pub async fn routes_for_day(
    params: web::Query<DayQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        beat_plans::routes_for_day(repo.get_ref(), &user, params.into_inner()),
        "load day schedule",
    )
}

#[put("/beat-plans/{plan_id}")]
pub async fn update_beat_plan(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<BeatPlanForm>,
) -> impl Responder {
    ok(
        beat_plans::update_beat_plan(
            repo.get_ref(),
            &user,
            path.into_inner(),
            payload.into_inner(),
        ),
        "update beat plan",
    )
}

#[delete("/beat-plans/{plan_id}")]
pub async fn delete_beat_plan(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    no_content(
        beat_plans::delete_beat_plan(repo.get_ref(), &user, path.into_inner()),
        "delete beat plan",
    )
}
