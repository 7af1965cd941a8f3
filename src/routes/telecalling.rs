use actix_web::{Responder, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::telecalling::{CallLogForm, FollowUpForm, LeadForm};
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::telecalling::{self, CallLogsQuery, FollowUpsQuery, LeadsQuery};

#[get("/telecalling/summary")]
pub async fn summary(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    ok(telecalling::summary(repo.get_ref(), &user), "load telecalling summary")
}

#[get("/call-logs")]
pub async fn list_call_logs(
    params: web::Query<CallLogsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        telecalling::list_call_logs(repo.get_ref(), &user, params.into_inner()),
        "list call logs",
    )
}

#[post("/call-logs")]
pub async fn log_call(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<CallLogForm>,
) -> impl Responder {
    created(
        telecalling::log_call(repo.get_ref(), &user, payload.into_inner()),
        "log call",
    )
}

#[get("/call-logs/{call_id}")]
pub async fn get_call_log(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        telecalling::get_call_log(repo.get_ref(), &user, path.into_inner()),
        "load call log",
    )
}

#[put("/call-logs/{call_id}")]
pub async fn update_call_log(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<CallLogForm>,
) -> impl Responder {
    ok(
        telecalling::update_call_log(
            repo.get_ref(),
            &user,
            path.into_inner(),
            payload.into_inner(),
        ),
        "update call log",
    )
}

#[get("/follow-ups")]
pub async fn list_follow_ups(
    params: web::Query<FollowUpsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        telecalling::list_follow_ups(repo.get_ref(), &user, params.into_inner()),
        "list follow-ups",
    )
}

#[post("/follow-ups")]
pub async fn schedule_follow_up(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<FollowUpForm>,
) -> impl Responder {
    created(
        telecalling::schedule_follow_up(repo.get_ref(), &user, payload.into_inner()),
        "schedule follow-up",
    )
}

#[get("/follow-ups/{follow_up_id}")]
pub async fn get_follow_up(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        telecalling::get_follow_up(repo.get_ref(), &user, path.into_inner()),
        "load follow-up",
    )
}

#[put("/follow-ups/{follow_up_id}")]
pub async fn update_follow_up(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<FollowUpForm>,
) -> impl Responder {
    ok(
        telecalling::update_follow_up(
            repo.get_ref(),
            &user,
            path.into_inner(),
            payload.into_inner(),
        ),
        "update follow-up",
    )
}

#[get("/leads")]
pub async fn list_leads(
    params: web::Query<LeadsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(telecalling::list_leads(repo.get_ref(), &user, params.into_inner()), "list leads")
}

#[post("/leads")]
pub async fn create_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<LeadForm>,
) -> impl Responder {
    created(
        telecalling::create_lead(repo.get_ref(), &user, payload.into_inner()),
        "create lead",
    )
}

#[get("/leads/{lead_id}")]
pub async fn get_lead(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(telecalling::get_lead(repo.get_ref(), &user, path.into_inner()), "load lead")
}
