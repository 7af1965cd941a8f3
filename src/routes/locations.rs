use actix_web::{Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::locations::LocationForm;
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::locations::{self, HistoryQuery};

#[post("/locations")]
/// Record a position fix of the caller's device.
pub async fn record_location(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<LocationForm>,
) -> impl Responder {
    created(
        locations::record_location(repo.get_ref(), &user, payload.into_inner()),
        "record location",
    )
}

#[get("/locations/latest")]
pub async fn latest_locations(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(locations::latest_locations(repo.get_ref(), &user), "load latest locations")
}

#[get("/users/{user_id}/locations")]
pub async fn user_history(
    path: web::Path<i32>,
    params: web::Query<HistoryQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        locations::user_history(repo.get_ref(), &user, path.into_inner(), params.into_inner()),
        "load location history",
    )
}
