use actix_web::{Responder, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::users::{AddUserForm, EditUserForm};
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::users::{self, UsersQuery};

#[get("/users")]
pub async fn list_users(
    params: web::Query<UsersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(users::list_users(repo.get_ref(), &user, params.into_inner()), "list users")
}

#[post("/users")]
pub async fn create_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<AddUserForm>,
) -> impl Responder {
    created(
        users::create_user(repo.get_ref(), &user, payload.into_inner()),
        "create user",
    )
}

#[get("/users/{user_id}")]
pub async fn get_user(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(users::get_user(repo.get_ref(), &user, path.into_inner()), "load user")
}

#[put("/users/{user_id}")]
pub async fn update_user(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<EditUserForm>,
) -> impl Responder {
    ok(
        users::update_user(repo.get_ref(), &user, path.into_inner(), payload.into_inner()),
        "update user",
    )
}
