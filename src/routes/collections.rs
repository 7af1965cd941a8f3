use actix_web::{Responder, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::collections::{CollectionForm, CollectionStatusForm};
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::collections::{self, CollectionsQuery};

#[get("/collections")]
pub async fn list_collections(
    params: web::Query<CollectionsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        collections::list_collections(repo.get_ref(), &user, params.into_inner()),
        "list collections",
    )
}

#[post("/collections")]
pub async fn create_collection(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<CollectionForm>,
) -> impl Responder {
    created(
        collections::create_collection(repo.get_ref(), &user, payload.into_inner()),
        "record collection",
    )
}

#[get("/collections/{collection_id}")]
pub async fn get_collection(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        collections::get_collection(repo.get_ref(), &user, path.into_inner()),
        "load collection",
    )
}

#[put("/collections/{collection_id}/status")]
pub async fn update_collection_status(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<CollectionStatusForm>,
) -> impl Responder {
    ok(
        collections::update_collection_status(
            repo.get_ref(),
            &user,
            path.into_inner(),
            payload.into_inner(),
        ),
        "update collection status",
    )
}
