use actix_web::{Responder, get, web};

use crate::auth::AuthenticatedUser;
use crate::forms::uploads::UploadKind;
use crate::routes::{csv_download, error_response};
use crate::services::{ServiceError, uploads};

#[get("/uploads/templates/{kind}")]
/// Download the CSV template of `customers`, `products` or `prices`.
pub async fn upload_template(path: web::Path<String>, user: AuthenticatedUser) -> impl Responder {
    match UploadKind::parse(&path.into_inner()) {
        Some(kind) => csv_download(uploads::upload_template(&user, kind), "build upload template"),
        None => error_response(ServiceError::NotFound, "build upload template"),
    }
}
