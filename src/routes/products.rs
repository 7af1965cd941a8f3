use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::products::ProductForm;
use crate::forms::uploads::UploadCsvForm;
use crate::repository::DieselRepository;
use crate::routes::{created, error_response, ok};
use crate::services::ServiceError;
use crate::services::products::{self, ProductsQuery};

#[get("/products")]
pub async fn list_products(
    params: web::Query<ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        products::list_products(repo.get_ref(), &user, params.into_inner()),
        "list products",
    )
}

#[post("/products")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<ProductForm>,
) -> impl Responder {
    created(
        products::create_product(repo.get_ref(), &user, payload.into_inner()),
        "create product",
    )
}

#[post("/products/import")]
pub async fn import_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadCsvForm>,
) -> impl Responder {
    let upload = match form.into_upload() {
        Ok(upload) => upload,
        Err(err) => return error_response(ServiceError::Form(err.to_string()), "read upload"),
    };
    ok(
        products::import_products(repo.get_ref(), &user, upload),
        "import products",
    )
}

#[get("/products/{product_id}")]
pub async fn get_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        products::get_product(repo.get_ref(), &user, path.into_inner()),
        "load product",
    )
}

#[put("/products/{product_id}")]
pub async fn update_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<ProductForm>,
) -> impl Responder {
    ok(
        products::update_product(repo.get_ref(), &user, path.into_inner(), payload.into_inner()),
        "update product",
    )
}
