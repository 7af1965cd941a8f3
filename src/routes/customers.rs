use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::customers::{CaptureLocationForm, CustomerForm};
use crate::forms::uploads::UploadCsvForm;
use crate::repository::DieselRepository;
use crate::routes::{created, error_response, ok};
use crate::services::ServiceError;
use crate::services::customers::{self, CustomersQuery};

#[get("/customers")]
pub async fn list_customers(
    params: web::Query<CustomersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        customers::list_customers(repo.get_ref(), &user, params.into_inner()),
        "list customers",
    )
}

#[post("/customers")]
pub async fn create_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<CustomerForm>,
) -> impl Responder {
    created(
        customers::create_customer(repo.get_ref(), &user, payload.into_inner()),
        "create customer",
    )
}

#[post("/customers/import")]
/// Bulk import customers from a CSV file in the `csv` multipart field.
pub async fn import_customers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadCsvForm>,
) -> impl Responder {
    let upload = match form.into_upload() {
        Ok(upload) => upload,
        Err(err) => return error_response(ServiceError::Form(err.to_string()), "read upload"),
    };
    ok(
        customers::import_customers(repo.get_ref(), &user, upload),
        "import customers",
    )
}

#[get("/customers/{customer_id}")]
pub async fn get_customer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        customers::get_customer(repo.get_ref(), &user, path.into_inner()),
        "load customer",
    )
}

#[put("/customers/{customer_id}")]
pub async fn update_customer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<CustomerForm>,
) -> impl Responder {
    ok(
        customers::update_customer(repo.get_ref(), &user, path.into_inner(), payload.into_inner()),
        "update customer",
    )
}

#[post("/customers/{customer_id}/location")]
/// Store the device position as the customer's geolocation.
pub async fn capture_location(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<CaptureLocationForm>,
) -> impl Responder {
    ok(
        customers::capture_location(repo.get_ref(), &user, path.into_inner(), payload.into_inner()),
        "capture customer location",
    )
}
